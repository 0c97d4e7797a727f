use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{config::AppConfig, error::ServerError, handlers, state::AppState};

pub struct TollgateServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig) -> Result<Router, ServerError> {
    let state = AppState::from_config(&cfg.auth)?;
    Ok(build_router(state, cfg.server.body_limit_bytes))
}

pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/oauth/token", post(handlers::token))
        .route("/oauth/check_token", post(handlers::check_token))
        .route("/simple", get(handlers::simple))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &axum::http::Request<_>| {
                            use tracing::field::Empty;
                            tracing::info_span!(
                                "http.request",
                                http.method = %req.method(),
                                http.target = %req.uri().path(),
                                http.status_code = Empty,
                                request_id = %Uuid::new_v4()
                            )
                        })
                        .on_response(
                            |res: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &tracing::Span| {
                                span.record(
                                    "http.status_code",
                                    tracing::field::display(res.status().as_u16()),
                                );
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            },
                        ),
                )
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub fn build(self) -> Result<TollgateServer, ServerError> {
        let addr = self.config.addr().map_err(ServerError::Config)?;
        let app = build_app(&self.config)?;
        Ok(TollgateServer { addr, app })
    }
}

impl TollgateServer {
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
