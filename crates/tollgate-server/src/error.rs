//! Server errors and HTTP error rendering.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tollgate_auth::{AuthError, ConfigError};

/// Errors raised while assembling or starting the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("auth configuration error: {0}")]
    Auth(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An [`AuthError`] rendered as a JSON `{"error": ...}` response.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

/// Status code for an auth error.
pub fn status_for(err: &AuthError) -> StatusCode {
    if err.is_server_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else if err.is_authentication_error() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        if status.is_server_error() {
            tracing::error!(error = %self.0, category = %self.0.category(), "Request failed");
        } else if self.0.is_token_error() {
            tracing::debug!(error = %self.0, category = %self.0.category(), "Token rejected");
        } else {
            tracing::warn!(error = %self.0, category = %self.0.category(), "Request rejected");
        }

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let challenge = format!("Bearer error=\"{}\"", self.0.oauth_error_code());
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        let body = json!({ "error": self.0.to_string() });
        (status, headers, Json(body)).into_response()
    }
}
