//! HTTP surface of the Tollgate token service.
//!
//! Routes:
//!
//! - `GET /health` - liveness
//! - `POST /oauth/token?grant_type=...` - issue a token (client basic auth)
//! - `POST /oauth/check_token?token=...` - resolve a token (client basic auth)
//! - `GET /simple` - sample resource behind a bearer token

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod state;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::{ApiError, ServerError};
pub use observability::init_tracing;
pub use server::{ServerBuilder, TollgateServer, build_app, build_router};
pub use state::AppState;
