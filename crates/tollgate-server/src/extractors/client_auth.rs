//! Client authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! async fn handler(ClientAuth(client): ClientAuth) -> impl IntoResponse {
//!     let client = client.require(AuthError::InvalidClientRequest)?;
//!     // ...
//! }
//! ```

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tollgate_auth::endpoint::RequestScope;
use tollgate_auth::types::ClientPrincipal;

use super::authorization_header;
use crate::state::AppState;

/// Client resolved from `Authorization: Basic` credentials.
pub struct ClientAuth(pub RequestScope<ClientPrincipal>);

impl<S> FromRequestParts<S> for ClientAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let scope = app_state
            .client_auth
            .build(authorization_header(parts))
            .await;

        match &scope {
            RequestScope::Resolved(client) => {
                tracing::debug!(client_id = %client.client_id, "Client authenticated");
            }
            RequestScope::Rejected(err) => {
                tracing::info!(
                    path = %parts.uri.path(),
                    error = %err,
                    "Client authentication failed"
                );
            }
            RequestScope::Missing => {}
        }

        Ok(Self(scope))
    }
}
