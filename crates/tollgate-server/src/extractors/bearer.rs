//! Bearer token extractor.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use tollgate_auth::endpoint::RequestScope;
use tollgate_auth::types::AuthorizationContext;

use super::authorization_header;
use crate::state::AppState;

/// Authorization context resolved from an `Authorization: Bearer` token.
pub struct BearerAuth(pub RequestScope<AuthorizationContext>);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let scope = app_state
            .resource_auth
            .build(authorization_header(parts))
            .await;

        if let Some(err) = scope.rejection() {
            tracing::info!(path = %parts.uri.path(), error = %err, "Bearer token rejected");
        }

        Ok(Self(scope))
    }
}
