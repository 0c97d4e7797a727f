//! Axum extractors running the authorization context builders.
//!
//! Extraction never fails. The resolved [`RequestScope`] is handed to the
//! endpoint, which rejects a missing and a failed resolution alike.
//!
//! [`RequestScope`]: tollgate_auth::endpoint::RequestScope

mod bearer;
mod client_auth;

pub use bearer::BearerAuth;
pub use client_auth::ClientAuth;

use axum::http::{header::AUTHORIZATION, request::Parts};

fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
