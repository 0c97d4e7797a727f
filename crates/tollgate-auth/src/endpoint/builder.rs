//! Authorization context builders.
//!
//! A builder runs once per inbound request, before any endpoint logic, and
//! turns the request's `Authorization` header into a [`RequestScope`]. The
//! endpoint then calls [`RequestScope::require`], which rejects a missing and
//! a failed resolution the same way.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::ClientDirectory;
use crate::token::TokenService;
use crate::types::{AuthorizationContext, ClientPrincipal};

/// Outcome of resolving a principal for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestScope<T> {
    /// The principal was resolved.
    Resolved(T),
    /// Credentials were presented but did not resolve.
    Rejected(AuthError),
    /// No credentials were presented.
    Missing,
}

impl<T> RequestScope<T> {
    /// Returns the resolved principal, or `boundary` for both the rejected
    /// and the missing case.
    ///
    /// # Errors
    ///
    /// Returns `boundary` unless the scope is `Resolved`.
    pub fn require(self, boundary: AuthError) -> AuthResult<T> {
        match self {
            Self::Resolved(value) => Ok(value),
            Self::Rejected(_) | Self::Missing => Err(boundary),
        }
    }

    /// The underlying resolution error, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<&AuthError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if a principal was resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl<T> From<AuthResult<T>> for RequestScope<T> {
    fn from(result: AuthResult<T>) -> Self {
        match result {
            Ok(value) => Self::Resolved(value),
            Err(err) => Self::Rejected(err),
        }
    }
}

/// Resolves the calling client from `Authorization: Basic` credentials.
pub struct ClientAuthBuilder {
    clients: Arc<dyn ClientDirectory>,
}

impl ClientAuthBuilder {
    /// Creates a builder resolving against the client directory.
    #[must_use]
    pub fn new(clients: Arc<dyn ClientDirectory>) -> Self {
        Self { clients }
    }

    /// Builds the client scope from an optional `Authorization` header value.
    pub async fn build(&self, authorization: Option<&str>) -> RequestScope<ClientPrincipal> {
        let Some(header) = authorization else {
            return RequestScope::Missing;
        };

        let (client_id, secret) = match parse_basic_auth(header) {
            Ok(credentials) => credentials,
            Err(err) => return RequestScope::Rejected(err),
        };

        self.clients.authenticate(&client_id, &secret).await.into()
    }
}

/// Resolves the token holder from `Authorization: Bearer` credentials.
pub struct ResourceAuthBuilder {
    token_service: Arc<TokenService>,
}

impl ResourceAuthBuilder {
    /// Creates a builder resolving against the token service.
    #[must_use]
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    /// Builds the context scope from an optional `Authorization` header value.
    pub async fn build(&self, authorization: Option<&str>) -> RequestScope<AuthorizationContext> {
        let Some(header) = authorization else {
            return RequestScope::Missing;
        };

        let token = match parse_bearer(header) {
            Ok(token) => token,
            Err(err) => return RequestScope::Rejected(err),
        };

        self.token_service
            .get_authorization_context(token)
            .await
            .into()
    }
}

/// Parses `Basic base64(id:secret)` credentials.
///
/// # Errors
///
/// Returns `InvalidClientRequest` if the header is not well-formed basic
/// credentials.
pub fn parse_basic_auth(header: &str) -> AuthResult<(String, String)> {
    let credentials = header
        .strip_prefix("Basic ")
        .ok_or(AuthError::InvalidClientRequest)?;

    let decoded = STANDARD
        .decode(credentials.trim())
        .map_err(|_| AuthError::InvalidClientRequest)?;

    let credentials =
        String::from_utf8(decoded).map_err(|_| AuthError::InvalidClientRequest)?;

    let (client_id, secret) = credentials
        .split_once(':')
        .ok_or(AuthError::InvalidClientRequest)?;

    Ok((client_id.to_string(), secret.to_string()))
}

/// Parses `Bearer <token>` credentials.
///
/// # Errors
///
/// Returns `InvalidTokenRequest` if the scheme is not `Bearer` or the token
/// is empty.
pub fn parse_bearer(header: &str) -> AuthResult<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidTokenRequest)
}
