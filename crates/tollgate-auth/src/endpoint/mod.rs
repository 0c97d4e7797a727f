//! Transport-independent endpoints.
//!
//! Each endpoint takes a decoded request record plus the scope built for the
//! request and returns a plain result. A transport renders the result into
//! the response records defined here.

mod builder;

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;
use crate::grant::{GrantParams, TokenGranter};
use crate::token::TokenService;
use crate::types::{AuthorizationContext, ClientPrincipal, OAuth2Token};

pub use builder::{
    ClientAuthBuilder, RequestScope, ResourceAuthBuilder, parse_basic_auth, parse_bearer,
};

/// A decoded grant request.
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    /// Requested grant type tag.
    pub grant_type: String,
    /// Credentials carried in the request body.
    pub params: GrantParams,
}

/// Result of a grant request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<OAuth2Token>,
    /// Error text if the grant failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AuthResult<OAuth2Token>> for TokenResponse {
    fn from(result: AuthResult<OAuth2Token>) -> Self {
        match result {
            Ok(token) => Self {
                access_token: Some(token),
                error: None,
            },
            Err(err) => Self {
                access_token: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// A decoded token validation request.
#[derive(Debug, Clone, Default)]
pub struct CheckTokenRequest {
    /// Access token value to validate.
    pub token_value: String,
}

/// Result of a token validation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckTokenResponse {
    /// The context the token was issued for, without secrets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_context: Option<AuthorizationContext>,
    /// Error text if validation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AuthResult<AuthorizationContext>> for CheckTokenResponse {
    fn from(result: AuthResult<AuthorizationContext>) -> Self {
        match result {
            Ok(context) => Self {
                authorization_context: Some(context.redacted()),
                error: None,
            },
            Err(err) => Self {
                authorization_context: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Liveness report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: bool,
}

/// Result of the protected sample resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimpleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AuthResult<String>> for SimpleResponse {
    fn from(result: AuthResult<String>) -> Self {
        match result {
            Ok(result) => Self {
                result: Some(result),
                error: None,
            },
            Err(err) => Self {
                result: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Issues a token for the client resolved on the request.
///
/// # Errors
///
/// Returns `InvalidClientRequest` if no client was resolved,
/// `InvalidTokenRequest` if the grant type is missing, or whatever the
/// granter returns.
pub async fn token_endpoint(
    granter: &dyn TokenGranter,
    client: RequestScope<ClientPrincipal>,
    request: &TokenRequest,
) -> AuthResult<OAuth2Token> {
    let client = client.require(AuthError::InvalidClientRequest)?;
    if request.grant_type.is_empty() {
        return Err(AuthError::InvalidTokenRequest);
    }
    granter
        .grant(&request.grant_type, &client, &request.params)
        .await
}

/// Resolves an access token to the context it was issued for.
///
/// Only authenticated clients may validate tokens.
///
/// # Errors
///
/// Returns `InvalidClientRequest` if no client was resolved,
/// `InvalidTokenRequest` if the token value is missing, or the lifecycle
/// error (`ExpiredToken`, `InvalidSignature`, `Malformed`, ...).
pub async fn check_token_endpoint(
    token_service: &TokenService,
    client: RequestScope<ClientPrincipal>,
    request: &CheckTokenRequest,
) -> AuthResult<AuthorizationContext> {
    client.require(AuthError::InvalidClientRequest)?;
    if request.token_value.is_empty() {
        return Err(AuthError::InvalidTokenRequest);
    }
    let context = token_service
        .get_authorization_context(&request.token_value)
        .await?;
    Ok(context.redacted())
}

/// Reports liveness.
#[must_use]
pub fn health_endpoint() -> HealthResponse {
    HealthResponse { status: true }
}

/// Sample protected resource greeting the token holder.
///
/// # Errors
///
/// Returns `InvalidTokenRequest` if no context was resolved.
pub fn simple_data(context: RequestScope<AuthorizationContext>) -> AuthResult<String> {
    let context = context.require(AuthError::InvalidTokenRequest)?;
    Ok(format!(
        "hello {} ,simple data, with simple authority",
        context.user.username
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::grant::{CompositeTokenGranter, PASSWORD_GRANT, PasswordTokenGranter};
    use crate::storage::{InMemoryTokenStore, InMemoryUserDirectory};
    use crate::token::TokenConfig;
    use crate::types::UserPrincipal;

    struct Fixture {
        granter: CompositeTokenGranter,
        service: Arc<TokenService>,
    }

    fn fixture() -> Fixture {
        let service = Arc::new(TokenService::new(
            Arc::new(InMemoryTokenStore::new()),
            None,
            TokenConfig::default(),
        ));
        let users = Arc::new(InMemoryUserDirectory::new([UserPrincipal::new(
            "admin", "123456", 1,
        )])
        .unwrap());
        let granter = CompositeTokenGranter::new().with_granter(
            PASSWORD_GRANT,
            Arc::new(PasswordTokenGranter::new(users, service.clone())),
        );
        Fixture { granter, service }
    }

    fn client() -> RequestScope<ClientPrincipal> {
        RequestScope::Resolved(
            ClientPrincipal::new("clientId", "clientSecret").with_grant_type(PASSWORD_GRANT),
        )
    }

    fn password_request() -> TokenRequest {
        TokenRequest {
            grant_type: PASSWORD_GRANT.to_string(),
            params: GrantParams::new()
                .with("username", "admin")
                .with("password", "123456"),
        }
    }

    #[tokio::test]
    async fn test_token_then_check_token() {
        let f = fixture();
        let token = token_endpoint(&f.granter, client(), &password_request())
            .await
            .unwrap();

        let request = CheckTokenRequest {
            token_value: token.token_value,
        };
        let context = check_token_endpoint(&f.service, client(), &request)
            .await
            .unwrap();
        assert_eq!(context.user.username, "admin");
        assert!(context.client.client_secret.is_empty());
    }

    #[tokio::test]
    async fn test_token_endpoint_requires_client() {
        let f = fixture();
        for scope in [
            RequestScope::Missing,
            RequestScope::Rejected(AuthError::ClientSecretMismatch),
        ] {
            let result = token_endpoint(&f.granter, scope, &password_request()).await;
            assert_eq!(result, Err(AuthError::InvalidClientRequest));
        }
    }

    #[tokio::test]
    async fn test_token_endpoint_requires_grant_type() {
        let f = fixture();
        let request = TokenRequest::default();
        let result = token_endpoint(&f.granter, client(), &request).await;
        assert_eq!(result, Err(AuthError::InvalidTokenRequest));
    }

    #[tokio::test]
    async fn test_check_token_requires_client_and_value() {
        let f = fixture();
        let request = CheckTokenRequest::default();
        assert_eq!(
            check_token_endpoint(&f.service, RequestScope::Missing, &request).await,
            Err(AuthError::InvalidClientRequest)
        );
        assert_eq!(
            check_token_endpoint(&f.service, client(), &request).await,
            Err(AuthError::InvalidTokenRequest)
        );
    }

    #[test]
    fn test_health() {
        assert!(health_endpoint().status);
    }

    #[test]
    fn test_simple_data() {
        let context = AuthorizationContext::new(
            ClientPrincipal::new("clientId", ""),
            UserPrincipal::new("admin", "", 1),
        );
        assert_eq!(
            simple_data(RequestScope::Resolved(context)).unwrap(),
            "hello admin ,simple data, with simple authority"
        );
        assert_eq!(
            simple_data(RequestScope::Missing),
            Err(AuthError::InvalidTokenRequest)
        );
    }

    #[test]
    fn test_responses_from_results() {
        let response = TokenResponse::from(Err(AuthError::PasswordMismatch));
        assert!(response.access_token.is_none());
        assert_eq!(response.error.as_deref(), Some("invalid password"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "invalid password" }));

        let response = CheckTokenResponse::from(Ok(AuthorizationContext::new(
            ClientPrincipal::new("clientId", "clientSecret"),
            UserPrincipal::new("admin", "123456", 1),
        )));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("clientSecret"));
        assert!(!json.contains("123456"));
    }
}
