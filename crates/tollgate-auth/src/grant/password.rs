//! Resource owner password grant.

use std::sync::Arc;

use async_trait::async_trait;

use super::{GrantParams, PASSWORD_GRANT, TokenGranter};
use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::UserDirectory;
use crate::token::TokenService;
use crate::types::{AuthorizationContext, ClientPrincipal, OAuth2Token};

/// Issues tokens for a username and password checked against the user
/// directory.
pub struct PasswordTokenGranter {
    users: Arc<dyn UserDirectory>,
    token_service: Arc<TokenService>,
}

impl PasswordTokenGranter {
    /// Creates a password grant strategy.
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>, token_service: Arc<TokenService>) -> Self {
        Self {
            users,
            token_service,
        }
    }
}

#[async_trait]
impl TokenGranter for PasswordTokenGranter {
    async fn grant(
        &self,
        grant_type: &str,
        client: &ClientPrincipal,
        params: &GrantParams,
    ) -> AuthResult<OAuth2Token> {
        if grant_type != PASSWORD_GRANT {
            return Err(AuthError::unsupported_grant_type(grant_type));
        }

        let (Some(username), Some(password)) = (params.get("username"), params.get("password"))
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self.users.authenticate(username, password).await?;

        tracing::debug!(
            client_id = %client.client_id,
            username = %user.username,
            "Password grant authenticated user"
        );

        let context = AuthorizationContext::new(client.clone(), user);
        self.token_service.create_access_token(&context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryTokenStore, InMemoryUserDirectory};
    use crate::token::TokenConfig;
    use crate::types::UserPrincipal;

    fn granter() -> PasswordTokenGranter {
        let users = Arc::new(InMemoryUserDirectory::new([
            UserPrincipal::new("admin", "123456", 1).with_authority("admin"),
        ])
        .unwrap());
        let service = Arc::new(TokenService::new(
            Arc::new(InMemoryTokenStore::new()),
            None,
            TokenConfig::default(),
        ));
        PasswordTokenGranter::new(users, service)
    }

    fn client() -> ClientPrincipal {
        ClientPrincipal::new("clientId", "clientSecret").with_grant_type(PASSWORD_GRANT)
    }

    fn params(password: &str) -> GrantParams {
        GrantParams::new()
            .with("username", "admin")
            .with("password", password)
    }

    #[tokio::test]
    async fn test_valid_credentials_issue_token() {
        let token = granter()
            .grant(PASSWORD_GRANT, &client(), &params("123456"))
            .await
            .unwrap();
        assert!(!token.token_value.is_empty());
        assert!(token.refresh_token.is_some());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let result = granter()
            .grant(PASSWORD_GRANT, &client(), &params("WRONG"))
            .await;
        assert_eq!(result, Err(AuthError::PasswordMismatch));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let params = GrantParams::new()
            .with("username", "nobody")
            .with("password", "123456");
        let result = granter().grant(PASSWORD_GRANT, &client(), &params).await;
        assert_eq!(result, Err(AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let params = GrantParams::new().with("username", "admin");
        let result = granter().grant(PASSWORD_GRANT, &client(), &params).await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_other_grant_type_rejected() {
        let result = granter()
            .grant("client_credentials", &client(), &params("123456"))
            .await;
        assert_eq!(
            result,
            Err(AuthError::unsupported_grant_type("client_credentials"))
        );
    }
}
