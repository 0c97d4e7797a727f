//! Refresh token grant.

use std::sync::Arc;

use async_trait::async_trait;

use super::{GrantParams, REFRESH_TOKEN_GRANT, TokenGranter};
use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::UserDirectory;
use crate::token::TokenService;
use crate::types::{AuthorizationContext, ClientPrincipal, OAuth2Token};

/// Issues a new access token in exchange for a refresh token previously
/// issued to the same client.
///
/// The user is looked up again so that changed authorities are picked up.
/// The refresh token itself is kept, not rotated.
pub struct RefreshTokenGranter {
    users: Arc<dyn UserDirectory>,
    token_service: Arc<TokenService>,
}

impl RefreshTokenGranter {
    /// Creates a refresh grant strategy.
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>, token_service: Arc<TokenService>) -> Self {
        Self {
            users,
            token_service,
        }
    }
}

#[async_trait]
impl TokenGranter for RefreshTokenGranter {
    async fn grant(
        &self,
        grant_type: &str,
        client: &ClientPrincipal,
        params: &GrantParams,
    ) -> AuthResult<OAuth2Token> {
        if grant_type != REFRESH_TOKEN_GRANT {
            return Err(AuthError::unsupported_grant_type(grant_type));
        }

        let Some(value) = params.get("refresh_token") else {
            return Err(AuthError::invalid_grant("refresh_token is required"));
        };

        let (refresh_token, issued) = self.token_service.read_refresh_token(value).await?;
        if refresh_token.is_expired() {
            return Err(AuthError::ExpiredToken);
        }
        if issued.client.client_id != client.client_id {
            return Err(AuthError::invalid_grant(
                "refresh token was issued to another client",
            ));
        }

        let user = self.users.lookup(&issued.user.username).await?;

        tracing::debug!(
            client_id = %client.client_id,
            username = %user.username,
            "Refresh grant accepted"
        );

        let context = AuthorizationContext::new(client.clone(), user);
        self.token_service
            .refresh_access_token(&context, refresh_token)
            .await
    }
}
