//! Token lifecycle management.
//!
//! [`TokenService`] decides whether a grant reuses the credential already
//! issued for a subject or mints a new pair, and resolves presented bearer
//! tokens back to the [`AuthorizationContext`] they were issued for.
//!
//! # Usage
//!
//! ```ignore
//! use tollgate_auth::token::{TokenConfig, TokenService};
//!
//! let service = TokenService::new(store, Some(enhancer), TokenConfig::default());
//! let token = service.create_access_token(&context).await?;
//! let resolved = service.get_authorization_context(&token.token_value).await?;
//! ```

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::config::AccessTokenExpiry;
use crate::error::AuthError;
use crate::storage::TokenStore;
use crate::token::enhancer::TokenEnhancer;
use crate::types::{
    AuthorizationContext, BEARER_TOKEN_TYPE, ClientPrincipal, OAuth2Token, RefreshToken,
};

/// Configuration for the token service.
#[derive(Debug, Clone, Default)]
pub struct TokenConfig {
    /// Which client validity window sets the access token expiry.
    pub access_token_expiry: AccessTokenExpiry,
}

impl TokenConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets which validity window the access token expiry is derived from.
    #[must_use]
    pub fn with_access_token_expiry(mut self, expiry: AccessTokenExpiry) -> Self {
        self.access_token_expiry = expiry;
        self
    }
}

/// Token lifecycle manager.
pub struct TokenService {
    /// Registry of current credentials.
    store: Arc<dyn TokenStore>,

    /// Codec applied to freshly minted credentials. Without one, tokens keep
    /// their random value and the `bearer` type tag.
    enhancer: Option<Arc<dyn TokenEnhancer>>,

    /// Service configuration.
    config: TokenConfig,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        enhancer: Option<Arc<dyn TokenEnhancer>>,
        config: TokenConfig,
    ) -> Self {
        Self {
            store,
            enhancer,
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issues an access credential for the context.
    ///
    /// A still-valid credential already issued for the same subject is
    /// returned unchanged. Otherwise the expired one is dropped, its refresh
    /// credential is kept if still valid, and a new access credential is
    /// minted around it.
    ///
    /// # Errors
    ///
    /// Propagates store and codec errors unchanged.
    pub async fn create_access_token(
        &self,
        context: &AuthorizationContext,
    ) -> AuthResult<OAuth2Token> {
        let mut refresh_token = None;

        if let Some(existing) = self.store.get_access_token(context).await? {
            if !existing.is_expired() {
                self.store.store_access_token(&existing, context).await?;
                tracing::debug!(
                    client_id = %context.client.client_id,
                    username = %context.user.username,
                    "Reusing current access token"
                );
                return Ok(existing);
            }

            self.store.remove_access_token(&existing.token_value).await?;
            if let Some(refresh) = existing.refresh_token {
                self.store.remove_refresh_token(&refresh.token_value).await?;
                refresh_token = Some(refresh);
            }
        }

        let refresh_token = match refresh_token {
            Some(refresh) if !refresh.is_expired() => refresh,
            _ => self.mint_refresh_token(context)?,
        };

        let token = self.mint_access_token(context, refresh_token.clone())?;

        self.store.store_refresh_token(&refresh_token, context).await?;
        self.store.store_access_token(&token, context).await?;

        tracing::debug!(
            client_id = %context.client.client_id,
            username = %context.user.username,
            token_type = %token.token_type,
            "Issued access token"
        );

        Ok(token)
    }

    /// Issues a new access credential for the context, keeping the presented
    /// refresh credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExpiredToken` if the refresh credential has
    /// expired. Store and codec errors propagate unchanged.
    pub async fn refresh_access_token(
        &self,
        context: &AuthorizationContext,
        refresh_token: RefreshToken,
    ) -> AuthResult<OAuth2Token> {
        if refresh_token.is_expired() {
            return Err(AuthError::ExpiredToken);
        }

        if let Some(existing) = self.store.get_access_token(context).await? {
            self.store.remove_access_token(&existing.token_value).await?;
        }

        let token = self.mint_access_token(context, refresh_token.clone())?;

        self.store.store_refresh_token(&refresh_token, context).await?;
        self.store.store_access_token(&token, context).await?;

        tracing::debug!(
            client_id = %context.client.client_id,
            username = %context.user.username,
            "Refreshed access token"
        );

        Ok(token)
    }

    /// Returns the access credential currently registered for the context.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn get_access_token(
        &self,
        context: &AuthorizationContext,
    ) -> AuthResult<Option<OAuth2Token>> {
        self.store.get_access_token(context).await
    }

    /// Verifies and decodes an access token value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSignature`, `AuthError::Malformed` or
    /// `AuthError::TokenNotFound` depending on the store.
    pub async fn read_access_token(&self, token_value: &str) -> AuthResult<OAuth2Token> {
        self.store.read_access_token(token_value).await
    }

    /// Resolves an access token value to the context it was issued for.
    ///
    /// Expired tokens are never resolved; the caller has to go through a
    /// grant again.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExpiredToken` if the token has expired, or any
    /// error of [`read_access_token`](Self::read_access_token).
    pub async fn get_authorization_context(
        &self,
        token_value: &str,
    ) -> AuthResult<AuthorizationContext> {
        let token = self.read_access_token(token_value).await?;
        if token.is_expired() {
            return Err(AuthError::ExpiredToken);
        }
        self.store.read_authorization_context(token_value).await
    }

    /// Verifies and decodes a refresh token value.
    ///
    /// # Errors
    ///
    /// Propagates store and codec errors unchanged. Expiry is not checked.
    pub async fn read_refresh_token(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)> {
        self.store.read_refresh_token(token_value).await
    }

    fn mint_refresh_token(&self, context: &AuthorizationContext) -> AuthResult<RefreshToken> {
        let token = RefreshToken {
            token_type: BEARER_TOKEN_TYPE.to_string(),
            token_value: Uuid::new_v4().to_string(),
            expires_at: Some(expiry_after(context.client.refresh_token_validity)?),
        };

        match &self.enhancer {
            Some(enhancer) => enhancer.enhance_refresh(token, context),
            None => Ok(token),
        }
    }

    fn mint_access_token(
        &self,
        context: &AuthorizationContext,
        refresh_token: RefreshToken,
    ) -> AuthResult<OAuth2Token> {
        let token = OAuth2Token {
            token_type: BEARER_TOKEN_TYPE.to_string(),
            token_value: Uuid::new_v4().to_string(),
            expires_at: Some(expiry_after(self.access_validity(&context.client))?),
            refresh_token: Some(refresh_token),
        };

        match &self.enhancer {
            Some(enhancer) => enhancer.enhance(token, context),
            None => Ok(token),
        }
    }

    fn access_validity(&self, client: &ClientPrincipal) -> std::time::Duration {
        self.config.access_token_expiry.validity(client)
    }
}

fn expiry_after(validity: std::time::Duration) -> AuthResult<OffsetDateTime> {
    time::Duration::try_from(validity)
        .ok()
        .and_then(|validity| OffsetDateTime::now_utc().checked_add(validity))
        .ok_or_else(|| AuthError::internal("token validity out of range"))
}
