//! Token store backed only by the signed token codec.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::storage::TokenStore;
use crate::token::enhancer::TokenEnhancer;
use crate::types::{AuthorizationContext, OAuth2Token, RefreshToken};

/// A [`TokenStore`] that stores nothing.
///
/// Every token carries its own context, so reads verify and decode the value
/// through the codec. Store and remove operations are no-ops that always
/// succeed, and [`get_access_token`](TokenStore::get_access_token) never finds
/// a current credential: each grant mints a fresh pair.
pub struct JwtTokenStore {
    enhancer: Arc<dyn TokenEnhancer>,
}

impl JwtTokenStore {
    /// Creates a store reading through the given codec.
    #[must_use]
    pub fn new(enhancer: Arc<dyn TokenEnhancer>) -> Self {
        Self { enhancer }
    }
}

#[async_trait]
impl TokenStore for JwtTokenStore {
    async fn get_access_token(
        &self,
        _context: &AuthorizationContext,
    ) -> AuthResult<Option<OAuth2Token>> {
        Ok(None)
    }

    async fn read_access_token(&self, token_value: &str) -> AuthResult<OAuth2Token> {
        let (token, _) = self.enhancer.extract(token_value)?;
        Ok(token)
    }

    async fn read_authorization_context(
        &self,
        token_value: &str,
    ) -> AuthResult<AuthorizationContext> {
        let (_, context) = self.enhancer.extract(token_value)?;
        Ok(context)
    }

    async fn read_refresh_token(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)> {
        self.enhancer.extract_refresh(token_value)
    }

    async fn store_access_token(
        &self,
        _token: &OAuth2Token,
        _context: &AuthorizationContext,
    ) -> AuthResult<()> {
        Ok(())
    }

    async fn store_refresh_token(
        &self,
        _token: &RefreshToken,
        _context: &AuthorizationContext,
    ) -> AuthResult<()> {
        Ok(())
    }

    async fn remove_access_token(&self, _token_value: &str) -> AuthResult<()> {
        Ok(())
    }

    async fn remove_refresh_token(&self, _token_value: &str) -> AuthResult<()> {
        Ok(())
    }
}
