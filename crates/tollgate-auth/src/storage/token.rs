//! Token store contract and the in-memory store.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::TokenEnhancer;
use crate::types::{AuthorizationContext, OAuth2Token, RefreshToken};

/// Registry of the credentials currently issued per authorization context.
///
/// The signed-token store ([`JwtTokenStore`](crate::token::JwtTokenStore))
/// satisfies this contract without persisting anything: its store and remove
/// operations succeed and have no effect. Callers must not rely on a removal
/// being observable.
///
/// The read-check-mint-store sequence of
/// [`TokenService::create_access_token`](crate::token::TokenService::create_access_token)
/// is not atomic across calls. Concurrent first grants for one (client id,
/// username) may each mint a pair; the last one stored becomes current. A
/// store must keep its per-subject index consistent under that interleaving,
/// and a signed token it did not register must still resolve.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the access credential currently issued for the context, if any.
    async fn get_access_token(
        &self,
        context: &AuthorizationContext,
    ) -> AuthResult<Option<OAuth2Token>>;

    /// Resolves an access token value to its credential.
    async fn read_access_token(&self, token_value: &str) -> AuthResult<OAuth2Token>;

    /// Resolves an access token value to the context it was issued for.
    async fn read_authorization_context(
        &self,
        token_value: &str,
    ) -> AuthResult<AuthorizationContext>;

    /// Resolves a refresh token value to its credential and context.
    async fn read_refresh_token(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)>;

    /// Registers an access credential as current for the context.
    async fn store_access_token(
        &self,
        token: &OAuth2Token,
        context: &AuthorizationContext,
    ) -> AuthResult<()>;

    /// Registers a refresh credential for the context.
    async fn store_refresh_token(
        &self,
        token: &RefreshToken,
        context: &AuthorizationContext,
    ) -> AuthResult<()>;

    /// Forgets an access credential.
    async fn remove_access_token(&self, token_value: &str) -> AuthResult<()>;

    /// Forgets a refresh credential.
    async fn remove_refresh_token(&self, token_value: &str) -> AuthResult<()>;
}

#[derive(Debug, Clone)]
struct Stored<T> {
    token: T,
    context: AuthorizationContext,
}

/// Process-local token registry.
///
/// Indexes access credentials by value and by (client id, username), so a
/// second grant for the same subject finds and reuses the current token.
/// Contexts are stored without secrets. Nothing survives a restart and
/// nothing is shared between processes.
///
/// With a codec attached ([`with_enhancer`](Self::with_enhancer)) the maps
/// only drive reuse: reads verify and decode the token itself, so a token
/// signed by another instance sharing the secret resolves here too. Without
/// one, only registered values resolve.
#[derive(Default)]
pub struct InMemoryTokenStore {
    access_by_value: DashMap<String, Stored<OAuth2Token>>,
    access_by_subject: DashMap<(String, String), String>,
    refresh_by_value: DashMap<String, Stored<RefreshToken>>,
    enhancer: Option<Arc<dyn TokenEnhancer>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store that resolves only registered values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that resolves tokens through the codec.
    #[must_use]
    pub fn with_enhancer(enhancer: Arc<dyn TokenEnhancer>) -> Self {
        Self {
            enhancer: Some(enhancer),
            ..Self::default()
        }
    }

    /// Number of access credentials held.
    #[must_use]
    pub fn access_token_count(&self) -> usize {
        self.access_by_value.len()
    }

    /// Number of refresh credentials held.
    #[must_use]
    pub fn refresh_token_count(&self) -> usize {
        self.refresh_by_value.len()
    }
}

impl fmt::Debug for InMemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTokenStore")
            .field("access_tokens", &self.access_by_value.len())
            .field("refresh_tokens", &self.refresh_by_value.len())
            .field("verifies_signatures", &self.enhancer.is_some())
            .finish()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get_access_token(
        &self,
        context: &AuthorizationContext,
    ) -> AuthResult<Option<OAuth2Token>> {
        let Some(value) = self
            .access_by_subject
            .get(&context.subject_key())
            .map(|v| v.value().clone())
        else {
            return Ok(None);
        };
        Ok(self
            .access_by_value
            .get(&value)
            .map(|stored| stored.token.clone()))
    }

    async fn read_access_token(&self, token_value: &str) -> AuthResult<OAuth2Token> {
        if let Some(enhancer) = &self.enhancer {
            return enhancer.extract(token_value).map(|(token, _)| token);
        }
        self.access_by_value
            .get(token_value)
            .map(|stored| stored.token.clone())
            .ok_or(AuthError::TokenNotFound)
    }

    async fn read_authorization_context(
        &self,
        token_value: &str,
    ) -> AuthResult<AuthorizationContext> {
        if let Some(enhancer) = &self.enhancer {
            return enhancer.extract(token_value).map(|(_, context)| context);
        }
        self.access_by_value
            .get(token_value)
            .map(|stored| stored.context.clone())
            .ok_or(AuthError::TokenNotFound)
    }

    async fn read_refresh_token(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)> {
        if let Some(enhancer) = &self.enhancer {
            return enhancer.extract_refresh(token_value);
        }
        self.refresh_by_value
            .get(token_value)
            .map(|stored| (stored.token.clone(), stored.context.clone()))
            .ok_or(AuthError::TokenNotFound)
    }

    async fn store_access_token(
        &self,
        token: &OAuth2Token,
        context: &AuthorizationContext,
    ) -> AuthResult<()> {
        let context = context.redacted();
        // The subject entry stays locked until both maps agree.
        match self.access_by_subject.entry(context.subject_key()) {
            Entry::Occupied(mut current) => {
                let previous = current.insert(token.token_value.clone());
                if previous != token.token_value {
                    self.access_by_value.remove(&previous);
                }
                self.access_by_value.insert(
                    token.token_value.clone(),
                    Stored {
                        token: token.clone(),
                        context,
                    },
                );
            }
            Entry::Vacant(slot) => {
                self.access_by_value.insert(
                    token.token_value.clone(),
                    Stored {
                        token: token.clone(),
                        context,
                    },
                );
                slot.insert(token.token_value.clone());
            }
        }
        Ok(())
    }

    async fn store_refresh_token(
        &self,
        token: &RefreshToken,
        context: &AuthorizationContext,
    ) -> AuthResult<()> {
        self.refresh_by_value.insert(
            token.token_value.clone(),
            Stored {
                token: token.clone(),
                context: context.redacted(),
            },
        );
        Ok(())
    }

    async fn remove_access_token(&self, token_value: &str) -> AuthResult<()> {
        let subject = self
            .access_by_value
            .get(token_value)
            .map(|stored| stored.context.subject_key());
        if let Some(subject) = subject {
            if let Entry::Occupied(current) = self.access_by_subject.entry(subject) {
                if current.get() == token_value {
                    current.remove();
                }
            }
            self.access_by_value.remove(token_value);
        }
        Ok(())
    }

    async fn remove_refresh_token(&self, token_value: &str) -> AuthResult<()> {
        self.refresh_by_value.remove(token_value);
        Ok(())
    }
}
