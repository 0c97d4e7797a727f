//! Grant strategy registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{GrantParams, TokenGranter};
use crate::AuthResult;
use crate::error::AuthError;
use crate::types::{ClientPrincipal, OAuth2Token};

/// Dispatches grants to the strategy registered for the grant type.
///
/// Two checks run before delegation, in this order:
///
/// 1. The client must list the grant type (`UnsupportedOperation`).
/// 2. A strategy must be registered for it (`UnsupportedGrantType`).
///
/// A client may be allowed a grant type the server has no strategy for, and
/// the server may support a grant type a client is not allowed to use.
#[derive(Default)]
pub struct CompositeTokenGranter {
    granters: HashMap<String, Arc<dyn TokenGranter>>,
}

impl CompositeTokenGranter {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy for a grant type.
    #[must_use]
    pub fn with_granter(
        mut self,
        grant_type: impl Into<String>,
        granter: Arc<dyn TokenGranter>,
    ) -> Self {
        self.register(grant_type, granter);
        self
    }

    /// Registers a strategy for a grant type, replacing any previous one.
    pub fn register(&mut self, grant_type: impl Into<String>, granter: Arc<dyn TokenGranter>) {
        self.granters.insert(grant_type.into(), granter);
    }

    /// Returns `true` if a strategy is registered for the grant type.
    #[must_use]
    pub fn supports(&self, grant_type: &str) -> bool {
        self.granters.contains_key(grant_type)
    }

    /// Registered grant types, sorted.
    #[must_use]
    pub fn grant_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.granters.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

#[async_trait]
impl TokenGranter for CompositeTokenGranter {
    async fn grant(
        &self,
        grant_type: &str,
        client: &ClientPrincipal,
        params: &GrantParams,
    ) -> AuthResult<OAuth2Token> {
        if !client.allows_grant_type(grant_type) {
            return Err(AuthError::unsupported_operation(grant_type));
        }

        let granter = self
            .granters
            .get(grant_type)
            .ok_or_else(|| AuthError::unsupported_grant_type(grant_type))?;

        tracing::trace!(client_id = %client.client_id, grant_type, "Dispatching grant");

        granter.grant(grant_type, client, params).await
    }
}
