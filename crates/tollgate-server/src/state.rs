//! Shared application state assembled from configuration.

use std::sync::Arc;

use tollgate_auth::config::{AuthConfig, TokenStoreKind};
use tollgate_auth::endpoint::{ClientAuthBuilder, ResourceAuthBuilder};
use tollgate_auth::grant::{
    CompositeTokenGranter, PASSWORD_GRANT, PasswordTokenGranter, REFRESH_TOKEN_GRANT,
    RefreshTokenGranter, TokenGranter,
};
use tollgate_auth::secret;
use tollgate_auth::storage::{
    ClientDirectory, InMemoryClientDirectory, InMemoryTokenStore, InMemoryUserDirectory,
    TokenStore, UserDirectory,
};
use tollgate_auth::token::{
    JwtService, JwtTokenEnhancer, JwtTokenStore, TokenConfig, TokenEnhancer, TokenService,
};

use crate::error::ServerError;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
    pub granter: Arc<CompositeTokenGranter>,
    pub client_auth: Arc<ClientAuthBuilder>,
    pub resource_auth: Arc<ResourceAuthBuilder>,
}

impl AppState {
    /// Builds directories, the token pipeline and the grant registry.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let jwt_service = Arc::new(JwtService::new(
            config.signing.secret.as_bytes(),
            config.signing_algorithm()?,
            config.issuer.clone(),
        ));
        let enhancer: Arc<dyn TokenEnhancer> = Arc::new(JwtTokenEnhancer::new(jwt_service));

        let store: Arc<dyn TokenStore> = match config.token_store {
            TokenStoreKind::Stateless => Arc::new(JwtTokenStore::new(enhancer.clone())),
            TokenStoreKind::Memory => {
                Arc::new(InMemoryTokenStore::with_enhancer(enhancer.clone()))
            }
        };

        let token_service = Arc::new(TokenService::new(
            store,
            Some(enhancer),
            TokenConfig::new().with_access_token_expiry(config.access_token_expiry),
        ));

        let plaintext = config
            .clients
            .iter()
            .map(|c| c.client_secret.as_str())
            .chain(config.users.iter().map(|u| u.password.as_str()))
            .filter(|value| !secret::is_hashed(value))
            .count();
        if plaintext > 0 {
            tracing::warn!(
                count = plaintext,
                "Plaintext credentials in configuration; hashing them at startup"
            );
        }

        let clients: Arc<dyn ClientDirectory> = Arc::new(
            InMemoryClientDirectory::new(config.clients.iter().cloned())
                .map_err(|e| ServerError::Config(format!("client directory: {e}")))?,
        );
        let users: Arc<dyn UserDirectory> = Arc::new(
            InMemoryUserDirectory::new(config.users.iter().cloned())
                .map_err(|e| ServerError::Config(format!("user directory: {e}")))?,
        );

        let mut granter = CompositeTokenGranter::new();
        for grant_type in &config.grant_types {
            let strategy: Arc<dyn TokenGranter> = match grant_type.as_str() {
                PASSWORD_GRANT => Arc::new(PasswordTokenGranter::new(
                    users.clone(),
                    token_service.clone(),
                )),
                REFRESH_TOKEN_GRANT => Arc::new(RefreshTokenGranter::new(
                    users.clone(),
                    token_service.clone(),
                )),
                other => {
                    return Err(ServerError::Config(format!(
                        "no strategy for grant type '{other}'"
                    )));
                }
            };
            granter.register(grant_type.clone(), strategy);
        }

        tracing::info!(
            clients = config.clients.len(),
            users = config.users.len(),
            grant_types = ?granter.grant_types(),
            token_store = ?config.token_store,
            access_token_expiry = ?config.access_token_expiry,
            "Token service initialized"
        );

        Ok(Self {
            token_service: token_service.clone(),
            granter: Arc::new(granter),
            client_auth: Arc::new(ClientAuthBuilder::new(clients)),
            resource_auth: Arc::new(ResourceAuthBuilder::new(token_service)),
        })
    }
}
