//! Client directory.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::secret;
use crate::types::ClientPrincipal;

/// Lookup of registered clients.
///
/// The contract is read-only. A remote directory can replace the in-memory
/// one without touching callers.
///
/// # Example
///
/// ```ignore
/// let client = directory.authenticate("clientId", "clientSecret").await?;
/// assert!(client.allows_grant_type("password"));
/// ```
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Finds a client by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if no client is registered under `client_id`.
    async fn lookup(&self, client_id: &str) -> AuthResult<ClientPrincipal>;

    /// Checks a presented secret against the client's stored Argon2 hash.
    ///
    /// # Errors
    ///
    /// Returns `ClientSecretMismatch` if the secret differs, or `Internal`
    /// if the stored value is not a PHC hash.
    fn verify(&self, client: &ClientPrincipal, presented: &str) -> AuthResult<()> {
        if secret::verify_secret(presented, &client.client_secret)? {
            Ok(())
        } else {
            Err(AuthError::ClientSecretMismatch)
        }
    }

    /// Looks a client up and verifies its secret in one step.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` or `ClientSecretMismatch`.
    async fn authenticate(&self, client_id: &str, secret: &str) -> AuthResult<ClientPrincipal> {
        let client = self.lookup(client_id).await?;
        self.verify(&client, secret)?;
        Ok(client)
    }
}

/// Fixed client mapping built once at startup.
#[derive(Debug, Default)]
pub struct InMemoryClientDirectory {
    clients: HashMap<String, ClientPrincipal>,
}

impl InMemoryClientDirectory {
    /// Builds the directory, hashing any plaintext secret. A later entry
    /// with a duplicate id wins.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a secret cannot be hashed.
    pub fn new(clients: impl IntoIterator<Item = ClientPrincipal>) -> AuthResult<Self> {
        let clients = clients
            .into_iter()
            .map(|mut client| -> AuthResult<(String, ClientPrincipal)> {
                client.client_secret = secret::ensure_hashed(&client.client_secret)?;
                Ok((client.client_id.clone(), client))
            })
            .collect::<AuthResult<_>>()?;
        Ok(Self { clients })
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns `true` if no client is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientDirectory for InMemoryClientDirectory {
    async fn lookup(&self, client_id: &str) -> AuthResult<ClientPrincipal> {
        self.clients
            .get(client_id)
            .cloned()
            .ok_or(AuthError::ClientNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryClientDirectory {
        InMemoryClientDirectory::new([
            ClientPrincipal::new("clientId", "clientSecret").with_grant_type("password"),
            ClientPrincipal::new("other", "otherSecret"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_known_pairs_verify() {
        let directory = directory();
        for (id, secret) in [("clientId", "clientSecret"), ("other", "otherSecret")] {
            let client = directory.authenticate(id, secret).await.unwrap();
            assert_eq!(client.client_id, id);
        }
        assert_eq!(directory.len(), 2);
    }

    #[tokio::test]
    async fn test_wrong_secret_mismatch() {
        let directory = directory();
        for secret in ["", "clientsecret", "otherSecret", "clientSecret "] {
            let err = directory.authenticate("clientId", secret).await.unwrap_err();
            assert_eq!(err, AuthError::ClientSecretMismatch);
        }
    }

    #[tokio::test]
    async fn test_unknown_client_not_found() {
        let err = directory()
            .authenticate("missing", "clientSecret")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::ClientNotFound);
    }

    #[tokio::test]
    async fn test_secrets_are_stored_hashed() {
        let client = directory().lookup("clientId").await.unwrap();
        assert!(client.client_secret.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_configured_hash_is_kept() {
        let hash = secret::hash_secret("clientSecret").unwrap();
        let directory =
            InMemoryClientDirectory::new([ClientPrincipal::new("clientId", hash.clone())])
                .unwrap();
        assert_eq!(directory.lookup("clientId").await.unwrap().client_secret, hash);
        directory.authenticate("clientId", "clientSecret").await.unwrap();
        assert_eq!(
            directory.authenticate("clientId", &hash).await.unwrap_err(),
            AuthError::ClientSecretMismatch
        );
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let directory = InMemoryClientDirectory::default();
        assert!(directory.is_empty());
        assert_eq!(
            directory.lookup("clientId").await.unwrap_err(),
            AuthError::ClientNotFound
        );
    }
}
