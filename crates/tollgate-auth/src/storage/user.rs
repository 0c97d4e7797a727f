//! User directory.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::secret;
use crate::types::UserPrincipal;

/// Lookup of registered resource owners.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no user is registered under `username`.
    async fn lookup(&self, username: &str) -> AuthResult<UserPrincipal>;

    /// Checks a presented password against the user's stored Argon2 hash.
    ///
    /// # Errors
    ///
    /// Returns `PasswordMismatch` if the password differs, or `Internal` if
    /// the stored value is not a PHC hash.
    fn verify(&self, user: &UserPrincipal, password: &str) -> AuthResult<()> {
        if secret::verify_secret(password, &user.password)? {
            Ok(())
        } else {
            Err(AuthError::PasswordMismatch)
        }
    }

    /// Looks a user up and verifies the password in one step.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` or `PasswordMismatch`.
    async fn authenticate(&self, username: &str, password: &str) -> AuthResult<UserPrincipal> {
        let user = self.lookup(username).await?;
        self.verify(&user, password)?;
        Ok(user)
    }
}

/// Fixed user mapping built once at startup.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, UserPrincipal>,
}

impl InMemoryUserDirectory {
    /// Builds the directory, hashing any plaintext password. A later entry
    /// with a duplicate username wins.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if a password cannot be hashed.
    pub fn new(users: impl IntoIterator<Item = UserPrincipal>) -> AuthResult<Self> {
        let users = users
            .into_iter()
            .map(|mut user| -> AuthResult<(String, UserPrincipal)> {
                user.password = secret::ensure_hashed(&user.password)?;
                Ok((user.username.clone(), user))
            })
            .collect::<AuthResult<_>>()?;
        Ok(Self { users })
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no user is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn lookup(&self, username: &str) -> AuthResult<UserPrincipal> {
        self.users
            .get(username)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }
}
