//! Admin-only account management.
//!
//! Every operation takes the caller's [`Session`] and rejects non-admin
//! callers before touching storage. Usernames are unique, matched
//! case-sensitively, and there is no update: accounts are added and removed
//! whole.

use crate::error::{Error, Result};
use crate::model::{Role, Session, User};
use crate::seed::default_users;
use crate::store::{Store, KEY_USERS};
use crate::StorageBackend;

/// Account management over the persisted user list.
#[derive(Clone)]
pub struct UserAdmin<B: StorageBackend> {
    store: Store<B>,
}

impl<B: StorageBackend> UserAdmin<B> {
    pub fn new(store: Store<B>) -> Self {
        UserAdmin { store }
    }

    /// The full account list.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not an admin
    pub async fn list(&self, session: &Session) -> Result<Vec<User>> {
        session.require_admin()?;
        Ok(self.store.get_or(KEY_USERS, default_users()).await)
    }

    /// Add an account.
    ///
    /// # Errors
    /// - `Error::Unauthorized` when the session is not an admin
    /// - `Error::Validation` when a field is empty or the username is taken
    pub async fn add_user(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<User> {
        session.require_admin()?;

        if username.trim().is_empty() || password.trim().is_empty() || display_name.trim().is_empty()
        {
            return Err(Error::validation("username", "All fields are required"));
        }

        let mut users: Vec<User> = self.store.get_or(KEY_USERS, default_users()).await;
        if users.iter().any(|u| u.username == username) {
            return Err(Error::validation("username", "Username already exists"));
        }

        let user = User {
            username: username.to_string(),
            password: password.to_string(),
            role,
            display_name: display_name.to_string(),
        };
        users.push(user.clone());
        self.store.set(KEY_USERS, &users).await?;

        info!("Added {} account {}", user.role, user.username);
        Ok(user)
    }

    /// Remove an account by username. A no-op when the username is absent.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when the session is not an admin
    pub async fn delete_user(&self, session: &Session, username: &str) -> Result<()> {
        session.require_admin()?;

        let mut users: Vec<User> = self.store.get_or(KEY_USERS, default_users()).await;
        let before = users.len();
        users.retain(|u| u.username != username);

        if users.len() != before {
            self.store.set(KEY_USERS, &users).await?;
            info!("Removed account {}", username);
        }
        Ok(())
    }
}
