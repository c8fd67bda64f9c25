//! Session store: at most one active authenticated identity.
//!
//! Credentials are matched in plaintext against the stored user list, exactly
//! as the system this engine models does. There is no expiry: a session lives
//! until logout or until the storage is cleared.

use crate::error::{Error, Result};
use crate::model::{Session, User};
use crate::seed::default_users;
use crate::store::{Store, KEY_SESSION, KEY_USERS};
use crate::StorageBackend;
use chrono::Utc;

/// Login, logout, and current-session lookup over the persisted session value.
#[derive(Clone)]
pub struct SessionStore<B: StorageBackend> {
    store: Store<B>,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(store: Store<B>) -> Self {
        SessionStore { store }
    }

    /// Authenticate and persist a session.
    ///
    /// Replaces any existing session; there is never more than one.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` when no user matches the credentials
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let users: Vec<User> = self.store.get_or(KEY_USERS, default_users()).await;

        let user = users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or_else(|| Error::Unauthorized("Invalid username or password.".to_string()))?;

        let session = Session {
            username: user.username.clone(),
            role: user.role,
            display_name: user.display_name.clone(),
            login_at: Utc::now().to_rfc3339(),
        };

        self.store.set(KEY_SESSION, &session).await?;
        info!("Session opened for {} ({})", session.username, session.role);
        Ok(session)
    }

    /// The active session, if any.
    pub async fn current(&self) -> Option<Session> {
        self.store.get(KEY_SESSION).await
    }

    /// Drop the active session. A no-op when nobody is logged in.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot be written
    pub async fn logout(&self) -> Result<()> {
        self.store.remove(KEY_SESSION).await
    }
}
