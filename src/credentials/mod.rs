//! Credential service
//!
//! Registers and authenticates users, changes account passwords, and
//! owns the session-store key. Expected rejections (taken username,
//! wrong password) come back as `Ok(false)`; store failures propagate
//! as errors.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sessionstore::SessionStore;
use crate::types::Username;
use crate::userstore::UserStore;

pub struct CredentialService {
    users: Arc<dyn UserStore>,
    session: Arc<dyn SessionStore>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, session: Arc<dyn SessionStore>) -> Self {
        Self { users, session }
    }

    /// Create a new account. Returns false when the username is already
    /// taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool> {
        match self.users.create_user(username, password).await {
            Ok(()) => {
                log::info!("registered user {}", username);
                Ok(true)
            }
            Err(Error::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Log a user in. On success the session key is set to `username`;
    /// on a failed login the session is left untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        if self.users.verify_password(username, password).await? {
            self.session.set(username).await?;
            log::info!("user {} logged in", username);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Change an account password. Returns false when the account does
    /// not exist or `old_password` does not match; nothing is written
    /// in that case.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        if !self.users.verify_password(username, old_password).await? {
            return Ok(false);
        }

        match self.users.update_password(username, new_password).await {
            Ok(()) => Ok(true),
            // Account removed between the check and the write
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// End the current session. Safe to call with no session active.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }

    /// The username of the currently logged-in user, if any.
    pub async fn logged_in_user(&self) -> Result<Option<Username>> {
        self.session.get().await
    }

    /// Delete the logged-in user's account and end the session. With no
    /// session active the store is untouched, but the session key is
    /// still cleared.
    ///
    /// Record documents are not removed with the account; callers
    /// deleting an account should clear them first (see
    /// `SecretRecordService::delete_all`).
    pub async fn delete_account(&self) -> Result<()> {
        if let Some(username) = self.session.get().await? {
            self.users.delete_user(&username).await?;
            log::info!("deleted account {}", username);
        }
        self.session.clear().await
    }
}
