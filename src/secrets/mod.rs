//! Secret record service
//!
//! Adds, updates, deletes, and lists the named password records of the
//! logged-in user. Every operation resolves the session user first and
//! fails with `Error::NotAuthenticated` when no session is active.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::recordstore::RecordStore;
use crate::sessionstore::SessionStore;
use crate::types::*;

pub struct SecretRecordService {
    records: Arc<dyn RecordStore>,
    session: Arc<dyn SessionStore>,
}

impl SecretRecordService {
    pub fn new(records: Arc<dyn RecordStore>, session: Arc<dyn SessionStore>) -> Self {
        Self { records, session }
    }

    async fn current_user(&self) -> Result<Username> {
        self.session.get().await?.ok_or(Error::NotAuthenticated)
    }

    /// Store a new named password. Returns false when the current user
    /// already has a record with that name.
    pub async fn add(&self, name: &str, value: &str) -> Result<bool> {
        let username = self.current_user().await?;
        let record = SecretRecord::new(name, value);

        match self.records.create_record(&username, &record).await {
            Ok(()) => Ok(true),
            Err(Error::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the value of an existing record. Returns false when no
    /// record with that name exists; the name itself cannot be changed.
    pub async fn update(&self, name: &str, value: &str) -> Result<bool> {
        let username = self.current_user().await?;

        match self.records.update_record(&username, name, value).await {
            Ok(()) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a record. Removing a record that does not exist is a
    /// no-op; the two cases are not distinguished.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let username = self.current_user().await?;
        self.records.delete_record(&username, name).await
    }

    /// Every record owned by the current user, in no particular order.
    pub async fn list(&self) -> Result<Vec<SecretRecord>> {
        let username = self.current_user().await?;
        self.records.list_records(&username).await
    }

    /// Remove every record owned by the current user. Used when an
    /// account is deleted, since record documents are not removed
    /// automatically with the user document.
    pub async fn delete_all(&self) -> Result<()> {
        let username = self.current_user().await?;
        self.records.delete_all_records(&username).await
    }
}
