//! RecordStore trait and implementations
//!
//! The RecordStore holds each user's collection of named password
//! records. A record's name is its identifier within that collection.

use async_trait::async_trait;
use crate::error::Result;
use crate::types::*;

pub mod r#impl;

/// Trait for managing secret record collections
///
/// Create and update guards are enforced by the store itself, so the
/// existence check and the write are one atomic operation. That only
/// holds within a single store; an implementation fronting an
/// eventually-consistent remote store cannot rule out a concurrent
/// writer on another device.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new record for `username`. Fails with
    /// `Error::AlreadyExists` when the user already has a record with
    /// that name.
    async fn create_record(&self, username: &str, record: &SecretRecord) -> Result<()>;

    /// Overwrite the value of an existing record. Fails with
    /// `Error::NotFound` when no record with that name exists. The name
    /// itself cannot be changed.
    async fn update_record(&self, username: &str, name: &str, value: &str) -> Result<()>;

    /// Remove a record; a no-op when it does not exist.
    async fn delete_record(&self, username: &str, name: &str) -> Result<()>;

    /// Every record owned by `username`. Ordering is not guaranteed.
    async fn list_records(&self, username: &str) -> Result<Vec<SecretRecord>>;

    /// Remove every record owned by `username` in one batch.
    async fn delete_all_records(&self, username: &str) -> Result<()>;
}
