//! UserStore trait and implementations
//!
//! The UserStore holds the account documents, keyed by username.

use async_trait::async_trait;
use crate::error::Result;
use crate::types::*;

pub mod r#impl;

/// Trait for storing user accounts
///
/// The existence check and the write inside [`create_user`] must be a
/// single atomic operation against this store. Implementations backed
/// by an eventually-consistent remote store cannot extend that
/// guarantee across replicas; a registration racing on another device
/// may still win.
///
/// [`create_user`]: UserStore::create_user
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new account, hashing the password before it is stored.
    /// Fails with `Error::AlreadyExists` when the username is taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<()>;

    /// Fetch an account document
    async fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// Check a password against the stored hash. Returns false for an
    /// unknown username.
    async fn verify_password(&self, username: &str, password: &str) -> Result<bool>;

    /// Replace the stored password hash. Fails with `Error::NotFound`
    /// when the account does not exist.
    async fn update_password(&self, username: &str, new_password: &str) -> Result<()>;

    /// Delete an account document; a no-op when it does not exist.
    /// Records owned by the account are not removed with it.
    async fn delete_user(&self, username: &str) -> Result<()>;
}
