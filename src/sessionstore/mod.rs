//! SessionStore trait and implementations
//!
//! The SessionStore holds the single logged-in-user key. Only one
//! session is representable at a time.

use async_trait::async_trait;
use crate::error::Result;
use crate::types::*;

pub mod r#impl;

/// Trait for the local session key
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The currently logged-in username, if any
    async fn get(&self) -> Result<Option<Username>>;

    /// Record `username` as the logged-in user, replacing any previous
    /// value
    async fn set(&self, username: &str) -> Result<()>;

    /// Clear the logged-in user. Idempotent.
    async fn clear(&self) -> Result<()>;
}
