//! Core types used throughout the vault

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username
pub type Username = String;

/// Name identifying a secret record within one user's collection
pub type RecordName = String;

/// User account document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A named password record owned by a user.
///
/// The stored value is private and never included in `Debug` or
/// `Display` output. Read it through [`SecretRecord::value`].
#[derive(Clone)]
pub struct SecretRecord {
    pub name: RecordName,
    value: String,
    pub created_at: DateTime<Utc>,
}

impl SecretRecord {
    /// Create a record stamped with the current time.
    pub fn new(name: impl Into<RecordName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            created_at: Utc::now(),
        }
    }

    /// Reassemble a record from stored fields.
    pub fn from_parts(name: RecordName, value: String, created_at: DateTime<Utc>) -> Self {
        Self {
            name,
            value,
            created_at,
        }
    }

    /// The stored password value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl fmt::Display for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (created {})",
            self.name,
            self.created_at.format("%Y-%m-%d")
        )
    }
}
