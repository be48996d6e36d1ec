//! Stashed - a password vault core
//!
//! This library provides the credential and secret-record services of a
//! password vault, built over pluggable user, record, and session
//! stores with SQLite and JSON-file reference backends.

pub mod credentials;
pub mod error;
pub mod recordstore;
pub mod secrets;
pub mod sessionstore;
pub mod suggest;
pub mod types;
pub mod userstore;

pub use credentials::CredentialService;
pub use error::{Error, Result};
pub use recordstore::RecordStore;
pub use secrets::SecretRecordService;
pub use sessionstore::SessionStore;
pub use suggest::{suggest_password, DEFAULT_SUGGESTED_LENGTH};
pub use types::*;
pub use userstore::UserStore;
