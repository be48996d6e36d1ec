//! JSON-file session store
//!
//! Persists the logged-in username in a small versioned JSON file so a
//! session survives process restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;
use crate::sessionstore::SessionStore;
use crate::types::*;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u8,
    username: Username,
}

/// Session store backed by a single JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<Username>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // An unreadable session file means nobody is logged in, not a
        // dead vault
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) => Ok(Some(file.username)),
            Err(e) => {
                log::warn!("ignoring malformed session file: {}", e);
                Ok(None)
            }
        }
    }

    async fn set(&self, username: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = SessionFile {
            version: 1,
            username: username.to_string(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
