//! SQLite-backed record store

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::recordstore::RecordStore;
use crate::types::*;

/// Record store over a single SQLite database file.
///
/// Records are keyed by `(username, name)`, mirroring the per-user
/// document collections of the remote layout.
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Open (creating if necessary) the record database at `path`.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = run_blocking(move || {
            let conn = Connection::open(&path)?;
            init_schema(&conn)?;
            Ok(conn)
        })
        .await?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open a private in-memory database, used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = run_blocking(move || {
            let conn = Connection::open_in_memory()?;
            init_schema(&conn)?;
            Ok(conn)
        })
        .await?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            username TEXT NOT NULL,
            name TEXT NOT NULL,
            value TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (username, name)
        )",
        [],
    )?;
    Ok(())
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("blocking task failed: {}", e)))?
}

fn lock(conn: &Arc<Mutex<Connection>>) -> Result<std::sync::MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| Error::Internal("connection lock poisoned".to_string()))
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create_record(&self, username: &str, record: &SecretRecord) -> Result<()> {
        let username = username.to_string();
        let name = record.name.clone();
        let value = record.value().to_string();
        let created_at = record.created_at.to_rfc3339();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            conn.execute(
                "INSERT INTO records (username, name, value, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![username, name, value, created_at],
            )
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    Error::AlreadyExists(format!("Record already exists: {}", name))
                } else {
                    Error::from(e)
                }
            })?;

            log::debug!("stored record {} for {}", name, username);
            Ok(())
        })
        .await
    }

    async fn update_record(&self, username: &str, name: &str, value: &str) -> Result<()> {
        let username = username.to_string();
        let name = name.to_string();
        let value = value.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            let affected = conn.execute(
                "UPDATE records SET value = ?1 WHERE username = ?2 AND name = ?3",
                params![value, username, name],
            )?;

            if affected == 0 {
                return Err(Error::NotFound(format!("Record not found: {}", name)));
            }

            Ok(())
        })
        .await
    }

    async fn delete_record(&self, username: &str, name: &str) -> Result<()> {
        let username = username.to_string();
        let name = name.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            conn.execute(
                "DELETE FROM records WHERE username = ?1 AND name = ?2",
                params![username, name],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_records(&self, username: &str) -> Result<Vec<SecretRecord>> {
        let username = username.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            let mut stmt = conn
                .prepare("SELECT name, value, created_at FROM records WHERE username = ?1")?;

            let mut rows = stmt.query(params![username])?;
            let mut records = Vec::new();

            while let Some(row) = rows.next()? {
                let name: String = row.get(0)?;
                let value: String = row.get(1)?;
                let created_at_str: String = row.get(2)?;

                let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                    .map_err(|e| Error::Internal(format!("Failed to parse date: {}", e)))?
                    .with_timezone(&Utc);

                records.push(SecretRecord::from_parts(name, value, created_at));
            }

            Ok(records)
        })
        .await
    }

    async fn delete_all_records(&self, username: &str) -> Result<()> {
        let username = username.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            let affected =
                conn.execute("DELETE FROM records WHERE username = ?1", params![username])?;

            if affected > 0 {
                log::debug!("deleted {} records for {}", affected, username);
            }

            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_list_records() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        store
            .create_record("alice", &SecretRecord::new("email", "xyz"))
            .await
            .unwrap();
        store
            .create_record("alice", &SecretRecord::new("bank", "abc"))
            .await
            .unwrap();

        let records = store.list_records("alice").await.unwrap();
        assert_eq!(records.len(), 2);

        let email = records.iter().find(|r| r.name == "email").unwrap();
        assert_eq!(email.value(), "xyz");
    }

    #[tokio::test]
    async fn test_create_duplicate_record_fails() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        store
            .create_record("alice", &SecretRecord::new("email", "xyz"))
            .await
            .unwrap();

        let err = store
            .create_record("alice", &SecretRecord::new("email", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        // The original value survives
        let records = store.list_records("alice").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value(), "xyz");
    }

    #[tokio::test]
    async fn test_same_name_different_users() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        store
            .create_record("alice", &SecretRecord::new("email", "xyz"))
            .await
            .unwrap();
        store
            .create_record("bob", &SecretRecord::new("email", "qrs"))
            .await
            .unwrap();

        let alice = store.list_records("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].value(), "xyz");

        let bob = store.list_records("bob").await.unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].value(), "qrs");
    }

    #[tokio::test]
    async fn test_update_record() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        store
            .create_record("alice", &SecretRecord::new("email", "xyz"))
            .await
            .unwrap();
        store.update_record("alice", "email", "new").await.unwrap();

        let records = store.list_records("alice").await.unwrap();
        assert_eq!(records[0].value(), "new");
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        let err = store.update_record("alice", "email", "new").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        assert!(store.list_records("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_record_absent_is_noop() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        store.delete_record("alice", "email").await.unwrap();

        store
            .create_record("alice", &SecretRecord::new("email", "xyz"))
            .await
            .unwrap();
        store.delete_record("alice", "email").await.unwrap();
        store.delete_record("alice", "email").await.unwrap();

        assert!(store.list_records("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_records() {
        let store = SqliteRecordStore::open_in_memory().await.unwrap();

        for name in ["email", "bank", "wifi"] {
            store
                .create_record("alice", &SecretRecord::new(name, "v"))
                .await
                .unwrap();
        }
        store
            .create_record("bob", &SecretRecord::new("email", "qrs"))
            .await
            .unwrap();

        store.delete_all_records("alice").await.unwrap();

        assert!(store.list_records("alice").await.unwrap().is_empty());
        // Other users are untouched
        assert_eq!(store.list_records("bob").await.unwrap().len(), 1);

        // Repeating the batch delete is harmless
        store.delete_all_records("alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_reopen_persists_records() {
        let tmp_dir = TempDir::new().unwrap();
        let db_path = tmp_dir.path().join("records.db");

        {
            let store = SqliteRecordStore::open(&db_path).await.unwrap();
            store
                .create_record("alice", &SecretRecord::new("email", "xyz"))
                .await
                .unwrap();
        }

        let store = SqliteRecordStore::open(&db_path).await.unwrap();
        let records = store.list_records("alice").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "email");
        assert_eq!(records[0].value(), "xyz");
    }
}
