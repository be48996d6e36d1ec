//! SQLite-backed user store

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::types::*;
use crate::userstore::UserStore;

/// User store over a single SQLite database file.
///
/// The connection is shared behind a mutex and all statement execution
/// runs on the blocking pool.
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    /// Open (creating if necessary) the user database at `path`.
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
        "CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
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
impl UserStore for SqliteUserStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<()> {
        let username = username.to_string();
        let password = password.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
            let created_at = Utc::now().to_rfc3339();

            let conn = lock(&conn)?;
            conn.execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                params![username, password_hash, created_at],
            )
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    Error::AlreadyExists(format!("User already exists: {}", username))
                } else {
                    Error::from(e)
                }
            })?;

            log::debug!("created user {}", username);
            Ok(())
        })
        .await
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            let mut stmt = conn.prepare(
                "SELECT username, password_hash, created_at FROM users WHERE username = ?1",
            )?;

            let mut rows = stmt.query(params![username])?;

            if let Some(row) = rows.next()? {
                let username: String = row.get(0)?;
                let password_hash: String = row.get(1)?;
                let created_at_str: String = row.get(2)?;

                let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                    .map_err(|e| Error::Internal(format!("Failed to parse date: {}", e)))?
                    .with_timezone(&Utc);

                Ok(Some(User {
                    username,
                    password_hash,
                    created_at,
                }))
            } else {
                Ok(None)
            }
        })
        .await
    }

    async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let username = username.to_string();
        let password = password.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let hash = {
                let conn = lock(&conn)?;
                let mut stmt =
                    conn.prepare("SELECT password_hash FROM users WHERE username = ?1")?;
                let mut rows = stmt.query(params![username])?;

                match rows.next()? {
                    Some(row) => {
                        let hash: String = row.get(0)?;
                        hash
                    }
                    None => return Ok(false),
                }
            };

            bcrypt::verify(&password, &hash)
                .map_err(|e| Error::Internal(format!("Failed to verify password: {}", e)))
        })
        .await
    }

    async fn update_password(&self, username: &str, new_password: &str) -> Result<()> {
        let username = username.to_string();
        let new_password = new_password.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let password_hash = bcrypt::hash(&new_password, bcrypt::DEFAULT_COST)
                .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

            let conn = lock(&conn)?;
            let affected = conn.execute(
                "UPDATE users SET password_hash = ?1 WHERE username = ?2",
                params![password_hash, username],
            )?;

            if affected == 0 {
                return Err(Error::NotFound(format!("User not found: {}", username)));
            }

            Ok(())
        })
        .await
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        let username = username.to_string();
        let conn = Arc::clone(&self.conn);

        run_blocking(move || {
            let conn = lock(&conn)?;
            let affected =
                conn.execute("DELETE FROM users WHERE username = ?1", params![username])?;

            if affected > 0 {
                log::debug!("deleted user {}", username);
            }

            Ok(())
        })
        .await
    }
}
