//! SQLite backend. Same contracts as the in-memory store, durable on disk.

pub mod migrations;
pub mod models;
pub mod queries;
mod repos;

use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use rusqlite::Connection;
use tracing::{error, info};

use murmur_types::{ChatError, Result};

pub use repos::{SqliteAuthRepo, SqlitePrivateRepo, SqlitePublicRepo};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("opening {}", path.display()))?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("enabling WAL journal mode")?;

        migrations::run(&conn).with_context(|| format!("migrating {}", path.display()))?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` while holding the connection. Each repository call is one
    /// `with_conn`, which makes its check-then-write sequence atomic.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            error!("DB lock poisoned: {}", e);
            ChatError::Internal(format!("DB lock poisoned: {}", e))
        })?;
        f(&conn)
    }
}

/// Map a driver failure onto the shared error type.
pub(crate) fn storage(e: rusqlite::Error) -> ChatError {
    error!("sqlite error: {}", e);
    ChatError::Storage(e.to_string())
}
