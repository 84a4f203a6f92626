//! Relational record of known card files and their contacts.
//!
//! # Invariants
//! - One FILE row per synchronized card file; `file_name` is unique.
//! - One CONTACT row per FILE row; deleting the FILE row removes it.
//! - Every mutating call commits on its own (autocommit).
//! - While disconnected every operation is a no-op returning an empty result.

mod repo;
pub mod schema;

use std::fmt;
use std::path::{Path, PathBuf};

pub use repo::{RecordRepository, local_now};

pub type DbResult<T> = Result<T, DbError>;

/// Error type for database operations
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Login credentials. The password is accepted for parity with server
/// databases but never verified, logged or shown.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl Credentials {
    /// Database file these credentials point at, or why they can't point anywhere.
    pub fn database_path(&self, data_dir: &Path) -> DbResult<PathBuf> {
        let host = self.host.trim();
        if !matches!(host, "" | "localhost" | "127.0.0.1") {
            return Err(DbError::Connection(format!("unknown host '{host}'")));
        }
        let name = self.database.trim();
        if name.is_empty() {
            return Err(DbError::Connection("no database selected".to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DbError::Connection(format!(
                "invalid database name '{name}'"
            )));
        }
        Ok(data_dir.join(format!("{name}.sqlite3")))
    }
}
