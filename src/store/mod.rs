//! Secret record storage — SQLite rows of (id, label, blob, created_at).
//!
//! The store is plain CRUD: it holds the packed encrypted blob as an
//! opaque value and performs no cryptographic validation. Records are
//! never updated in place — a changed secret is a new record.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{LockboxError, Result};

/// One row of the listing view (the blob is not loaded for lists).
#[derive(Debug, Clone)]
pub struct SecretEntry {
    pub id: i64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed secret store.
pub struct SecretStore {
    conn: Connection,
}

impl SecretStore {
    /// Open (or create) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| LockboxError::Store(format!("cannot open database: {e}")))?;

        // Restrict the database file to the owner.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS secrets (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                label      TEXT NOT NULL,
                blob       BLOB NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .map_err(|e| LockboxError::Store(format!("cannot create schema: {e}")))?;

        Ok(Self { conn })
    }

    /// Insert a new record and return its id.
    pub fn insert(&self, label: &str, blob: &[u8]) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO secrets (label, blob, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![label, blob, now],
            )
            .map_err(|e| LockboxError::Store(format!("insert: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a record's label and packed blob by id.
    pub fn get_by_id(&self, id: i64) -> Result<Option<(String, Vec<u8>)>> {
        self.conn
            .query_row(
                "SELECT label, blob FROM secrets WHERE id = ?1",
                rusqlite::params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| LockboxError::Store(format!("get: {e}")))
    }

    /// List all records (id, label, created_at), oldest first.
    pub fn list(&self) -> Result<Vec<SecretEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label, created_at FROM secrets ORDER BY id")
            .map_err(|e| LockboxError::Store(format!("list prepare: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let ts_str: String = row.get(2)?;
                // A row whose timestamp no longer parses has been
                // edited or damaged; report it rather than invent a date.
                let created_at = DateTime::parse_from_rfc3339(&ts_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;

                Ok(SecretEntry {
                    id: row.get(0)?,
                    label: row.get(1)?,
                    created_at,
                })
            })
            .map_err(|e| LockboxError::Store(format!("list exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| LockboxError::Store(format!("row parse: {e}")))?);
        }
        Ok(entries)
    }

    /// Delete a record by id; returns the number of rows removed.
    pub fn delete(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM secrets WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| LockboxError::Store(format!("delete: {e}")))
    }
}
