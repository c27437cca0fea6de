// SQLite-backed relevance store

use crate::error::{RankError, Result};
use crate::store::{checked_counter, format_timestamp, parse_timestamp, RelevanceEntry, RelevanceStore};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Relevance counters persisted across restarts
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Private database that disappears with the store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        info!("Initializing relevance schema");

        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS relevance (
                key TEXT PRIMARY KEY,
                value REAL NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#)?;

        conn.execute_batch(r#"
            CREATE INDEX IF NOT EXISTS idx_relevance_updated_at ON relevance(updated_at);
        "#)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RankError::LockPoisoned(e.to_string()))
    }
}

fn read_value(conn: &Connection, key: &str) -> Result<f64> {
    let result = conn.query_row(
        "SELECT value FROM relevance WHERE key = ?",
        [key],
        |row| row.get::<_, f64>(0),
    );
    match result {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0.0),
        Err(e) => Err(e.into()),
    }
}

fn write_value(conn: &Connection, key: &str, value: f64, now: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO relevance (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        rusqlite::params![key, value, now],
    )?;
    Ok(())
}

impl RelevanceStore for SqliteStore {
    fn get(&self, key: &str) -> Result<f64> {
        let conn = self.lock()?;
        read_value(&conn, key)
    }

    fn set(&self, key: &str, value: f64) -> Result<()> {
        let value = checked_counter(key, value)?;
        let conn = self.lock()?;
        write_value(&conn, key, value, &format_timestamp(Utc::now()))
    }

    fn adjust(&self, key: &str, delta: f64) -> Result<f64> {
        let mut values = self.adjust_many(&[(key, delta)])?;
        Ok(values.pop().unwrap_or_default())
    }

    fn adjust_many(&self, deltas: &[(&str, f64)]) -> Result<Vec<f64>> {
        let mut conn = self.lock()?;
        let now = format_timestamp(Utc::now());

        // Dropping the transaction on error rolls back every earlier write.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut values = Vec::with_capacity(deltas.len());
        for &(key, delta) in deltas {
            let delta = checked_counter(key, delta)?;
            let value = checked_counter(key, read_value(&tx, key)? + delta)?;
            write_value(&tx, key, value, &now)?;
            values.push(value);
        }
        tx.commit()?;

        Ok(values)
    }

    fn entries(&self) -> Result<Vec<RelevanceEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT key, value, updated_at FROM relevance ORDER BY value DESC, key"
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, value, updated_at) = row?;
            entries.push(RelevanceEntry {
                key,
                value,
                updated_at: parse_timestamp(&updated_at),
            });
        }
        Ok(entries)
    }

    fn remove_stale(&self, before: DateTime<Utc>) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM relevance WHERE updated_at < ?",
            [format_timestamp(before)],
        )?;
        Ok(deleted)
    }

    fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM relevance", [])?;
        Ok(deleted)
    }

    fn len(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM relevance", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
