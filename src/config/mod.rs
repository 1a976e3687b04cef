//! Persisted search defaults, backed by SQLite.
//!
//! Shares a database with [`SqliteHistory`](crate::history::sqlite::SqliteHistory),
//! pass the same path to both.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::sync::Mutex;

use crate::output::OutputFormat;
use crate::search::Algorithm;

pub const KEY_ALGORITHM: &str = "algorithm";
pub const KEY_FORMAT: &str = "format";

/// Keys `set` accepts.
pub const KNOWN_KEYS: &[&str] = &[KEY_ALGORITHM, KEY_FORMAT];

/// Settings a search runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchSettings {
    pub algorithm: Algorithm,
    pub format: OutputFormat,
}

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert). Unknown keys and unparsable values are
    /// rejected.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        validate(key, value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key. Returns whether a value was stored.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    /// All stored pairs, sorted by key.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT key, value FROM config ORDER BY key ASC")?;
        let entries = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Stored default algorithm, if any.
    pub fn algorithm(&self) -> Result<Option<Algorithm>> {
        self.get(KEY_ALGORITHM)?
            .map(|v| {
                v.parse::<Algorithm>()
                    .with_context(|| format!("bad stored value for `{KEY_ALGORITHM}`"))
            })
            .transpose()
    }

    /// Stored default output format, if any.
    pub fn format(&self) -> Result<Option<OutputFormat>> {
        self.get(KEY_FORMAT)?
            .map(|v| {
                v.parse::<OutputFormat>()
                    .with_context(|| format!("bad stored value for `{KEY_FORMAT}`"))
            })
            .transpose()
    }

    /// Fill in settings not given on the command line: a flag wins over a
    /// stored value, which wins over the built-in default.
    pub fn resolve(
        &self,
        algorithm: Option<Algorithm>,
        format: Option<OutputFormat>,
    ) -> Result<SearchSettings> {
        let algorithm = match algorithm {
            Some(a) => a,
            None => self.algorithm()?.unwrap_or_default(),
        };
        let format = match format {
            Some(f) => f,
            None => self.format()?.unwrap_or_default(),
        };
        Ok(SearchSettings { algorithm, format })
    }
}

fn validate(key: &str, value: &str) -> Result<()> {
    match key {
        KEY_ALGORITHM => {
            value.parse::<Algorithm>()?;
        }
        KEY_FORMAT => {
            value.parse::<OutputFormat>()?;
        }
        other => bail!(
            "unknown config key `{other}` (expected one of: {})",
            KNOWN_KEYS.join(", ")
        ),
    }
    Ok(())
}
