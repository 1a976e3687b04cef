use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::Mutex;

use super::{History, HistoryEntry};

/// SQLite-backed search history.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open history database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL DEFAULT (datetime('now')),
                pattern TEXT NOT NULL,
                entry TEXT NOT NULL
            );",
        )
        .context("failed to create history table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }
}

fn decode(jsons: Vec<String>) -> Result<Vec<HistoryEntry>> {
    let entries = jsons
        .iter()
        .map(|json| serde_json::from_str(json))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

#[async_trait]
impl History for SqliteHistory {
    async fn store(&self, entry: HistoryEntry) -> Result<()> {
        let json = serde_json::to_string(&entry)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO history (pattern, entry) VALUES (?1, ?2)",
            [&entry.pattern, &json],
        )?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let jsons = {
            let conn = self.conn.lock().unwrap();
            // Last `limit` rows, returned in chronological order
            let mut stmt = conn.prepare(
                "SELECT entry FROM (
                    SELECT entry, id FROM history ORDER BY id DESC LIMIT ?1
                ) ORDER BY id ASC",
            )?;
            stmt.query_map([limit as i64], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?
        };
        decode(jsons)
    }

    async fn recall(&self, query: &str) -> Result<Vec<HistoryEntry>> {
        let jsons = {
            let conn = self.conn.lock().unwrap();
            // instr() rather than LIKE so `%` and `_` in patterns match literally
            let mut stmt = conn.prepare(
                "SELECT entry FROM history WHERE instr(pattern, ?1) > 0 ORDER BY id ASC",
            )?;
            stmt.query_map([query], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?
        };
        decode(jsons)
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM history", [])?;
        Ok(())
    }
}
