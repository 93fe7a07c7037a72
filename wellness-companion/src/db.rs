// SQLite persistence for the small amount of state that survives a restart:
// a key-value table whose one well-known key holds the last completed
// screening score.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

/// SQLite-backed key-value store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Key under which the last completed screening score is stored. The
    /// slot is overwritten on every completion and never explicitly cleared.
    const LAST_SCORE_KEY: &'static str = "phq9_score";

    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS app_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE
    /// so repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the
    /// key does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM app_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query app state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Overwrite the durable score slot with a freshly computed total.
    pub fn save_last_score(&self, score: u8) -> Result<()> {
        self.save_state(Self::LAST_SCORE_KEY, &serde_json::Value::from(score))
    }

    /// Read the durable score slot. Returns `None` when no screening has
    /// ever completed, or when the stored value is not a score.
    pub fn load_last_score(&self) -> Result<Option<u8>> {
        let value = self.load_state(Self::LAST_SCORE_KEY)?;
        Ok(value
            .and_then(|v| v.as_u64())
            .and_then(|n| u8::try_from(n).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Helper: create a fresh in-memory database for each test.
    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    // --- Score slot ---

    #[test]
    fn score_slot_is_empty_on_a_fresh_database() {
        let db = test_db();
        assert_eq!(db.load_last_score().unwrap(), None);
    }

    #[test]
    fn score_slot_round_trips() {
        let db = test_db();
        db.save_last_score(14).unwrap();
        assert_eq!(db.load_last_score().unwrap(), Some(14));
    }

    #[test]
    fn score_slot_is_overwritten_by_each_completion() {
        let db = test_db();
        db.save_last_score(27).unwrap();
        db.save_last_score(0).unwrap();
        assert_eq!(db.load_last_score().unwrap(), Some(0));
    }

    #[test]
    fn score_slot_ignores_non_numeric_values() {
        let db = test_db();
        db.save_state("phq9_score", &json!("not a score")).unwrap();
        assert_eq!(db.load_last_score().unwrap(), None);
    }

    // --- Generic key-value state ---

    #[test]
    fn state_round_trips_arbitrary_json() {
        let db = test_db();
        let value = json!({ "nested": { "flag": true, "count": 3 } });
        db.save_state("some_key", &value).unwrap();
        assert_eq!(db.load_state("some_key").unwrap(), Some(value));
    }

    #[test]
    fn state_load_missing_key_returns_none() {
        let db = test_db();
        assert_eq!(db.load_state("nope").unwrap(), None);
    }

    #[test]
    fn state_save_overwrites_previous_value() {
        let db = test_db();
        db.save_state("k", &json!(1)).unwrap();
        db.save_state("k", &json!(2)).unwrap();
        assert_eq!(db.load_state("k").unwrap(), Some(json!(2)));
    }

    #[test]
    fn reopening_a_file_database_preserves_the_slot() {
        let dir = std::env::temp_dir().join(format!(
            "wellnest_db_test_{}_{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.db");
        let path_str = path.to_str().unwrap();

        {
            let db = Database::open(path_str).unwrap();
            db.save_last_score(9).unwrap();
        }
        {
            let db = Database::open(path_str).unwrap();
            assert_eq!(db.load_last_score().unwrap(), Some(9));
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
