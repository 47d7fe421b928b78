//! SQLite metrics sink.

use crate::{BotMetrics, MetricsRecord, PersistError, PersistMetrics};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed metrics history.
pub struct SqliteMetrics {
    conn: Connection,
}

impl SqliteMetrics {
    /// Open or create a metrics database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, PersistError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), PersistError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bot_metrics (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id TEXT,
                user_id TEXT,
                conversation_id TEXT,
                input_message_type TEXT,
                user_input_size INTEGER,
                bot_output_size INTEGER,
                start_time REAL,
                end_time REAL,
                response_time REAL NOT NULL,
                success INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_bot_metrics_conversation
                ON bot_metrics(conversation_id);
            "#,
        )?;
        Ok(())
    }

    /// Insert a finished record.
    pub fn append(&self, record: &MetricsRecord) -> Result<(), PersistError> {
        self.conn.execute(
            "INSERT INTO bot_metrics (event_id, user_id, conversation_id, input_message_type,
                user_input_size, bot_output_size, start_time, end_time, response_time, success)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.event_id,
                record.user_id,
                record.conversation_id,
                record.input_message_type,
                record.user_input_size.map(|n| n as i64),
                record.bot_output_size.map(|n| n as i64),
                record.start_time,
                record.end_time,
                record.response_time,
                record.success,
            ],
        )?;
        Ok(())
    }

    /// Load the most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<MetricsRecord>, PersistError> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, user_id, conversation_id, input_message_type, user_input_size,
                    bot_output_size, start_time, end_time, response_time, success
             FROM bot_metrics ORDER BY seq DESC LIMIT ?1",
        )?;

        let records = stmt
            .query_map([limit as i64], |row| {
                let input_size: Option<i64> = row.get(4)?;
                let output_size: Option<i64> = row.get(5)?;
                Ok(MetricsRecord {
                    event_id: row.get(0)?,
                    user_id: row.get(1)?,
                    conversation_id: row.get(2)?,
                    input_message_type: row.get(3)?,
                    user_input_size: input_size.map(|n| n as usize),
                    bot_output_size: output_size.map(|n| n as usize),
                    start_time: row.get(6)?,
                    end_time: row.get(7)?,
                    response_time: row.get(8)?,
                    success: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl PersistMetrics for SqliteMetrics {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError> {
        self.append(&metrics.record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{BotMessage, Event};

    #[test]
    fn test_persist_and_load() {
        let store = SqliteMetrics::in_memory().unwrap();

        let mut metrics = BotMetrics::new();
        metrics.capture_event(
            Event::incoming("hello", "text")
                .with_conversation_id("conv-1")
                .with_reply(BotMessage::text("hi there")),
        );
        metrics.start_time = Some(5.0);
        metrics.end_time = Some(5.5);
        store.persist(&metrics).unwrap();

        let records = store.recent(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], metrics.record());
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let store = SqliteMetrics::in_memory().unwrap();
        for text in ["a", "bb", "ccc"] {
            let mut metrics = BotMetrics::new();
            metrics.capture_event(Event::incoming(text, "text"));
            store.persist(&metrics).unwrap();
        }

        let records = store.recent(2).unwrap();
        let sizes: Vec<_> = records.iter().map(|r| r.user_input_size).collect();
        assert_eq!(sizes, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_null_fields_survive() {
        let store = SqliteMetrics::in_memory().unwrap();
        let mut metrics = BotMetrics::new();
        metrics.mark_failed();
        store.persist(&metrics).unwrap();

        let record = &store.recent(1).unwrap()[0];
        assert!(record.event_id.is_none());
        assert!(record.start_time.is_none());
        assert!(!record.success);
    }

    #[test]
    fn test_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.db");
        {
            let store = SqliteMetrics::open(&path).unwrap();
            store.persist(&BotMetrics::new()).unwrap();
        }
        let store = SqliteMetrics::open(&path).unwrap();
        assert_eq!(store.recent(10).unwrap().len(), 1);
    }
}
