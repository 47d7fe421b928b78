//! JSON-lines file sink.

use crate::{BotMetrics, PersistError, PersistMetrics};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one JSON [`MetricsRecord`](crate::MetricsRecord) per line to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesMetrics {
    path: PathBuf,
}

impl JsonLinesMetrics {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistMetrics for JsonLinesMetrics {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(&metrics.record())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsRecord;
    use schema::Event;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesMetrics::new(dir.path().join("nested/metrics.jsonl"));

        let mut first = BotMetrics::new();
        first.capture_event(Event::incoming("one", "text"));
        sink.persist(&first).unwrap();

        let mut second = BotMetrics::new();
        second.mark_failed();
        sink.persist(&second).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let records: Vec<MetricsRecord> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_input_size, Some(3));
        assert!(records[0].success);
        assert!(records[1].event_id.is_none());
        assert!(!records[1].success);
    }

    #[test]
    fn test_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesMetrics::new(dir.path().join("metrics.jsonl"));
        sink.persist(&BotMetrics::new()).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert!(value.get("responseTime").is_some());
        assert!(value.get("userInputSize").is_some());
    }
}
