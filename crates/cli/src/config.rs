//! Configuration loading from botmetrics.toml.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracking::{
    ConsoleMetrics, ErrorPolicy, JsonLinesMetrics, PersistError, PersistMetrics, SqliteMetrics,
    Tracker,
};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Tracker behavior.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Where finished metrics go.
    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackerConfig {
    /// What to do with an error from the tracked work.
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

#[derive(Debug, Default, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,

    /// Output file. Required for `jsonl` and `sqlite`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Console,
    Jsonl,
    Sqlite,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Console => "console",
            Self::Jsonl => "jsonl",
            Self::Sqlite => "sqlite",
        })
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build the configured sink.
    pub fn build_sink(&self) -> Result<Box<dyn PersistMetrics>, ConfigError> {
        let sink: Box<dyn PersistMetrics> = match self.sink.kind {
            SinkKind::Console => Box::new(ConsoleMetrics),
            SinkKind::Jsonl => Box::new(JsonLinesMetrics::new(self.sink_path()?)),
            SinkKind::Sqlite => Box::new(SqliteMetrics::open(self.sink_path()?)?),
        };
        Ok(sink)
    }

    /// Build a tracker with the configured sink and error policy.
    pub fn tracker(&self) -> Result<Tracker<Box<dyn PersistMetrics>>, ConfigError> {
        Ok(Tracker::new(self.build_sink()?).with_error_policy(self.tracker.on_error))
    }

    /// The SQLite database path, when metrics are kept in one.
    pub fn sqlite_path(&self) -> Option<&Path> {
        match self.sink.kind {
            SinkKind::Sqlite => self.sink.path.as_deref(),
            _ => None,
        }
    }

    fn sink_path(&self) -> Result<&Path, ConfigError> {
        self.sink
            .path
            .as_deref()
            .ok_or(ConfigError::MissingSinkPath(self.sink.kind))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("sink '{0}' requires sink.path")]
    MissingSinkPath(SinkKind),

    #[error("failed to open sink: {0}")]
    Sink(#[from] PersistError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.sink.kind, SinkKind::Console);
        assert_eq!(config.tracker.on_error, ErrorPolicy::Suppress);
        assert!(config.sqlite_path().is_none());
        assert!(config.build_sink().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[tracker]
on_error = "propagate"

[sink]
kind = "sqlite"
path = "metrics.db"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.tracker.on_error, ErrorPolicy::Propagate);
        assert_eq!(config.sink.kind, SinkKind::Sqlite);
        assert_eq!(config.sqlite_path(), Some(Path::new("metrics.db")));
    }

    #[test]
    fn test_missing_path() {
        let config = Config::parse("[sink]\nkind = \"jsonl\"\n").unwrap();
        assert!(matches!(
            config.build_sink(),
            Err(ConfigError::MissingSinkPath(SinkKind::Jsonl))
        ));
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(Config::parse("[sink]\nkind = \"kafka\"\n").is_err());
        assert!(Config::parse("[tracker]\non_error = \"retry\"\n").is_err());
    }

    #[test]
    fn test_tracker_uses_policy() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            "[tracker]\non_error = \"propagate\"\n[sink]\nkind = \"jsonl\"\npath = {:?}\n",
            dir.path().join("m.jsonl")
        );
        let config = Config::parse(&toml).unwrap();
        let tracker = config.tracker().unwrap();
        assert_eq!(tracker.error_policy(), ErrorPolicy::Propagate);
    }
}
