//! Response metrics for chatbot event processing.
//!
//! This crate measures how one [`Event`](schema::Event) was handled: how long
//! processing took, how large the user's input and the bot's replies were,
//! and whether it succeeded. Each measurement is persisted exactly once
//! through a pluggable sink.
//!
//! # Core Concepts
//!
//! ## BotMetrics
//!
//! [`BotMetrics`] stores the captured event, start and end timestamps, and a
//! success flag. Sizes, identifiers, and response time are derived on read.
//! [`MetricsRecord`] is the serializable snapshot that sinks receive.
//!
//! ## Tracker
//!
//! A [`Tracker`] opens a [`MetricsScope`] per event. The scope persists its
//! record when dropped, whatever the exit path. [`Tracker::track`] wraps a
//! closure and applies an [`ErrorPolicy`] to its error.
//!
//! ## Sinks
//!
//! Anything implementing [`PersistMetrics`]:
//! - [`ConsoleMetrics`]: table on stdout (the default)
//! - [`JsonLinesMetrics`]: one JSON object per line in a file
//! - [`SqliteMetrics`]: rows in a SQLite database
//!
//! # Example
//!
//! ```no_run
//! use schema::{BotMessage, Event};
//! use tracking::Tracker;
//!
//! let tracker = Tracker::console();
//! let reply: Result<Option<()>, String> = tracker.track(|metrics| {
//!     let event = metrics.capture_event(Event::incoming("hello", "text"));
//!     event.add_reply(BotMessage::text("hi there"));
//!     metrics.track_start();
//!     // ... run the bot ...
//!     metrics.track_end();
//!     Ok(())
//! });
//! ```

mod console;
mod error;
mod jsonl;
mod metrics;
mod persist;
mod sqlite;
mod tracker;

pub use console::ConsoleMetrics;
pub use error::{Error, PersistError, Result};
pub use jsonl::JsonLinesMetrics;
pub use metrics::{BotMetrics, MetricsRecord};
pub use persist::PersistMetrics;
pub use sqlite::SqliteMetrics;
pub use tracker::{ErrorPolicy, MetricsScope, Tracker};
