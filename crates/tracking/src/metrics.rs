//! The per-event metrics record and its derived fields.

use crate::{Error, Result};
use chrono::{DateTime, Local, Utc};
use schema::Event;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Timing and size measurements for processing one [`Event`].
///
/// Only the event, the two timestamps, and the success flag are stored.
/// Everything else is computed on read.
#[derive(Debug, Clone)]
pub struct BotMetrics {
    /// The event being processed, once captured.
    pub event: Option<Event>,
    /// Processing start, Unix epoch seconds.
    pub start_time: Option<f64>,
    /// Processing end, Unix epoch seconds.
    pub end_time: Option<f64>,
    pub success: bool,
    started: Option<Instant>,
}

impl BotMetrics {
    pub fn new() -> Self {
        Self {
            event: None,
            start_time: None,
            end_time: None,
            success: true,
            started: None,
        }
    }

    /// Attach the event being processed.
    ///
    /// Returns the stored event so the caller can keep appending replies.
    pub fn capture_event(&mut self, event: Event) -> &mut Event {
        debug!(event_id = %event.id, "captured event");
        self.event.insert(event)
    }

    pub fn event(&self) -> Result<&Event> {
        self.event.as_ref().ok_or(Error::EventNotCaptured)
    }

    pub fn event_mut(&mut self) -> Result<&mut Event> {
        self.event.as_mut().ok_or(Error::EventNotCaptured)
    }

    /// Record the start of processing.
    pub fn track_start(&mut self) {
        self.start_time = Some(epoch_now());
        self.started = Some(Instant::now());
    }

    /// Record the end of processing.
    ///
    /// With a start recorded, the end is `start + monotonic elapsed`, so the
    /// response time never goes negative when the wall clock is adjusted.
    pub fn track_end(&mut self) {
        let end = match (self.start_time, self.started) {
            (Some(start), Some(started)) => start + started.elapsed().as_secs_f64(),
            _ => epoch_now(),
        };
        self.end_time = Some(end);
    }

    /// Flag the run as failed.
    pub fn mark_failed(&mut self) {
        self.success = false;
    }

    /// Seconds between start and end, or 0 if either is missing.
    pub fn response_time(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Length of the user's input text, in characters.
    pub fn user_input_size(&self) -> Result<usize> {
        self.event()?
            .input_text()
            .map(|text| text.chars().count())
            .ok_or(Error::MissingPayloadField("text"))
    }

    /// Total size of the bot's replies.
    pub fn bot_output_size(&self) -> Result<usize> {
        Ok(self.event()?.bot_reply.iter().map(|r| r.message_size()).sum())
    }

    pub fn user_id(&self) -> Result<&str> {
        Ok(&self.event()?.user_id)
    }

    pub fn conversation_id(&self) -> Result<&str> {
        Ok(&self.event()?.conversation_id)
    }

    pub fn input_message_type(&self) -> Result<&str> {
        self.event()?
            .input_type()
            .ok_or(Error::MissingPayloadField("type"))
    }

    /// Snapshot the stored and derived fields. Fields that cannot be
    /// derived are left as `None`.
    pub fn record(&self) -> MetricsRecord {
        MetricsRecord {
            event_id: self.event.as_ref().map(|e| e.id.clone()),
            user_id: self.user_id().ok().map(str::to_string),
            conversation_id: self.conversation_id().ok().map(str::to_string),
            input_message_type: self.input_message_type().ok().map(str::to_string),
            user_input_size: self.user_input_size().ok(),
            bot_output_size: self.bot_output_size().ok(),
            start_time: self.start_time,
            end_time: self.end_time,
            response_time: self.response_time(),
            success: self.success,
        }
    }
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A finished, serializable view of [`BotMetrics`], as handed to sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
    pub conversation_id: Option<String>,
    pub input_message_type: Option<String>,
    pub user_input_size: Option<usize>,
    pub bot_output_size: Option<usize>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub response_time: f64,
    pub success: bool,
}

impl MetricsRecord {
    /// `start_time` as a local timestamp.
    pub fn started_at_local(&self) -> Option<DateTime<Local>> {
        let micros = (self.start_time? * 1_000_000.0) as i64;
        DateTime::from_timestamp_micros(micros).map(|utc| utc.with_timezone(&Local))
    }
}

fn epoch_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
