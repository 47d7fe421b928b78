//! The event passed between chatbot pipeline stages.

use crate::{id, BotMessage, Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Whether an event travels from the user to the bot or back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            other => Err(Error::UnknownDirection(other.to_string())),
        }
    }
}

/// One exchange in a conversation: the raw user payload plus the bot's replies.
///
/// Identifiers and `sent_on` are filled in when absent, both by
/// [`Event::new`] and when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default = "id::user_id")]
    pub user_id: String,
    #[serde(default = "id::conversation_id")]
    pub conversation_id: String,
    #[serde(default = "id::event_id")]
    pub id: String,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_sent_on")]
    pub sent_on: DateTime<Utc>,
    #[serde(default)]
    pub direction: Direction,
    /// Raw input. Expected to carry at least `text` and `type` strings.
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub bot_reply: Vec<BotMessage>,
}

impl Event {
    /// Create an event with fresh identifiers and an empty payload.
    pub fn new() -> Self {
        Self {
            user_id: id::user_id(),
            conversation_id: id::conversation_id(),
            id: id::event_id(),
            sent_on: Utc::now(),
            direction: Direction::Incoming,
            payload: Map::new(),
            bot_reply: Vec::new(),
        }
    }

    /// Create an incoming event carrying `text` of the given message `kind`.
    pub fn incoming(text: impl Into<String>, kind: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("text".to_string(), Value::String(text.into()));
        payload.insert("type".to_string(), Value::String(kind.into()));
        Self::new().with_payload(payload)
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_reply(mut self, reply: BotMessage) -> Self {
        self.bot_reply.push(reply);
        self
    }

    pub fn add_reply(&mut self, reply: BotMessage) {
        self.bot_reply.push(reply);
    }

    /// The `text` payload entry, if present and a string.
    pub fn input_text(&self) -> Option<&str> {
        self.payload.get("text").and_then(Value::as_str)
    }

    /// The `type` payload entry, if present and a string.
    pub fn input_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }

    /// Parse and validate an event from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept RFC 3339 timestamps, or naive ISO timestamps taken as UTC.
fn deserialize_sent_on<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
