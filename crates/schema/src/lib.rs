//! Typed message and event schemas for the chatbot pipeline.
//!
//! # Core Concepts
//!
//! ## Event
//!
//! An [`Event`] is the unit passed between pipeline stages. It carries:
//! - user, conversation, and event identifiers (generated when absent)
//! - a UTC `sent_on` timestamp
//! - a [`Direction`]
//! - the raw user payload, an open JSON object with `text` and `type` keys
//! - the bot's replies, a list of [`BotMessage`]
//!
//! ## BotMessage
//!
//! A [`BotMessage`] is one typed reply: text, image, HTML, buttons, or a
//! dropdown. Its variant doubles as the wire `type` tag, so tag and payload
//! always agree.
//!
//! # Validation
//!
//! Construction and parsing reject malformed input with [`Error`]: unknown
//! tags, missing required fields, payloads shaped for a different type, and
//! button messages with no choices.
//!
//! # Example
//!
//! ```
//! use schema::{BotMessage, Choice, Event};
//!
//! let event = Event::incoming("hello", "text")
//!     .with_reply(BotMessage::text("hi there"))
//!     .with_reply(BotMessage::button("Continue?", vec![Choice::new("Yes", "yes")])?);
//!
//! assert_eq!(event.bot_reply[0].message_size(), 8);
//! let parsed = Event::from_json(&event.to_json()?)?;
//! assert_eq!(parsed.id, event.id);
//! # Ok::<(), schema::Error>(())
//! ```

mod error;
mod event;
pub mod id;
mod message;

pub use error::{Error, Result};
pub use event::{Direction, Event};
pub use message::{
    BotButtonMessage, BotDropdownMessage, BotHtmlMessage, BotImageMessage, BotMessage,
    BotMessageType, BotTextMessage, Choice,
};
