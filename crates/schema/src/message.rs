//! Bot reply messages.
//!
//! On the wire a message is `{"type": "...", "payload": {...}}`. Here the
//! type tag is the enum variant itself, so a payload can never disagree with
//! its tag. Payload objects reject unknown keys, which is what turns a
//! mismatched shape (say, an image payload under `"type": "text"`) into a
//! validation error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single selectable option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Choice {
    /// Display label.
    pub label: String,
    /// Value sent back when the choice is picked.
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A basic text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BotTextMessage {
    #[serde(default = "default_text")]
    pub text: String,
    /// Render the text as markdown.
    #[serde(default = "default_true")]
    pub use_markdown: bool,
}

impl BotTextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            use_markdown: true,
        }
    }
}

impl Default for BotTextMessage {
    fn default() -> Self {
        Self::new(default_text())
    }
}

/// An image, referenced by its hosted URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotImageMessage {
    pub url: String,
}

/// A fragment of HTML rendered for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotHtmlMessage {
    pub html: String,
}

/// Text with a row of buttons below it. Needs at least one choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ButtonFields")]
pub struct BotButtonMessage {
    pub text: String,
    choices: Vec<Choice>,
    /// Whether the buttons are clickable.
    pub active: bool,
}

impl BotButtonMessage {
    pub fn new(text: impl Into<String>, choices: Vec<Choice>) -> Result<Self> {
        if choices.is_empty() {
            return Err(Error::EmptyChoices);
        }
        Ok(Self {
            text: text.into(),
            choices,
            active: true,
        })
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ButtonFields {
    #[serde(default)]
    text: String,
    choices: Vec<Choice>,
    #[serde(default = "default_true")]
    active: bool,
}

impl TryFrom<ButtonFields> for BotButtonMessage {
    type Error = Error;

    fn try_from(fields: ButtonFields) -> Result<Self> {
        let mut message = Self::new(fields.text, fields.choices)?;
        message.active = fields.active;
        Ok(message)
    }
}

/// Text with a dropdown menu below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotDropdownMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl BotDropdownMessage {
    pub fn new(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            choices,
            active: true,
        }
    }
}

/// The closed set of message type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotMessageType {
    Text,
    Image,
    Html,
    Button,
    Dropdown,
}

impl BotMessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Html => "html",
            Self::Button => "button",
            Self::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for BotMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotMessageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "html" => Ok(Self::Html),
            "button" => Ok(Self::Button),
            "dropdown" => Ok(Self::Dropdown),
            other => Err(Error::UnknownMessageType(other.to_string())),
        }
    }
}

/// One typed reply unit sent by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum BotMessage {
    Text(BotTextMessage),
    Image(BotImageMessage),
    Html(BotHtmlMessage),
    Button(BotButtonMessage),
    Dropdown(BotDropdownMessage),
}

impl BotMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(BotTextMessage::new(text))
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::Image(BotImageMessage { url: url.into() })
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self::Html(BotHtmlMessage { html: html.into() })
    }

    pub fn button(text: impl Into<String>, choices: Vec<Choice>) -> Result<Self> {
        BotButtonMessage::new(text, choices).map(Self::Button)
    }

    pub fn dropdown(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self::Dropdown(BotDropdownMessage::new(text, choices))
    }

    /// Parse and validate a single message from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn message_type(&self) -> BotMessageType {
        match self {
            Self::Text(_) => BotMessageType::Text,
            Self::Image(_) => BotMessageType::Image,
            Self::Html(_) => BotMessageType::Html,
            Self::Button(_) => BotMessageType::Button,
            Self::Dropdown(_) => BotMessageType::Dropdown,
        }
    }

    /// Size in characters. Only text messages are measured; everything else is 0.
    pub fn message_size(&self) -> usize {
        match self {
            Self::Text(msg) => msg.text.chars().count(),
            _ => 0,
        }
    }
}

impl Default for BotMessage {
    fn default() -> Self {
        Self::Text(BotTextMessage::default())
    }
}

fn default_text() -> String {
    "Hello World".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_size_counts_chars() {
        assert_eq!(BotMessage::text("hi there").message_size(), 8);
        assert_eq!(BotMessage::text("héllo").message_size(), 5);
        assert_eq!(BotMessage::text("").message_size(), 0);
    }

    #[test]
    fn test_non_text_size_is_zero() {
        let choices = vec![Choice::new("Yes", "y")];
        assert_eq!(BotMessage::image("https://x/y.png").message_size(), 0);
        assert_eq!(BotMessage::html("<b>bold</b>").message_size(), 0);
        assert_eq!(BotMessage::button("pick", choices.clone()).unwrap().message_size(), 0);
        assert_eq!(BotMessage::dropdown("pick", choices).message_size(), 0);
    }

    #[test]
    fn test_wire_format() {
        let msg = BotMessage::text("hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "text", "payload": {"text": "hi", "useMarkdown": true}})
        );
    }

    #[test]
    fn test_parse_defaults() {
        let msg = BotMessage::from_json(r#"{"type": "text", "payload": {}}"#).unwrap();
        assert_eq!(msg, BotMessage::Text(BotTextMessage::default()));

        let msg = BotMessage::from_json(
            r#"{"type": "dropdown", "payload": {"text": "Pick one"}}"#,
        )
        .unwrap();
        match msg {
            BotMessage::Dropdown(d) => {
                assert!(d.choices.is_empty());
                assert!(d.active);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_button_empty_choices_rejected() {
        assert!(matches!(
            BotButtonMessage::new("pick", vec![]),
            Err(Error::EmptyChoices)
        ));

        let err = BotMessage::from_json(
            r#"{"type": "button", "payload": {"text": "pick", "choices": []}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_button_missing_choices_rejected() {
        let err = BotMessage::from_json(r#"{"type": "button", "payload": {"text": "pick"}}"#);
        assert!(matches!(err, Err(Error::Json(_))));
    }

    #[test]
    fn test_button_parse() {
        let msg = BotMessage::from_json(
            r#"{"type": "button", "payload": {"text": "Go?", "choices": [{"label": "Yes", "value": "y"}], "active": false}}"#,
        )
        .unwrap();
        let BotMessage::Button(button) = msg else {
            panic!("expected button");
        };
        assert_eq!(button.choices(), &[Choice::new("Yes", "y")]);
        assert!(!button.active);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = BotMessage::from_json(r#"{"type": "video", "payload": {}}"#);
        assert!(err.is_err());
        assert!(matches!(
            "video".parse::<BotMessageType>(),
            Err(Error::UnknownMessageType(_))
        ));
    }

    #[test]
    fn test_mismatched_payload_rejected() {
        let err = BotMessage::from_json(r#"{"type": "text", "payload": {"url": "https://x"}}"#);
        assert!(err.is_err());
        let err = BotMessage::from_json(r#"{"type": "image", "payload": {"html": "<p/>"}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_mistyped_fields_rejected() {
        for json in [
            r#"{"type": "text", "payload": {"text": 42}}"#,
            r#"{"type": "text", "payload": {"text": "hi", "useMarkdown": "yes"}}"#,
            r#"{"type": "image", "payload": {"url": ["a"]}}"#,
            r#"{"type": "button", "payload": {"choices": [{"label": 1}]}}"#,
            r#"{"type": "button", "payload": {"choices": {"label": "a"}}}"#,
            r#"{"type": "dropdown", "payload": {"choices": "none"}}"#,
            r#"{"type": 3, "payload": {}}"#,
            r#"{"type": "text", "payload": "Hello World"}"#,
        ] {
            assert!(
                matches!(BotMessage::from_json(json), Err(Error::Json(_))),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_type_tag() {
        assert_eq!(BotMessage::html("x").message_type(), BotMessageType::Html);
        assert_eq!("button".parse::<BotMessageType>().unwrap(), BotMessageType::Button);
        assert_eq!(BotMessageType::Dropdown.to_string(), "dropdown");
    }
}
