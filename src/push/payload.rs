//! Payload classification
//!
//! The service worker JSON-parses every push it receives and falls back to
//! using the raw text as the notification body. Payloads are therefore
//! classified once, up front, and raw text is wrapped into a
//! [`NotificationEnvelope`] so the worker always receives a structured
//! message.

use serde_json::Value;

use crate::{error::Error, types::NotificationEnvelope};

pub const DEFAULT_TITLE: &str = "Push Notification";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text that parses as a JSON object; forwarded byte-for-byte.
    Structured(String),
    RawText(String),
}

/// Defaults used when wrapping raw text.
#[derive(Debug, Clone)]
pub struct EnvelopeDefaults {
    pub title: String,
    pub icon: String,
    pub badge: String,
}

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        EnvelopeDefaults {
            title: String::from(DEFAULT_TITLE),
            icon: String::from("/icons/icon-192.png"),
            badge: String::from("/icons/badge-72.png"),
        }
    }
}

impl Payload {
    pub fn parse(bytes: &[u8]) -> Payload {
        let text = String::from_utf8_lossy(bytes).into_owned();

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(_)) => Payload::Structured(text),
            _ => Payload::RawText(text),
        }
    }

    /// Classify the `payload` field of a JSON request body. Objects are
    /// structured, strings go through [`Payload::parse`], and any other
    /// JSON value is treated as raw text.
    pub fn from_json(value: &Value) -> Payload {
        match value {
            Value::Object(_) => Payload::Structured(value.to_string()),
            Value::String(text) => Payload::parse(text.as_bytes()),
            other => Payload::RawText(other.to_string()),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Structured(_))
    }

    pub fn to_envelope(
        &self,
        defaults: &EnvelopeDefaults,
    ) -> Result<Vec<u8>, Error> {
        match self {
            Payload::Structured(text) => Ok(text.as_bytes().to_vec()),
            Payload::RawText(text) => {
                let envelope = NotificationEnvelope {
                    title: defaults.title.to_owned(),
                    body: text.to_owned(),
                    icon: defaults.icon.to_owned(),
                    badge: defaults.badge.to_owned(),
                };
                Ok(serde_json::to_vec(&envelope)?)
            },
        }
    }
}
