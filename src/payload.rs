//! Structured data attached to a log message

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

const INDENT: &[u8] = b"    ";

/// Separator between a message and its rendered payload
pub const PAYLOAD_SEPARATOR: &str = " -\n";

/// An indented JSON block ready to be appended to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(String);

impl Payload {
    /// Render `data` if it serializes to a non-empty object or array
    ///
    /// Anything else (scalars, null, empty containers, values that fail to
    /// serialize) yields `None` and the message is logged unmodified.
    pub fn render<T: Serialize + ?Sized>(data: &T) -> Option<Payload> {
        let value = serde_json::to_value(data).ok()?;
        Self::from_value(&value)
    }

    /// Render an already-built JSON value under the same rules as [`Payload::render`]
    pub fn from_value(value: &Value) -> Option<Payload> {
        let renderable = match value {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => false,
        };
        if !renderable {
            return None;
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer).ok()?;
        String::from_utf8(buf).ok().map(Payload)
    }

    /// The rendered block
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `message` followed by the separator and this block
    pub fn append_to(&self, message: &str) -> String {
        format!("{}{}{}", message, PAYLOAD_SEPARATOR, self.0)
    }
}

/// Append the rendered form of `payload` to `message`, if there is one
pub fn attach(message: String, payload: Option<&Payload>) -> String {
    match payload {
        Some(payload) => payload.append_to(&message),
        None => message,
    }
}
