//! JSON decoding for [`Message`].
//!
//! Payloads are decoded leniently, the way older clients of this service
//! expect:
//!
//! - keys match without regard to ASCII case (`"ID"`, `"Message"`);
//! - `null`, for a field or for the whole body, leaves the zero value;
//! - a repeated key overwrites the earlier one;
//! - unknown keys are skipped.
//!
//! A value of the wrong JSON type is still an error.

use crate::Message;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MessageVisitor)
    }
}

struct MessageVisitor;

impl<'de> Visitor<'de> for MessageVisitor {
    type Value = Message;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a message object or null")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Message, E> {
        Ok(Message::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Message, E> {
        Ok(Message::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Message, A::Error> {
        let mut message = Message::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("id") {
                if let Some(id) = map.next_value::<Option<i64>>()? {
                    message.id = id;
                }
            } else if key.eq_ignore_ascii_case("message") {
                if let Some(text) = map.next_value::<Option<String>>()? {
                    message.text = text;
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(message)
    }
}
