//! Common types used throughout the bardbot dispatcher.

use std::fmt;

use chrono::{DateTime, Utc};
use strum::{Display, EnumString};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Chat room identifier, e.g. `!abc:example.org`.
    RoomId
);
string_id!(
    /// Account identifier, e.g. `@alice:example.org`.
    UserId
);
string_id!(
    /// Identifier of a single room event.
    EventId
);

/// Kind of an inbound room message.
///
/// Only `Notice` changes dispatch behaviour; the others are kept so logs
/// show what was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Text,
    /// Automated/informational messages, usually sent by other bots
    Notice,
    Emote,
    Other,
}

impl MessageKind {
    /// Map a Matrix `msgtype` string (`m.text`, `m.notice`, ...) to a kind.
    #[must_use]
    pub fn from_msgtype(msgtype: &str) -> Self {
        msgtype
            .strip_prefix("m.")
            .and_then(|kind| kind.parse().ok())
            .unwrap_or(MessageKind::Other)
    }
}

/// A single message delivered by the chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub event_id: EventId,
    pub room_id: RoomId,
    pub sender: UserId,
    pub body: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_matrix_msgtypes() {
        assert_eq!(MessageKind::from_msgtype("m.text"), MessageKind::Text);
        assert_eq!(MessageKind::from_msgtype("m.notice"), MessageKind::Notice);
        assert_eq!(MessageKind::from_msgtype("m.emote"), MessageKind::Emote);
        assert_eq!(MessageKind::from_msgtype("m.image"), MessageKind::Other);
        assert_eq!(MessageKind::from_msgtype("notice"), MessageKind::Other);
    }

    #[test]
    fn ids_display_their_raw_value() {
        let room = RoomId::from("!room:example.org");
        assert_eq!(room.to_string(), "!room:example.org");
        assert_eq!(room.as_str(), "!room:example.org");
    }
}
