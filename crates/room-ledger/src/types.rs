//! Core types for the room ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical identifier of a two-party room (`"alice:bob"`, lower-cased, sorted).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Builds a key from two already lower-cased participants, smaller first.
    pub(crate) fn from_sorted(first: &str, second: &str) -> Self {
        Self(format!("{first}:{second}"))
    }

    /// Returns the room key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message as persisted in a room's ordered collection.
///
/// The serialized form is the collection member, so field order is part of the
/// tie-break between messages sharing a timestamp. The `id` keeps two identical
/// messages sent within the same second from collapsing into one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    #[serde(rename = "message")]
    pub text: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub id: Uuid,
}

impl Message {
    /// Creates a message stamped with the given unix time.
    pub fn new(sender: impl Into<String>, text: impl Into<String>, timestamp: i64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
            id: Uuid::new_v4(),
        }
    }

    /// Serializes the message into its collection member bytes.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parses a collection member back into a message.
    pub fn from_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// A message as returned by a pull, tagged with the caller's chat descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The chat descriptor exactly as the caller supplied it.
    pub chat: String,
    pub text: String,
    pub sender: String,
    pub send_time: i64,
}

impl ChatMessage {
    pub(crate) fn from_stored(chat: &str, message: Message) -> Self {
        Self {
            chat: chat.to_string(),
            text: message.text,
            sender: message.sender,
            send_time: message.timestamp,
        }
    }
}

/// One page of a room.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
    /// Rank to pass as the next cursor; `0` when there is nothing more.
    pub next_cursor: i64,
}
