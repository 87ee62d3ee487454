//! Teamchat event model and decoder.
//!
//! Inbound long-poll envelopes are raw JSON objects:
//!
//! ```json
//! { "eventId": 17, "eventType": "newMessage", "payload": { ... } }
//! ```
//!
//! [`decode_event`] classifies the envelope by its `eventType` tag and
//! parses the payload into one closed [`Event`] variant. The function is
//! total: an unrecognized tag yields [`Event::Unknown`] and a payload that
//! does not match its declared shape yields [`Event::DecodeError`] — both
//! carry the original envelope verbatim so no information is lost.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::types::{CallbackQuery, Chat, Message, User};

// ============================================================================
// Variant payloads
// ============================================================================

/// Reference to a message that is no longer fully available
/// (deleted or unpinned).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Message identifier.
    #[serde(rename = "msgId")]
    pub id: String,
    /// Chat the message belonged to, when present in the payload.
    #[serde(default)]
    pub chat: Option<Chat>,
    /// Unix timestamp of the event.
    #[serde(default)]
    pub timestamp: i64,
}

/// Members joined a chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMembers {
    /// The chat that gained members.
    #[serde(default)]
    pub chat: Option<Chat>,
    /// The users that joined.
    #[serde(default)]
    pub new_members: Vec<User>,
    /// Who added them, when known.
    #[serde(default)]
    pub added_by: Option<User>,
}

/// Members left (or were removed from) a chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftChatMembers {
    /// The chat that lost members.
    #[serde(default)]
    pub chat: Option<Chat>,
    /// The users that left.
    #[serde(default)]
    pub left_members: Vec<User>,
    /// Who removed them, when known.
    #[serde(default)]
    pub removed_by: Option<User>,
}

/// Chat metadata (title, about, avatar, …) changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedChatInfo {
    /// The chat whose metadata changed.
    #[serde(default)]
    pub chat: Option<Chat>,
}

// ============================================================================
// Event — the closed sum type
// ============================================================================

/// One decoded inbound event.
///
/// Exhaustive over everything the platform sends; the compiler checks that
/// handlers cover every case, with [`Event::Unknown`] and
/// [`Event::DecodeError`] standing in for the runtime default branch.
#[derive(Debug, Clone)]
pub enum Event {
    /// A new message arrived.
    NewMessage(Message),
    /// An existing message was edited.
    EditedMessage(Message),
    /// A message was deleted.
    DeletedMessage(MessageRef),
    /// A message was pinned.
    PinnedMessage(Message),
    /// A message was unpinned.
    UnpinnedMessage(MessageRef),
    /// Users joined a chat.
    NewChatMembers(NewChatMembers),
    /// Users left a chat.
    LeftChatMembers(LeftChatMembers),
    /// Chat metadata changed.
    ChangedChatInfo(ChangedChatInfo),
    /// An inline-keyboard button was pressed.
    CallbackQuery(CallbackQuery),
    /// The event type tag was not recognized.
    Unknown {
        /// The unrecognized tag (empty if the envelope had none).
        event_type: String,
        /// The original envelope, unchanged.
        raw: Value,
    },
    /// The payload did not match its declared event type.
    DecodeError {
        /// Human-readable decode failure description.
        reason: String,
        /// The original envelope, unchanged.
        raw: Value,
    },
}

impl Event {
    /// Returns a short name for the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::NewMessage(_) => "newMessage",
            Event::EditedMessage(_) => "editedMessage",
            Event::DeletedMessage(_) => "deletedMessage",
            Event::PinnedMessage(_) => "pinnedMessage",
            Event::UnpinnedMessage(_) => "unpinnedMessage",
            Event::NewChatMembers(_) => "newChatMembers",
            Event::LeftChatMembers(_) => "leftChatMembers",
            Event::ChangedChatInfo(_) => "changedChatInfo",
            Event::CallbackQuery(_) => "callbackQuery",
            Event::Unknown { .. } => "unknown",
            Event::DecodeError { .. } => "decodeError",
        }
    }
}

// ============================================================================
// Decoder
// ============================================================================

/// Extracts the poll-ordering identifier from a raw envelope, when present.
///
/// The envelope contract only guarantees `eventType` and `payload`;
/// `eventId` is what `lastEventId` threading between polls is built on.
pub fn event_id(envelope: &Value) -> Option<u64> {
    envelope.get("eventId").and_then(Value::as_u64)
}

/// Decodes one raw envelope into an [`Event`].
///
/// Total function: never panics and never returns an error. Classification
/// reads the `eventType` tag; payload parsing failures are folded into
/// [`Event::DecodeError`] with the original envelope attached.
pub fn decode_event(envelope: &Value) -> Event {
    let tag = envelope
        .get("eventType")
        .and_then(Value::as_str)
        .unwrap_or("");

    macro_rules! parse {
        ($variant:ident, $ty:ty) => {
            match parse_payload::<$ty>(envelope) {
                Ok(payload) => Event::$variant(payload),
                Err(e) => {
                    let reason = format!("{tag}: {e}");
                    warn!(event_type = %tag, error = %e, "Failed to decode event payload");
                    Event::DecodeError {
                        reason,
                        raw: envelope.clone(),
                    }
                }
            }
        };
    }

    match tag {
        "newMessage" => parse!(NewMessage, Message),
        "editedMessage" => parse!(EditedMessage, Message),
        "deletedMessage" => parse!(DeletedMessage, MessageRef),
        "pinnedMessage" => parse!(PinnedMessage, Message),
        "unpinnedMessage" => parse!(UnpinnedMessage, MessageRef),
        "newChatMembers" => parse!(NewChatMembers, NewChatMembers),
        "leftChatMembers" => parse!(LeftChatMembers, LeftChatMembers),
        "changedChatInfo" => parse!(ChangedChatInfo, ChangedChatInfo),
        "callbackQuery" => parse!(CallbackQuery, CallbackQuery),
        _ => Event::Unknown {
            event_type: tag.to_string(),
            raw: envelope.clone(),
        },
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(
    envelope: &Value,
) -> Result<T, serde_json::Error> {
    let payload = envelope.get("payload").cloned().unwrap_or(Value::Null);
    serde_json::from_value(payload)
}
