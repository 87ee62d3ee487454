//! Typed request options and response payloads for the API surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use teamchat_core::{ChatKind, ParseMode};

// ============================================================================
// Request options
// ============================================================================

/// Optional fields of `sendMessage`.
///
/// Serializes to the flat argument mapping consumed by the parameter codec;
/// unset fields become `null` and are dropped at encoding time.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageOptions {
    /// Message to reply to.
    pub reply_msg_id: Option<String>,
    /// Source chat of a forwarded message.
    pub forward_chat_id: Option<String>,
    /// Forwarded message identifier.
    pub forward_msg_id: Option<String>,
    /// Text formatting mode.
    pub parse_mode: Option<ParseMode>,
    /// Inline keyboard markup, consumed as an opaque nested mapping and
    /// passed through as canonical JSON text.
    pub inline_keyboard_markup: Option<Value>,
}

impl SendMessageOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message to reply to.
    pub fn reply_to(mut self, msg_id: impl Into<String>) -> Self {
        self.reply_msg_id = Some(msg_id.into());
        self
    }

    /// Sets the text formatting mode.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// Attaches inline keyboard markup.
    pub fn keyboard(mut self, markup: Value) -> Self {
        self.inline_keyboard_markup = Some(markup);
        self
    }
}

// ============================================================================
// Response payloads
// ============================================================================

/// Result of sending (or editing) a message.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    /// Identifier of the created message.
    #[serde(rename = "msgId")]
    pub msg_id: String,
}

/// Chat metadata returned by `getChatInfo`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInfo {
    /// Chat kind.
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
    /// Chat title.
    #[serde(default)]
    pub title: Option<String>,
    /// Chat description.
    #[serde(default)]
    pub about: Option<String>,
    /// Whether the chat is publicly joinable.
    #[serde(default)]
    pub public: bool,
    /// Invite link, when available.
    #[serde(default)]
    pub invite_link: Option<String>,
}

/// One entry of a chat member or admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMember {
    /// Member user identifier.
    pub user_id: String,
    /// Whether the member created the chat.
    #[serde(default)]
    pub creator: bool,
    /// Whether the member is an admin.
    #[serde(default)]
    pub admin: bool,
}

/// File metadata returned by `getFileInfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File identifier.
    #[serde(default)]
    pub file_id: Option<String>,
    /// File kind reported by the platform ("image", "video", …).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Original filename.
    #[serde(default)]
    pub filename: Option<String>,
    /// Absolute download URL.
    pub url: String,
}

/// One long-poll result: raw event envelopes, in arrival order.
///
/// Envelopes stay raw JSON here; decoding happens per envelope in
/// [`decode_event`](teamchat_core::decode_event) so that one malformed
/// event cannot poison the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsBatch {
    /// Raw envelopes, in input order.
    #[serde(default)]
    pub events: Vec<Value>,
}
