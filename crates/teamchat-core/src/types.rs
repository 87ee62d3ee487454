//! Common Teamchat domain types.
//!
//! These are the shared building blocks of event payloads. Every sub-object
//! that the wire format may omit is optional and defaulted, so a partial
//! payload decodes to a partial value instead of failing.

use serde::{Deserialize, Serialize};

/// Kind of chat a message belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatKind {
    /// One-to-one conversation.
    Private,
    /// Multi-member group.
    Group,
    /// Broadcast channel.
    Channel,
    /// Any kind this client does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A chat the bot participates in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Chat identifier.
    #[serde(rename = "chatId")]
    pub id: String,
    /// Chat kind ("private", "group", "channel").
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
    /// Chat title (groups and channels).
    #[serde(default)]
    pub title: Option<String>,
    /// Whether the chat is publicly joinable.
    #[serde(default)]
    pub public: bool,
}

/// A platform user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User identifier.
    #[serde(rename = "userId")]
    pub id: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Nickname.
    #[serde(default)]
    pub nick: Option<String>,
}

impl User {
    /// Returns a human-readable display name.
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// A chat message.
///
/// `chat` and `from` are optional: a source payload may omit them and the
/// decoder propagates the absence instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    #[serde(rename = "msgId")]
    pub id: String,
    /// Unix timestamp of the message.
    #[serde(default)]
    pub timestamp: i64,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Chat the message belongs to, when present in the payload.
    #[serde(default)]
    pub chat: Option<Chat>,
    /// Sending user, when present in the payload.
    #[serde(default)]
    pub from: Option<User>,
}

/// A callback query fired by an inline-keyboard button press.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackQuery {
    /// Query identifier, required to answer the query.
    #[serde(rename = "queryId")]
    pub id: String,
    /// User who pressed the button, when present in the payload.
    #[serde(default)]
    pub from: Option<User>,
    /// Message the button was attached to, when present in the payload.
    #[serde(default)]
    pub message: Option<Message>,
    /// Opaque callback data configured on the button.
    #[serde(rename = "callbackData", default)]
    pub data: String,
}

/// Text formatting mode for outgoing messages.
///
/// Serializes as its bare name, which is how the parameter codec renders
/// symbolic tags on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    /// Markdown V2 formatting.
    MarkdownV2,
    /// HTML formatting.
    #[serde(rename = "HTML")]
    Html,
}
