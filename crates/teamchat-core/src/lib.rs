//! # Teamchat Core
//!
//! Domain model and event-decoding layer for the Teamchat bot API client.
//!
//! This crate is transport-free: it defines the typed values exchanged with
//! the platform ([`Chat`], [`User`], [`Message`], [`CallbackQuery`]), the
//! closed [`Event`] sum type with its decoder, the error taxonomy, and the
//! resolved [`BotConfig`] every operation reads.
//!
//! ## Event Decoding
//!
//! ```
//! use teamchat_core::{decode_event, Event};
//!
//! let raw = serde_json::json!({
//!     "eventType": "newMessage",
//!     "payload": { "msgId": "1", "text": "hi", "timestamp": 0 }
//! });
//!
//! match decode_event(&raw) {
//!     Event::NewMessage(msg) => assert_eq!(msg.text, "hi"),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Decoding is total: unrecognized tags become [`Event::Unknown`] and
//! malformed payloads become [`Event::DecodeError`], both carrying the
//! original envelope.

pub mod config;
pub mod error;
pub mod event;
pub mod types;

pub use config::{BotConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ApiError, ApiResult, ConfigError, ConfigResult, NetworkError, ValidationError};
pub use event::{
    ChangedChatInfo, Event, LeftChatMembers, MessageRef, NewChatMembers, decode_event, event_id,
};
pub use types::{CallbackQuery, Chat, ChatKind, Message, ParseMode, User};
