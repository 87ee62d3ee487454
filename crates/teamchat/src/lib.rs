//! # Teamchat
//!
//! A client library for the Teamchat bot API: typed RPC-style operations
//! (send/edit/delete messages, chat management, file retrieval) and a
//! long-poll event pipeline decoding raw envelopes into a closed
//! [`Event`](teamchat_core::Event) sum type.
//!
//! This crate re-exports the member crates:
//!
//! - [`teamchat_core`] — domain model, event decoder, errors, configuration
//! - [`teamchat_client`] — parameter codec, HTTP invoker, API surface,
//!   event loop
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use teamchat::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = Bot::new(BotConfig::from_env()?)?;
//!     bot.send_message("chat@example", "Hello!").await?;
//!     Ok(())
//! }
//! ```

pub use teamchat_client;
pub use teamchat_core;

pub use teamchat_client::{
    Bot, ChatInfo, ChatMember, EventHandler, EventLoop, EventsBatch, FileInfo, HttpInvoker,
    Invoker, Params, SendMessageOptions, SentMessage, dispatch_batch,
};
pub use teamchat_core::{
    ApiError, ApiResult, BotConfig, CallbackQuery, Chat, ChatKind, ConfigError, Event, Message,
    NetworkError, ParseMode, User, ValidationError, decode_event,
};

/// Commonly used items, in one import.
pub mod prelude {
    pub use teamchat_client::{
        Bot, EventHandler, EventLoop, SendMessageOptions,
    };
    pub use teamchat_core::{
        ApiError, ApiResult, BotConfig, Event, ParseMode,
    };
}
