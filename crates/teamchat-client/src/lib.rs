//! # Teamchat Client
//!
//! HTTP client protocol and long-poll event loop for the Teamchat bot API.
//!
//! ## Request pipeline
//!
//! ```text
//! caller ──▶ Bot operation ──▶ parameter codec ──▶ Invoker (reqwest GET) ──▶ ApiResult
//! ```
//!
//! Every operation is a thin deterministic composition over a fixed
//! endpoint path; the [`Invoker`] trait is the single suspension point and
//! the test seam.
//!
//! ## Event pipeline
//!
//! ```text
//! EventLoop ──getEvents──▶ raw envelopes ──decode──▶ Event ──▶ EventHandler
//! ```
//!
//! Batches are dispatched strictly in arrival order; malformed envelopes
//! and handler failures are isolated per event.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use teamchat_client::{Bot, EventLoop};
//! use teamchat_core::BotConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! let bot = Bot::new(BotConfig::from_env()?)?;
//! bot.send_message("chat@example", "hello").await?;
//!
//! let mut events = EventLoop::new(bot);
//! events.run(&MyHandler, CancellationToken::new()).await?;
//! ```

pub mod api;
pub mod bot;
pub mod invoker;
pub mod params;
pub mod poller;

pub use api::{ChatInfo, ChatMember, EventsBatch, FileInfo, SendMessageOptions, SentMessage};
pub use bot::{Bot, DEFAULT_POLL_TIME};
pub use invoker::{HttpInvoker, Invoker, interpret_response};
pub use params::{Params, encode, encode_value};
pub use poller::{EventHandler, EventLoop, dispatch_batch};
