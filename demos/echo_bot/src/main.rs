//! Echo Bot Demo
//!
//! Long-polls for events and echoes every incoming message back to its
//! chat; callback queries are acknowledged with a small notification.
//!
//! # Usage
//!
//! ```bash
//! TEAMCHAT_TOKEN=001.1234:1000 cargo run --package echo-bot
//! # or
//! cargo run --package echo-bot -- --token 001.1234:1000
//! ```

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use teamchat::prelude::*;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Echo bot for the Teamchat platform")]
struct Args {
    /// Bot token (falls back to the TEAMCHAT_TOKEN environment variable).
    #[arg(long)]
    token: Option<String>,

    /// Base API URL override.
    #[arg(long)]
    api_url: Option<String>,

    /// Long-poll window in seconds.
    #[arg(long, default_value_t = 30)]
    poll_time: u64,
}

/// Echoes messages and acknowledges callback queries.
struct EchoHandler {
    bot: Bot,
}

#[async_trait]
impl EventHandler for EchoHandler {
    async fn on_event(&self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::NewMessage(msg) => {
                let Some(chat) = msg.chat else {
                    warn!(msg_id = %msg.id, "Message without chat, nothing to echo");
                    return Ok(());
                };
                let sender = msg
                    .from
                    .as_ref()
                    .map(|u| u.display_name().to_string())
                    .unwrap_or_else(|| "someone".to_string());
                info!(chat = %chat.id, from = %sender, "Echoing message");
                self.bot.send_message(&chat.id, &msg.text).await?;
            }
            Event::CallbackQuery(query) => {
                self.bot
                    .answer_callback_query(&query.id, Some("Got it!"), false)
                    .await?;
            }
            Event::DecodeError { reason, .. } => {
                warn!(reason = %reason, "Skipping undecodable event");
            }
            other => {
                info!(event = other.kind(), "Ignoring event");
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match args.token {
        Some(token) => {
            let mut config = BotConfig::new(token);
            if let Some(api_url) = args.api_url {
                config.api_url = api_url;
            }
            config
        }
        None => BotConfig::from_env().context("set TEAMCHAT_TOKEN or pass --token")?,
    };

    let bot = Bot::new(config)?;
    let handler = EchoHandler { bot: bot.clone() };

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            ctrl_c_cancel.cancel();
        }
    });

    let mut events = EventLoop::new(bot).poll_time(args.poll_time);
    events.run(&handler, cancel).await?;

    info!("Echo bot stopped");
    Ok(())
}
