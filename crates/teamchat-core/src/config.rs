//! Resolved client configuration.
//!
//! The client only *consumes* a resolved [`BotConfig`]; it never reads files
//! on its own. [`BotConfig::from_env`] is a convenience layering of the
//! serialized defaults under `TEAMCHAT_*` environment variables:
//!
//! - `TEAMCHAT_TOKEN` → `token`
//! - `TEAMCHAT_API_URL` → `api_url`
//! - `TEAMCHAT_TIMEOUT_MS` → `timeout_ms`

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default base URL of the bot API.
pub const DEFAULT_API_URL: &str = "https://api.teamchat.im/bot/v1";

/// Default request timeout in milliseconds.
///
/// Kept above the default long-poll window (30 s) so `/events/get` calls are
/// not cut short by the HTTP client.
pub const DEFAULT_TIMEOUT_MS: u64 = 35_000;

/// Resolved configuration for one authenticated bot identity.
///
/// Immutable after construction; every operation only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot authentication token. Required, never empty.
    pub token: String,

    /// Base API URL, without a trailing slash.
    pub api_url: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BotConfig {
    /// Creates a configuration with the given token and default settings.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from `TEAMCHAT_*` environment variables layered
    /// over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_env() -> ConfigResult<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("TEAMCHAT_"))
            .extract()
            .map_err(|e| ConfigError::Invalid {
                field: "environment",
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] for an empty token and
    /// [`ConfigError::Invalid`] for an unusable URL or timeout.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
