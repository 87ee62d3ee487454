//! Transport invoker — the single suspension point of the client.
//!
//! [`Invoker`] decouples the API surface from how a request is carried out.
//! [`Bot`](crate::bot::Bot) holds an `Arc<dyn Invoker>` and is completely
//! unaware of the transport; tests substitute a mock implementation.
//!
//! [`HttpInvoker`] is the production implementation: one GET request per
//! call against `base_url + path`, with the auth token merged into the
//! query string. Response interpretation is factored into the pure
//! [`interpret_response`] so the status/body contract is unit-testable
//! without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use teamchat_core::{ApiError, ApiResult, BotConfig, ConfigError, ConfigResult, NetworkError};

use crate::params::Params;

/// Transport-specific API call mechanism.
///
/// `invoke` performs one RPC-style call and yields the parsed JSON result;
/// `fetch` retrieves a raw resource (file content) from an absolute URL.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Issues one API call against the fixed endpoint `path`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] when the network was unreachable; any other
    /// variant when the bot API answered but rejected the call or the
    /// response was unusable.
    async fn invoke(&self, path: &str, params: Params) -> ApiResult<Value>;

    /// Fetches raw bytes from an absolute URL (file downloads).
    async fn fetch(&self, url: &str) -> ApiResult<Vec<u8>>;
}

/// [`Invoker`] backed by a reqwest HTTP client.
pub struct HttpInvoker {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpInvoker {
    /// Creates an invoker from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid configuration or an
    /// unbuildable HTTP client.
    pub fn new(config: &BotConfig) -> ConfigResult<Self> {
        config.validate()?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "timeout_ms",
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Invoker for HttpInvoker {
    async fn invoke(&self, path: &str, params: Params) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = %path, params = params.len(), "Calling bot API");

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("token", self.token.as_str())])
            .query(params.as_slice())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_transport_error)?;
        trace!(path = %path, status = status, "Bot API response");

        interpret_response(status, &body)
    }

    async fn fetch(&self, url: &str) -> ApiResult<Vec<u8>> {
        debug!(url = %url, "Fetching file content");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http { status, body });
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(bytes.to_vec())
    }
}

/// Maps a reqwest failure onto the transport side of the error taxonomy.
///
/// These are the faults where no API-level answer was received, which
/// callers must be able to tell apart from an API rejection.
fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        NetworkError::Timeout.into()
    } else if err.is_connect() {
        NetworkError::Connect(err.to_string()).into()
    } else {
        NetworkError::Io(err.to_string()).into()
    }
}

/// Interprets an HTTP status/body pair as an API result.
///
/// - non-200 → [`ApiError::Http`] with the raw body;
/// - 200 with an unparsable body → [`ApiError::InvalidResponse`] (the body
///   rides in a diagnostic field, not the display message);
/// - 200 with `ok: false` or an `error` field → [`ApiError::Rejected`];
/// - otherwise the parsed JSON value.
pub fn interpret_response(status: u16, body: &str) -> ApiResult<Value> {
    if status != 200 {
        return Err(ApiError::Http {
            status,
            body: body.to_string(),
        });
    }

    let value: Value = serde_json::from_str(body).map_err(|_| ApiError::InvalidResponse {
        body: body.to_string(),
    })?;

    if value.get("ok").and_then(Value::as_bool) == Some(false) {
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(ApiError::Rejected {
            description,
            body: body.to_string(),
        });
    }

    if let Some(error) = value.get("error") {
        let description = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ApiError::Rejected {
            description,
            body: body.to_string(),
        });
    }

    Ok(value)
}
