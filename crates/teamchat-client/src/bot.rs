//! The Teamchat bot API surface.
//!
//! One method per bot-API endpoint, each a thin deterministic composition:
//! validate required arguments → build the argument mapping → parameter
//! codec → transport invoker, with a fixed endpoint path per operation.
//!
//! ```rust,ignore
//! use teamchat_client::Bot;
//! use teamchat_core::BotConfig;
//!
//! let bot = Bot::new(BotConfig::new("001.1234:1000"))?;
//! let sent = bot.send_message("chat@example", "Hello!").await?;
//! println!("sent {}", sent.msg_id);
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use teamchat_core::{ApiError, ApiResult, BotConfig, ConfigResult, NetworkError, ValidationError};

use crate::api::{ChatInfo, ChatMember, EventsBatch, FileInfo, SendMessageOptions, SentMessage};
use crate::invoker::{HttpInvoker, Invoker};
use crate::params;

/// Default long-poll window in seconds.
pub const DEFAULT_POLL_TIME: u64 = 30;

/// An authenticated Teamchat bot client.
///
/// Holds only an `Arc<dyn Invoker>`; cloning is cheap and every call is
/// independent, so one `Bot` can serve any number of concurrent tasks
/// without synchronization.
#[derive(Clone)]
pub struct Bot {
    invoker: Arc<dyn Invoker>,
}

impl Bot {
    /// Creates a bot from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Fails before any network call when the configuration is invalid
    /// (empty token, unusable URL or timeout).
    pub fn new(config: BotConfig) -> ConfigResult<Self> {
        Ok(Self {
            invoker: Arc::new(HttpInvoker::new(&config)?),
        })
    }

    /// Creates a bot over a caller-supplied invoker.
    ///
    /// This is the seam used by tests and by anyone who needs a custom
    /// transport.
    pub fn with_invoker(invoker: Arc<dyn Invoker>) -> Self {
        Self { invoker }
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Sends a text message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> ApiResult<SentMessage> {
        self.send_message_with(chat_id, text, &SendMessageOptions::default())
            .await
    }

    /// Sends a text message with optional fields (reply, forward, parse
    /// mode, inline keyboard markup).
    pub async fn send_message_with(
        &self,
        chat_id: &str,
        text: &str,
        options: &SendMessageOptions,
    ) -> ApiResult<SentMessage> {
        require("chatId", chat_id)?;
        require("text", text)?;

        let mut args = into_args(serde_json::to_value(options)?);
        args.insert("chatId".to_string(), json!(chat_id));
        args.insert("text".to_string(), json!(text));

        let result = self.call("/messages/sendText", args).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Sends a previously uploaded file, referenced by its server-side
    /// path, with an optional caption.
    pub async fn send_file(
        &self,
        chat_id: &str,
        file_path: &str,
        caption: Option<&str>,
    ) -> ApiResult<SentMessage> {
        require("chatId", chat_id)?;
        require("filePath", file_path)?;

        let args = into_args(json!({
            "chatId": chat_id,
            "filePath": file_path,
            "caption": caption,
        }));

        let result = self.call("/messages/sendFile", args).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Replaces the text of an existing message.
    pub async fn edit_message(&self, chat_id: &str, msg_id: &str, text: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("msgId", msg_id)?;
        require("text", text)?;

        let args = into_args(json!({ "chatId": chat_id, "msgId": msg_id, "text": text }));
        self.call("/messages/editText", args).await?;
        Ok(())
    }

    /// Deletes a message.
    pub async fn delete_message(&self, chat_id: &str, msg_id: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("msgId", msg_id)?;

        let args = into_args(json!({ "chatId": chat_id, "msgId": msg_id }));
        self.call("/messages/deleteMessages", args).await?;
        Ok(())
    }

    /// Answers a callback query, optionally with a notification text shown
    /// to the user (as an alert if `show_alert` is set).
    pub async fn answer_callback_query(
        &self,
        query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> ApiResult<()> {
        require("queryId", query_id)?;

        let args = into_args(json!({
            "queryId": query_id,
            "text": text,
            "showAlert": show_alert,
        }));
        self.call("/messages/answerCallbackQuery", args).await?;
        Ok(())
    }

    // =========================================================================
    // Chat management
    // =========================================================================

    /// Retrieves chat metadata.
    pub async fn get_chat_info(&self, chat_id: &str) -> ApiResult<ChatInfo> {
        require("chatId", chat_id)?;
        let result = self
            .call("/chats/getInfo", into_args(json!({ "chatId": chat_id })))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Lists chat members.
    pub async fn get_chat_members(&self, chat_id: &str) -> ApiResult<Vec<ChatMember>> {
        require("chatId", chat_id)?;
        let result = self
            .call("/chats/getMembers", into_args(json!({ "chatId": chat_id })))
            .await?;
        extract_field(&result, "members")
    }

    /// Lists chat admins.
    pub async fn get_chat_admins(&self, chat_id: &str) -> ApiResult<Vec<ChatMember>> {
        require("chatId", chat_id)?;
        let result = self
            .call("/chats/getAdmins", into_args(json!({ "chatId": chat_id })))
            .await?;
        extract_field(&result, "admins")
    }

    /// Pins a message in a chat.
    pub async fn pin_message(&self, chat_id: &str, msg_id: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("msgId", msg_id)?;
        let args = into_args(json!({ "chatId": chat_id, "msgId": msg_id }));
        self.call("/chats/pinMessage", args).await?;
        Ok(())
    }

    /// Unpins a message in a chat.
    pub async fn unpin_message(&self, chat_id: &str, msg_id: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("msgId", msg_id)?;
        let args = into_args(json!({ "chatId": chat_id, "msgId": msg_id }));
        self.call("/chats/unpinMessage", args).await?;
        Ok(())
    }

    /// Sets the chat title.
    pub async fn set_chat_title(&self, chat_id: &str, title: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("title", title)?;
        let args = into_args(json!({ "chatId": chat_id, "title": title }));
        self.call("/chats/setTitle", args).await?;
        Ok(())
    }

    /// Sets the chat description.
    pub async fn set_chat_about(&self, chat_id: &str, about: &str) -> ApiResult<()> {
        require("chatId", chat_id)?;
        require("about", about)?;
        let args = into_args(json!({ "chatId": chat_id, "about": about }));
        self.call("/chats/setAbout", args).await?;
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Long-polls for new events.
    ///
    /// `poll_time` is the server-side hold in seconds; `last_event_id` is
    /// the highest identifier already seen (0 to start from now); `limit`
    /// caps the batch size.
    pub async fn get_events(
        &self,
        poll_time: u64,
        last_event_id: u64,
        limit: Option<u32>,
    ) -> ApiResult<EventsBatch> {
        let args = into_args(json!({
            "pollTime": poll_time,
            "lastEventId": last_event_id,
            "limit": limit,
        }));
        let result = self.call("/events/get", args).await?;
        Ok(serde_json::from_value(result)?)
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Retrieves file metadata, including the download URL.
    pub async fn get_file_info(&self, file_id: &str) -> ApiResult<FileInfo> {
        require("fileId", file_id)?;
        let result = self
            .call("/files/getInfo", into_args(json!({ "fileId": file_id })))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Downloads a file's content and optionally saves it to `save_to`.
    pub async fn get_file(&self, file_id: &str, save_to: Option<&Path>) -> ApiResult<Vec<u8>> {
        let info = self.get_file_info(file_id).await?;
        let bytes = self.invoker.fetch(&info.url).await?;

        if let Some(path) = save_to {
            debug!(path = %path.display(), size = bytes.len(), "Saving downloaded file");
            tokio::fs::write(path, &bytes)
                .await
                .map_err(|e| NetworkError::Io(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Encodes the argument mapping and issues one call.
    async fn call(&self, path: &'static str, args: Map<String, Value>) -> ApiResult<Value> {
        let params = params::encode(&args);
        self.invoker.invoke(path, params).await
    }
}

/// Validates that a required string argument is present and non-empty.
fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingParameter { field })
    } else {
        Ok(())
    }
}

/// Unwraps a `json!` object literal into an argument mapping.
fn into_args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Deserializes one field of a result value.
fn extract_field<T: DeserializeOwned>(value: &Value, field: &str) -> ApiResult<T> {
    let field_value = value
        .get(field)
        .cloned()
        .ok_or_else(|| ApiError::Serialization(format!("missing '{field}' in response")))?;
    Ok(serde_json::from_value(field_value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use teamchat_core::ParseMode;

    /// Records every call and replays canned responses in order.
    struct MockInvoker {
        calls: Mutex<Vec<(String, Params)>>,
        responses: Mutex<VecDeque<ApiResult<Value>>>,
        file_content: Vec<u8>,
    }

    impl MockInvoker {
        fn replying(responses: Vec<ApiResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
                file_content: b"file-bytes".to_vec(),
            })
        }

        fn single(response: ApiResult<Value>) -> Arc<Self> {
            Self::replying(vec![response])
        }

        fn calls(&self) -> Vec<(String, Params)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Invoker for MockInvoker {
        async fn invoke(&self, path: &str, params: Params) -> ApiResult<Value> {
            self.calls.lock().unwrap().push((path.to_string(), params));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({ "ok": true })))
        }

        async fn fetch(&self, _url: &str) -> ApiResult<Vec<u8>> {
            Ok(self.file_content.clone())
        }
    }

    #[tokio::test]
    async fn send_message_hits_fixed_path_with_required_params() {
        let invoker = MockInvoker::single(Ok(json!({ "ok": true, "msgId": "m1" })));
        let bot = Bot::with_invoker(invoker.clone());

        let sent = bot.send_message("c1", "hi").await.unwrap();
        assert_eq!(sent.msg_id, "m1");

        let calls = invoker.calls();
        assert_eq!(calls.len(), 1);
        let (path, params) = &calls[0];
        assert_eq!(path, "/messages/sendText");
        assert_eq!(params.get("chatId"), Some("c1"));
        assert_eq!(params.get("text"), Some("hi"));
        // Unset optional fields never reach the wire.
        assert!(!params.contains("parseMode"));
        assert!(!params.contains("replyMsgId"));
    }

    #[tokio::test]
    async fn send_message_options_pass_through() {
        let invoker = MockInvoker::single(Ok(json!({ "ok": true, "msgId": "m2" })));
        let bot = Bot::with_invoker(invoker.clone());

        let markup = json!([[{ "text": "Yes", "callbackData": "yes" }]]);
        let options = SendMessageOptions::new()
            .reply_to("m1")
            .parse_mode(ParseMode::MarkdownV2)
            .keyboard(markup.clone());
        bot.send_message_with("c1", "pick one", &options)
            .await
            .unwrap();

        let (_, params) = &invoker.calls()[0];
        assert_eq!(params.get("replyMsgId"), Some("m1"));
        assert_eq!(params.get("parseMode"), Some("MarkdownV2"));
        let rendered = params.get("inlineKeyboardMarkup").unwrap();
        assert_eq!(serde_json::from_str::<Value>(rendered).unwrap(), markup);
    }

    #[tokio::test]
    async fn api_rejection_surfaces_as_error_value() {
        let invoker = MockInvoker::single(Err(ApiError::Http {
            status: 403,
            body: "forbidden".to_string(),
        }));
        let bot = Bot::with_invoker(invoker);

        match bot.send_message("c1", "hi").await {
            Err(ApiError::Http { status, .. }) => assert_eq!(status, 403),
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_required_argument_fails_before_any_call() {
        let invoker = MockInvoker::replying(vec![]);
        let bot = Bot::with_invoker(invoker.clone());

        assert!(matches!(
            bot.send_message("", "hi").await,
            Err(ApiError::Validation(ValidationError::MissingParameter { field: "chatId" }))
        ));
        assert!(matches!(
            bot.edit_message("c1", "  ", "text").await,
            Err(ApiError::Validation(ValidationError::MissingParameter { field: "msgId" }))
        ));
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn answer_callback_query_drops_absent_text() {
        let invoker = MockInvoker::replying(vec![Ok(json!({ "ok": true })), Ok(json!({ "ok": true }))]);
        let bot = Bot::with_invoker(invoker.clone());

        bot.answer_callback_query("q1", None, false).await.unwrap();
        bot.answer_callback_query("q2", Some("Done"), true)
            .await
            .unwrap();

        let calls = invoker.calls();
        let (path, first) = &calls[0];
        assert_eq!(path, "/messages/answerCallbackQuery");
        assert_eq!(first.get("queryId"), Some("q1"));
        assert!(!first.contains("text"));
        assert_eq!(first.get("showAlert"), Some("false"));

        let (_, second) = &calls[1];
        assert_eq!(second.get("text"), Some("Done"));
        assert_eq!(second.get("showAlert"), Some("true"));
    }

    #[tokio::test]
    async fn chat_listings_extract_their_field() {
        let invoker = MockInvoker::single(Ok(json!({
            "ok": true,
            "admins": [
                { "userId": "u1", "creator": true },
                { "userId": "u2", "admin": true }
            ]
        })));
        let bot = Bot::with_invoker(invoker.clone());

        let admins = bot.get_chat_admins("c1").await.unwrap();
        assert_eq!(admins.len(), 2);
        assert!(admins[0].creator);
        assert!(admins[1].admin);
        assert_eq!(invoker.calls()[0].0, "/chats/getAdmins");
    }

    #[tokio::test]
    async fn missing_listing_field_is_a_serialization_error() {
        let invoker = MockInvoker::single(Ok(json!({ "ok": true })));
        let bot = Bot::with_invoker(invoker);

        assert!(matches!(
            bot.get_chat_members("c1").await,
            Err(ApiError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn get_events_encodes_poll_parameters() {
        let invoker = MockInvoker::single(Ok(json!({ "ok": true, "events": [] })));
        let bot = Bot::with_invoker(invoker.clone());

        let batch = bot.get_events(30, 17, Some(50)).await.unwrap();
        assert!(batch.events.is_empty());

        let (path, params) = &invoker.calls()[0];
        assert_eq!(path, "/events/get");
        assert_eq!(params.get("pollTime"), Some("30"));
        assert_eq!(params.get("lastEventId"), Some("17"));
        assert_eq!(params.get("limit"), Some("50"));
    }

    #[tokio::test]
    async fn get_events_omits_absent_limit() {
        let invoker = MockInvoker::single(Ok(json!({ "ok": true, "events": [] })));
        let bot = Bot::with_invoker(invoker.clone());

        bot.get_events(30, 0, None).await.unwrap();
        assert!(!invoker.calls()[0].1.contains("limit"));
    }

    #[tokio::test]
    async fn get_file_fetches_url_from_file_info() {
        let invoker = MockInvoker::single(Ok(json!({
            "ok": true,
            "fileId": "f1",
            "url": "https://files.example/f1",
            "size": 10
        })));
        let bot = Bot::with_invoker(invoker.clone());

        let bytes = bot.get_file("f1", None).await.unwrap();
        assert_eq!(bytes, b"file-bytes");
        assert_eq!(invoker.calls()[0].0, "/files/getInfo");
    }

    #[tokio::test]
    async fn pin_and_chat_metadata_paths_are_fixed() {
        let responses = (0..4).map(|_| Ok(json!({ "ok": true }))).collect();
        let invoker = MockInvoker::replying(responses);
        let bot = Bot::with_invoker(invoker.clone());

        bot.pin_message("c1", "m1").await.unwrap();
        bot.unpin_message("c1", "m1").await.unwrap();
        bot.set_chat_title("c1", "Team").await.unwrap();
        bot.set_chat_about("c1", "All hands").await.unwrap();

        let paths: Vec<_> = invoker.calls().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            [
                "/chats/pinMessage",
                "/chats/unpinMessage",
                "/chats/setTitle",
                "/chats/setAbout"
            ]
        );
    }
}
