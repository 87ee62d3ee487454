//! Long-poll event loop and ordered batch dispatch.
//!
//! [`EventLoop`] repeatedly calls `getEvents`, threads `lastEventId` from
//! one poll into the next, and hands each decoded [`Event`] to an
//! [`EventHandler`] in arrival order. Failure isolation:
//!
//! - a malformed envelope becomes [`Event::DecodeError`] and is dispatched
//!   like any other event;
//! - a handler error is logged and never aborts the rest of the batch;
//! - a network failure backs off briefly and polling resumes;
//! - cancellation (via [`CancellationToken`]) stops the loop cleanly and
//!   surfaces as [`ApiError::Cancelled`] from an in-flight poll.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use teamchat_core::{ApiError, ApiResult, Event, decode_event, event_id};

use crate::bot::{Bot, DEFAULT_POLL_TIME};

/// Delay before retrying after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Receiver of decoded events.
///
/// Implementations are invoked once per envelope, in input order. Returning
/// an error only affects logging — the batch continues.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handles one decoded event.
    async fn on_event(&self, event: Event) -> anyhow::Result<()>;
}

/// Decodes and dispatches one batch of raw envelopes, in input order.
///
/// Invokes the handler exactly once per envelope; decode failures arrive as
/// [`Event::DecodeError`] and handler failures are logged per event.
pub async fn dispatch_batch<H: EventHandler + ?Sized>(events: &[Value], handler: &H) {
    for raw in events {
        let event = decode_event(raw);
        let kind = event.kind();
        if let Err(e) = handler.on_event(event).await {
            warn!(event = %kind, error = %e, "Event handler failed");
        }
    }
}

/// Long-poll driver over [`Bot::get_events`].
pub struct EventLoop {
    bot: Bot,
    poll_time: u64,
    limit: Option<u32>,
    last_event_id: u64,
}

impl EventLoop {
    /// Creates an event loop with the default 30-second poll window,
    /// starting from the present (`lastEventId` 0).
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            poll_time: DEFAULT_POLL_TIME,
            limit: None,
            last_event_id: 0,
        }
    }

    /// Sets the long-poll window in seconds.
    pub fn poll_time(mut self, seconds: u64) -> Self {
        self.poll_time = seconds;
        self
    }

    /// Caps the number of events per poll.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes from a previously seen event identifier.
    pub fn resume_from(mut self, last_event_id: u64) -> Self {
        self.last_event_id = last_event_id;
        self
    }

    /// The highest event identifier seen so far.
    pub fn last_event_id(&self) -> u64 {
        self.last_event_id
    }

    /// Performs one poll and advances `lastEventId`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] when `cancel` fires while the poll is in
    /// flight; otherwise whatever `getEvents` returned.
    pub async fn poll_once(&mut self, cancel: &CancellationToken) -> ApiResult<Vec<Value>> {
        let batch = tokio::select! {
            () = cancel.cancelled() => return Err(ApiError::Cancelled),
            result = self.bot.get_events(self.poll_time, self.last_event_id, self.limit) => result?,
        };

        for raw in &batch.events {
            if let Some(id) = event_id(raw)
                && id > self.last_event_id
            {
                self.last_event_id = id;
            }
        }
        Ok(batch.events)
    }

    /// Runs until cancelled, dispatching every batch to `handler`.
    ///
    /// Network failures are logged and retried after a short delay; API
    /// rejections (bad token, revoked bot) abort the loop with the error.
    /// Cancellation returns `Ok(())`.
    pub async fn run<H: EventHandler>(
        &mut self,
        handler: &H,
        cancel: CancellationToken,
    ) -> ApiResult<()> {
        info!(
            poll_time = self.poll_time,
            last_event_id = self.last_event_id,
            "Starting event loop"
        );

        loop {
            match self.poll_once(&cancel).await {
                Ok(events) => {
                    if !events.is_empty() {
                        debug!(count = events.len(), "Received event batch");
                    }
                    dispatch_batch(&events, handler).await;
                }
                Err(ApiError::Cancelled) => {
                    info!("Event loop cancelled");
                    return Ok(());
                }
                Err(err @ (ApiError::Network(_) | ApiError::InvalidResponse { .. })) => {
                    warn!(error = %err, "Poll failed, backing off");
                    tokio::select! {
                        () = cancel.cancelled() => return Ok(()),
                        () = tokio::time::sleep(RETRY_DELAY) => {}
                    }
                }
                Err(err) => {
                    warn!(error = %err, "Poll rejected, stopping event loop");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::Invoker;
    use crate::params::Params;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Collects the kinds of every dispatched event.
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(kind: &'static str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_on: Some(kind),
            }
        }
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn on_event(&self, event: Event) -> anyhow::Result<()> {
            let kind = event.kind();
            self.seen.lock().unwrap().push(kind);
            if self.fail_on == Some(kind) {
                anyhow::bail!("handler refused {kind}");
            }
            Ok(())
        }
    }

    /// Invoker that replays canned poll responses, then hangs forever.
    struct PollInvoker {
        calls: Mutex<Vec<Params>>,
        responses: Mutex<VecDeque<ApiResult<Value>>>,
    }

    impl PollInvoker {
        fn replying(responses: Vec<ApiResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl Invoker for PollInvoker {
        async fn invoke(&self, _path: &str, params: Params) -> ApiResult<Value> {
            self.calls.lock().unwrap().push(params);
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(response) => response,
                // Simulate a server holding the long poll open.
                None => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(json!({ "ok": true, "events": [] }))
                }
            }
        }

        async fn fetch(&self, _url: &str) -> ApiResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    fn envelope(id: u64, event_type: &str, payload: Value) -> Value {
        json!({ "eventId": id, "eventType": event_type, "payload": payload })
    }

    #[tokio::test]
    async fn malformed_event_does_not_abort_the_batch() {
        let batch = [
            envelope(1, "newMessage", json!({ "msgId": "m1", "text": "a" })),
            envelope(2, "newMessage", json!({ "msgId": { "bad": true } })),
            envelope(3, "callbackQuery", json!({ "queryId": "q1" })),
        ];
        let recorder = Recorder::new();

        dispatch_batch(&batch, &recorder).await;

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec!["newMessage", "decodeError", "callbackQuery"]
        );
    }

    #[tokio::test]
    async fn handler_failure_does_not_abort_the_batch() {
        let batch = [
            envelope(1, "newMessage", json!({ "msgId": "m1" })),
            envelope(2, "newMessage", json!({ "msgId": "m2" })),
            envelope(3, "newMessage", json!({ "msgId": "m3" })),
        ];
        let recorder = Recorder::failing_on("newMessage");

        dispatch_batch(&batch, &recorder).await;

        // All three still dispatched despite every call failing.
        assert_eq!(recorder.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn poll_threads_last_event_id() {
        let invoker = PollInvoker::replying(vec![
            Ok(json!({
                "ok": true,
                "events": [
                    envelope(3, "newMessage", json!({ "msgId": "m1" })),
                    envelope(5, "newMessage", json!({ "msgId": "m2" })),
                ]
            })),
            Ok(json!({ "ok": true, "events": [] })),
        ]);
        let bot = Bot::with_invoker(invoker.clone());
        let mut event_loop = EventLoop::new(bot);
        let cancel = CancellationToken::new();

        let first = event_loop.poll_once(&cancel).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(event_loop.last_event_id(), 5);

        event_loop.poll_once(&cancel).await.unwrap();
        let calls = invoker.calls.lock().unwrap();
        assert_eq!(calls[0].get("lastEventId"), Some("0"));
        assert_eq!(calls[1].get("lastEventId"), Some("5"));
    }

    #[tokio::test]
    async fn cancellation_yields_cancelled_not_a_request_failure() {
        // No canned responses: the invoker hangs like a held long poll.
        let invoker = PollInvoker::replying(vec![]);
        let bot = Bot::with_invoker(invoker);
        let mut event_loop = EventLoop::new(bot);

        let cancel = CancellationToken::new();
        let poll = event_loop.poll_once(&cancel);
        tokio::pin!(poll);

        tokio::select! {
            _ = &mut poll => panic!("poll resolved without cancellation"),
            () = tokio::time::sleep(Duration::from_millis(10)) => cancel.cancel(),
        }

        assert!(matches!(poll.await, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn run_stops_cleanly_on_cancel_and_dispatches_batches() {
        let invoker = PollInvoker::replying(vec![Ok(json!({
            "ok": true,
            "events": [envelope(1, "newMessage", json!({ "msgId": "m1", "text": "hi" }))]
        }))]);
        let bot = Bot::with_invoker(invoker);
        let mut event_loop = EventLoop::new(bot);
        let recorder = Recorder::new();

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        event_loop.run(&recorder, cancel).await.unwrap();
        assert_eq!(*recorder.seen.lock().unwrap(), vec!["newMessage"]);
    }

    #[tokio::test]
    async fn run_aborts_on_api_rejection() {
        let invoker = PollInvoker::replying(vec![Err(ApiError::Rejected {
            description: "invalid token".to_string(),
            body: r#"{"ok":false,"description":"invalid token"}"#.to_string(),
        })]);
        let bot = Bot::with_invoker(invoker);
        let mut event_loop = EventLoop::new(bot);
        let recorder = Recorder::new();

        let result = event_loop.run(&recorder, CancellationToken::new()).await;
        assert!(matches!(result, Err(ApiError::Rejected { .. })));
    }
}
