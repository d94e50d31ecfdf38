//! MAX Bot API transport: long polling in, messages out.

use async_trait::async_trait;
use derive_getters::Getters;
use meteobot_error::{MeteobotResult, TransportError, TransportErrorKind};
use meteobot_weather::retry::with_retry;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Initial backoff for retried sends.
const SEND_BACKOFF_MS: u64 = 500;

/// One inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// Sender identity
    pub user_id: i64,
    /// Originating chat
    pub chat_id: i64,
    /// Platform message id
    pub message_id: i64,
    /// Message text; absent for non-text events
    #[serde(default)]
    pub text: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update id
    pub update_id: i64,
    /// The message payload, when the update is a message event
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

/// A batch of updates plus the marker to resume from.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct UpdateBatch {
    /// Updates in arrival order
    updates: Vec<Update>,
    /// Offset for the next poll
    #[serde(default)]
    marker: Option<i64>,
}

/// Acknowledgement of an outbound send.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    /// Platform id of the sent message, used for later edits
    pub message_id: i64,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    recipient: Recipient,
    message: MessageBody<'a>,
}

#[derive(Serialize)]
struct Recipient {
    chat_id: i64,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    text: &'a str,
}

/// Outbound side of the chat platform.
///
/// The handler depends on this trait so tests can capture replies
/// without a network.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Send a new message to a chat.
    async fn send(&self, chat_id: i64, text: &str) -> Result<SentMessage, TransportError>;
    /// Replace the text of a previously sent message.
    async fn edit(&self, chat_id: i64, message_id: i64, text: &str)
    -> Result<(), TransportError>;
}

/// MAX Bot API client.
#[derive(Debug, Clone)]
pub struct MaxClient {
    client: Client,
    token: String,
    base_url: String,
    retry_attempts: usize,
}

impl MaxClient {
    /// Creates a new client.
    pub fn new(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
        retry_attempts: usize,
    ) -> MeteobotResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TransportError::new(TransportErrorKind::Network(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;

        debug!("Creating MAX Bot API client");
        Ok(Self {
            client,
            token: token.into(),
            base_url: base_url.into(),
            retry_attempts,
        })
    }

    /// Long-poll for new updates.
    ///
    /// `marker` is the offset returned by the previous batch; `None`
    /// starts from the platform's current position.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        marker: Option<i64>,
        poll_timeout_secs: u64,
    ) -> Result<UpdateBatch, TransportError> {
        let url = format!("{}/updates", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            // Long poll needs headroom beyond the client timeout.
            .timeout(Duration::from_secs(poll_timeout_secs + 5))
            .query(&[("timeout", poll_timeout_secs)]);
        if let Some(marker) = marker {
            request = request.query(&[("marker", marker)]);
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let response = check_status(response).await?;

        let batch: UpdateBatch = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to decode updates");
            TransportError::new(TransportErrorKind::Decode(e.to_string()))
        })?;

        debug!(count = batch.updates().len(), "Received updates");
        Ok(batch)
    }

    async fn send_once(&self, chat_id: i64, text: &str) -> Result<SentMessage, TransportError> {
        let url = format!("{}/messages", self.base_url);
        let payload = SendPayload {
            recipient: Recipient { chat_id },
            message: MessageBody { text },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;
        let response = check_status(response).await?;

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to decode send acknowledgement");
            TransportError::new(TransportErrorKind::Decode(e.to_string()))
        })
    }

    async fn edit_once(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        let url = format!("{}/messages/{}", self.base_url, message_id);
        let payload = SendPayload {
            recipient: Recipient { chat_id },
            message: MessageBody { text },
        };

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatSink for MaxClient {
    #[instrument(skip(self, text), fields(chat_id))]
    async fn send(&self, chat_id: i64, text: &str) -> Result<SentMessage, TransportError> {
        with_retry(
            self.retry_attempts,
            SEND_BACKOFF_MS,
            |e: &TransportError| e.kind().is_retryable(),
            || self.send_once(chat_id, text),
        )
        .await
    }

    #[instrument(skip(self, text), fields(chat_id, message_id))]
    async fn edit(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        with_retry(
            self.retry_attempts,
            SEND_BACKOFF_MS,
            |e: &TransportError| e.kind().is_retryable(),
            || self.edit_once(chat_id, message_id, text),
        )
        .await
    }
}

/// Map non-success statuses onto transport error kinds.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        error!("Chat API rejected the bot token");
        return Err(TransportError::new(TransportErrorKind::Unauthorized));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Chat API rate limit hit");
        return Err(TransportError::new(TransportErrorKind::RateLimited));
    }

    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %body, "Chat API returned error status");
    Err(TransportError::new(TransportErrorKind::Status {
        status: status.as_u16(),
        message: body,
    }))
}

fn classify_transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportErrorKind::Timeout);
    }
    TransportError::new(TransportErrorKind::Network(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    // The same classifier the ChatSink impl hands to with_retry.
    fn retryable(e: &TransportError) -> bool {
        e.kind().is_retryable()
    }

    #[tokio::test]
    async fn send_retries_through_rate_limiting() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, TransportError> = with_retry(3, 1, retryable, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(TransportError::new(TransportErrorKind::RateLimited))
                } else {
                    Ok("delivered")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "delivered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn send_gives_up_immediately_on_bad_token() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TransportError> = with_retry(3, 1, retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TransportError::new(TransportErrorKind::Unauthorized)) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(*err.kind(), TransportErrorKind::Unauthorized);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_retry_until_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TransportError> = with_retry(2, 1, retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(TransportError::new(TransportErrorKind::Status {
                    status: 503,
                    message: "maintenance".to_string(),
                }))
            }
        })
        .await;

        assert!(result.is_err());
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
