// src/api/channel.rs
//! Channel history walked with a forward cursor.
//!
//! Unlike the wall listings there is no offset arithmetic: each batch ends
//! with the oldest message returned, and its id is the cursor for the next
//! batch. The walk ends on the first empty batch. No rate limiter is
//! applied here; the message gateway paces itself.

use super::client::extract_response_text;
use super::parser::preview;
use super::types::{ChannelMessage, MessageBatch, MessageCount};
use crate::constants::{CHANNEL_HISTORY_BATCH, CHANNEL_PHOTO_POSITION};
use crate::error::{ApiErrorCode, AppError};
use crate::model::ChannelPhotoRecord;
use crate::progress::ProgressObserver;
use crate::types::BaseUrl;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Which messages of a channel to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilter {
    /// Messages with a photo attached.
    Photos,
}

impl MessageFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFilter::Photos => "photos",
        }
    }
}

impl fmt::Display for MessageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ability to read a channel's message history.
#[async_trait::async_trait]
pub trait CursorTransport: Send + Sync {
    /// Total number of matching messages, for progress display only.
    async fn count(&self, channel: &str, filter: MessageFilter) -> Result<u64, AppError>;

    /// Up to `limit` matching messages older than `offset_id`, newest first.
    /// `None` starts from the newest message.
    async fn history(
        &self,
        channel: &str,
        filter: MessageFilter,
        offset_id: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, AppError>;
}

/// HTTP client for a message-history gateway.
///
/// Endpoints, relative to the base URL:
/// - `GET channels/{channel}/messages/count?filter=photos` → `{"count": N}`
/// - `GET channels/{channel}/messages?filter=photos&limit=L[&offset_id=X]`
///   → `{"messages": [{"id": 17, "date": "2024-01-01T00:00:00Z"}, ...]}`
#[derive(Clone)]
pub struct ChannelHttpClient {
    client: Client,
    base_url: BaseUrl,
}

impl ChannelHttpClient {
    pub fn new(base_url: BaseUrl) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let mut url = self.base_url.join_path(segments);
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let result = extract_response_text(response).await?;

        if !result.status.is_success() {
            return Err(AppError::TransportFault {
                endpoint: result.url,
                code: ApiErrorCode::from_http_status(result.status.as_u16()),
                message: preview(&result.data),
            });
        }

        serde_json::from_str(&result.data).map_err(|e| {
            AppError::MalformedResponse(format!("{} from {}: {}", e, result.url, preview(&result.data)))
        })
    }
}

#[async_trait::async_trait]
impl CursorTransport for ChannelHttpClient {
    async fn count(&self, channel: &str, filter: MessageFilter) -> Result<u64, AppError> {
        let reply: MessageCount = self
            .get_json(
                &["channels", channel, "messages", "count"],
                &[("filter", filter.to_string())],
            )
            .await?;
        Ok(reply.count)
    }

    async fn history(
        &self,
        channel: &str,
        filter: MessageFilter,
        offset_id: Option<i64>,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, AppError> {
        let mut query = vec![("filter", filter.to_string()), ("limit", limit.to_string())];
        if let Some(offset_id) = offset_id {
            query.push(("offset_id", offset_id.to_string()));
        }
        let batch: MessageBatch = self
            .get_json(&["channels", channel, "messages"], &query)
            .await?;
        Ok(batch.messages)
    }
}

/// Where a walk stands between two batches.
struct Walk {
    cursor: Option<i64>,
    buffered: VecDeque<ChannelMessage>,
}

/// Walks channel histories one batch at a time, one request in flight.
pub struct CursorFetcher {
    transport: Arc<dyn CursorTransport>,
    batch_size: u32,
    cancel: CancellationToken,
}

impl CursorFetcher {
    pub fn new(transport: Arc<dyn CursorTransport>, cancel: CancellationToken) -> Self {
        Self {
            transport,
            batch_size: CHANNEL_HISTORY_BATCH,
            cancel,
        }
    }

    pub fn with_batch_size(self, batch_size: u32) -> Self {
        Self {
            batch_size: batch_size.max(1),
            ..self
        }
    }

    /// Lazily yields every matching message, newest first.
    ///
    /// Each batch request suspends the consumer; nothing is fetched until
    /// the stream is polled.
    pub fn messages<'a>(
        &'a self,
        channel: &'a str,
        filter: MessageFilter,
    ) -> impl Stream<Item = Result<ChannelMessage, AppError>> + Send + 'a {
        let start = Walk {
            cursor: None,
            buffered: VecDeque::new(),
        };

        stream::try_unfold(start, move |mut walk| async move {
            if let Some(message) = walk.buffered.pop_front() {
                return Ok(Some((message, walk)));
            }
            if self.cancel.is_cancelled() {
                log::info!("Walk of {} cancelled", channel);
                return Err(AppError::Cancelled(channel.to_string()));
            }

            let batch = self
                .transport
                .history(channel, filter, walk.cursor, self.batch_size)
                .await?;
            let Some(oldest) = batch.last() else {
                return Ok(None);
            };

            if let Some(cursor) = walk.cursor {
                if oldest.id >= cursor {
                    return Err(AppError::MalformedResponse(format!(
                        "history of {} did not move past message {}",
                        channel, cursor
                    )));
                }
            }
            walk.cursor = Some(oldest.id);
            walk.buffered = batch.into();

            match walk.buffered.pop_front() {
                Some(message) => Ok(Some((message, walk))),
                None => Ok(None),
            }
        })
    }

    /// Collects one record per matching message of `channel`.
    ///
    /// Every message counts as a single photo at position 1, even when it
    /// carries an album of several.
    pub async fn fetch_all(
        &self,
        channel: &str,
        filter: MessageFilter,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<ChannelPhotoRecord>, AppError> {
        let total = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                log::info!("Walk of {} cancelled before the count probe", channel);
                return Err(AppError::Cancelled(channel.to_string()));
            }
            total = self.transport.count(channel, filter) => total?,
        };
        log::info!("Channel {} reports {} {} messages", channel, total, filter);

        let mut records = Vec::new();
        let messages = self.messages(channel, filter);
        futures::pin_mut!(messages);

        while let Some(message) = messages.try_next().await? {
            records.push(ChannelPhotoRecord {
                group: channel.to_string(),
                post_id: message.id.to_string(),
                id: CHANNEL_PHOTO_POSITION,
                date: message.date.timestamp(),
            });
            observer.on_progress("message", records.len() as u64, total);
        }

        log::info!("Channel {}: collected {} messages", channel, records.len());
        Ok(records)
    }
}
