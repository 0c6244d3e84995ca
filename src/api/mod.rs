// src/api/mod.rs
//! Remote API interaction: the ability to list photos and posts from a
//! group wall and to walk a channel's message history.
//!
//! Transports only move JSON. Pagination, rate limiting and caching are
//! layered on top of them, and parsing into photo candidates happens in
//! [`crate::metadata`].

pub mod cache;
pub mod channel;
pub mod client;
pub mod pagination;
pub mod parser;
pub mod rate_limiter;
pub mod types;
pub mod wall;

use crate::error::AppError;
use indexmap::IndexMap;
use serde_json::Value;

/// Query parameters of one request, in insertion order.
///
/// Order matters only for cache keys and logs; the remote ignores it.
pub type QueryParams = IndexMap<String, String>;

/// The ability to call one method of the wall API.
///
/// Implementations return the unwrapped `response` payload and turn
/// non-success statuses and error envelopes into
/// [`AppError::TransportFault`]. They never retry.
#[async_trait::async_trait]
pub trait ListingTransport: Send + Sync {
    async fn call(&self, method: &str, params: &QueryParams) -> Result<Value, AppError>;
}

// Re-export the public interface
pub use cache::CachedTransport;
pub use channel::{ChannelHttpClient, CursorFetcher, CursorTransport, MessageFilter};
pub use client::WallHttpClient;
pub use pagination::{fetch_all_offsets, PageRequest};
pub use rate_limiter::RateLimiter;
pub use wall::WallGroup;
