// src/api/cache.rs
//! Bounded in-memory response cache for wall API calls.
//!
//! Identical requests issued during one client's lifetime are answered
//! from memory instead of hitting the remote again. Nothing is persisted;
//! a new client starts cold.

use super::{ListingTransport, QueryParams};
use crate::error::AppError;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A [`ListingTransport`] that remembers successful replies, keyed by
/// method and parameters. Failures are never cached.
pub struct CachedTransport<T> {
    inner: T,
    entries: Mutex<LruCache<String, Value>>,
    hits: AtomicU64,
}

impl<T: ListingTransport> CachedTransport<T> {
    /// Wraps a transport; `capacity` of zero is treated as one.
    pub fn new(inner: T, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
        }
    }

    /// Request identity: the method plus every parameter in order.
    fn cache_key(method: &str, params: &QueryParams) -> String {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{}?{}", method, query.join("&"))
    }

    /// Number of calls answered from memory so far.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<T: ListingTransport> ListingTransport for CachedTransport<T> {
    async fn call(&self, method: &str, params: &QueryParams) -> Result<Value, AppError> {
        let key = Self::cache_key(method, params);

        let cached = self.entries.lock().get(&key).cloned();
        if let Some(value) = cached {
            log::debug!("Cache hit: {}", key);
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        log::debug!("Cache miss: {}", key);
        let value = self.inner.call(method, params).await?;
        self.entries.lock().put(key, value.clone());
        Ok(value)
    }
}
