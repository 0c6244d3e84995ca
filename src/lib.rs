// src/lib.rs
//! memdex library. Harvests photo metadata from group walls and channels.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ApiErrorCode`, `ValidationError`
//! - **Configuration**: `HarvestConfig`, `WallApiConfig`
//! - **Domain model**: `PhotoCandidate`, `ReconciledPhotoRecord`, `PhotoRow`
//! - **API clients**: `WallHttpClient`, `ChannelHttpClient`, `CursorFetcher`
//! - **Metadata**: `normalize`, `extract_album_photos`, `reconcile`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod types;

// --- Error Handling ---
pub use crate::error::{ApiErrorCode, AppError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, HarvestConfig, WallApiConfig};

// --- Domain Model ---
pub use crate::model::{ChannelPhotoRecord, PhotoCandidate, PhotoRow, ReconciledPhotoRecord};

// --- Domain Types ---
pub use crate::types::{AccessToken, BaseUrl, RequestRate};

// --- API Clients ---
pub use crate::api::{
    fetch_all_offsets, CachedTransport, ChannelHttpClient, CursorFetcher, CursorTransport,
    ListingTransport, MessageFilter, PageRequest, QueryParams, RateLimiter, WallGroup,
    WallHttpClient,
};

// --- Metadata ---
pub use crate::metadata::{extract_album_photos, extract_post_photos, normalize, reconcile};

// --- Pipeline ---
pub use crate::pipeline::{harvest_all, CursorStreamSource, PagedAlbumSource, PhotoSource};
pub use crate::progress::{ProgressBars, ProgressObserver, SilentProgress};
