// src/pipeline.rs
//! Photo sources: the two ways a group's photos can be harvested.
//!
//! Each source produces the unified [`PhotoRow`] table for one group or
//! channel. The caller decides which sources to run and concatenates
//! their output.

use crate::api::{CursorFetcher, ListingTransport, MessageFilter, QueryParams, WallGroup};
use crate::error::AppError;
use crate::metadata::{extract_album_photos, extract_post_photos, reconcile};
use crate::model::PhotoRow;
use crate::progress::ProgressObserver;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Harvests the photo table of one group or channel.
#[async_trait::async_trait]
pub trait PhotoSource: Send + Sync {
    /// The group or channel name rows are tagged with.
    fn group(&self) -> &str;

    async fn harvest(&self) -> Result<Vec<PhotoRow>, AppError>;
}

/// A group wall: album and posts listed page by page, then reconciled.
pub struct PagedAlbumSource {
    wall: WallGroup,
    progress: Arc<dyn ProgressObserver>,
    cancel: CancellationToken,
}

impl PagedAlbumSource {
    /// Resolves the group and prepares both listings.
    pub async fn connect(
        transport: Arc<dyn ListingTransport>,
        group: &str,
        progress: Arc<dyn ProgressObserver>,
        cancel: CancellationToken,
    ) -> Result<Self, AppError> {
        let wall = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("Resolution of {} cancelled", group);
                return Err(AppError::Cancelled(group.to_string()));
            }
            wall = WallGroup::connect(transport, group) => wall?,
        };
        Ok(Self {
            wall,
            progress,
            cancel,
        })
    }
}

#[async_trait::async_trait]
impl PhotoSource for PagedAlbumSource {
    fn group(&self) -> &str {
        self.wall.name()
    }

    async fn harvest(&self) -> Result<Vec<PhotoRow>, AppError> {
        let defaults = QueryParams::new();
        let observer = self.progress.as_ref();

        let album = self
            .wall
            .wall_photos(&defaults, observer, &self.cancel)
            .await?;
        let posts = self.wall.posts(&defaults, observer, &self.cancel).await?;

        let album_photos = extract_album_photos(album)?;
        let post_photos = extract_post_photos(posts)?;
        let records = reconcile(album_photos, post_photos)?;

        Ok(records
            .into_iter()
            .map(|record| PhotoRow::from_wall(self.group(), record))
            .collect())
    }
}

/// A channel: photo messages walked with a cursor, one row each.
pub struct CursorStreamSource {
    channel: String,
    fetcher: Arc<CursorFetcher>,
    progress: Arc<dyn ProgressObserver>,
}

impl CursorStreamSource {
    pub fn new(
        channel: impl Into<String>,
        fetcher: Arc<CursorFetcher>,
        progress: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            channel: channel.into(),
            fetcher,
            progress,
        }
    }
}

#[async_trait::async_trait]
impl PhotoSource for CursorStreamSource {
    fn group(&self) -> &str {
        &self.channel
    }

    async fn harvest(&self) -> Result<Vec<PhotoRow>, AppError> {
        let records = self
            .fetcher
            .fetch_all(&self.channel, MessageFilter::Photos, self.progress.as_ref())
            .await?;
        Ok(records.into_iter().map(PhotoRow::from).collect())
    }
}

/// Runs every source in order and concatenates their tables.
///
/// The first fault aborts the whole harvest; rows gathered so far are
/// discarded.
pub async fn harvest_all(sources: &[Box<dyn PhotoSource>]) -> Result<Vec<PhotoRow>, AppError> {
    let mut rows = Vec::new();
    for source in sources {
        log::info!("Harvesting {}", source.group());
        let table = source.harvest().await?;
        log::info!("{}: {} photos", source.group(), table.len());
        rows.extend(table);
    }
    Ok(rows)
}
