// src/model/mod.rs
//! Photo records at each stage of the harvest.
//!
//! Candidates come straight out of the extractors and may be missing
//! fields. Reconciled records are complete and carry a per-post sequence
//! number instead of the remote photo id. [`PhotoRow`] is the unified
//! output row shared by every source.

use serde::{Deserialize, Serialize};

/// A photo as projected from one listing, before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCandidate {
    /// Remote photo identifier, the join key between listings.
    pub id: String,
    pub post_id: Option<String>,
    /// Capture date, unix seconds.
    pub date: Option<i64>,
    /// Original-resolution URL.
    pub url: Option<String>,
}

/// A complete photo record whose `id` is its 1-based position within
/// `post_id`, ordered by the remote photo id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledPhotoRecord {
    pub post_id: String,
    pub id: u32,
    pub date: i64,
    pub url: String,
}

/// A channel message modeled as a single photo at position 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPhotoRecord {
    pub group: String,
    pub post_id: String,
    pub id: u32,
    pub date: i64,
}

/// One row of the harvested table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRow {
    pub group: String,
    pub post_id: String,
    pub id: u32,
    pub date: i64,
    /// Channel photos have no resolvable download URL.
    pub url: Option<String>,
}

impl PhotoRow {
    /// Tags a reconciled wall photo with the group it came from.
    pub fn from_wall(group: &str, record: ReconciledPhotoRecord) -> Self {
        Self {
            group: group.to_string(),
            post_id: record.post_id,
            id: record.id,
            date: record.date,
            url: Some(record.url),
        }
    }
}

impl From<ChannelPhotoRecord> for PhotoRow {
    fn from(record: ChannelPhotoRecord) -> Self {
        Self {
            group: record.group,
            post_id: record.post_id,
            id: record.id,
            date: record.date,
            url: None,
        }
    }
}
