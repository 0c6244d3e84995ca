// src/api/types.rs
//! Wire shapes of the remote APIs.
//!
//! Only the fields the harvester consumes are modeled; everything else in
//! an item stays in its raw JSON map.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One item of a listing, as returned by the remote.
pub type RawItem = Map<String, Value>;

/// Envelope wrapping every wall API reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Error body reported inside an HTTP 200 reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    /// Total number of items the remote claims to hold.
    pub count: u64,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Reply of `groups.getById`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsById {
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSummary {
    pub id: i64,
    #[serde(default)]
    pub screen_name: Option<String>,
}

// --- Channel gateway ---

/// A channel message carrying at least one photo.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelMessage {
    pub id: i64,
    pub date: DateTime<Utc>,
}

/// Reply of the message count probe.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCount {
    pub count: u64,
}

/// One batch of channel history, newest message first.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBatch {
    #[serde(default)]
    pub messages: Vec<ChannelMessage>,
}
