// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains. Reading
//! them should tell you how the harvester talks to the remote APIs:
//! which version, how fast, and how many items per page.

// ---------------------------------------------------------------------------
// Wall API boundaries
// ---------------------------------------------------------------------------

/// Base URL for wall API method calls.
pub const WALL_API_BASE_URL: &str = "https://api.vk.com/method";

/// API version sent with every wall request as the `v` parameter.
pub const WALL_API_VERSION: &str = "5.199";

/// Default ceiling on wall API requests per second.
///
/// The remote rejects user tokens above three calls per second with
/// error code 6.
pub const WALL_API_REQUESTS_PER_SECOND: f64 = 3.0;

/// Photos returned per `photos.get` page. The API maximum is 1000.
pub const ALBUM_PAGE_SIZE: u32 = 1000;

/// Posts returned per `wall.get` page. The API maximum is 100.
pub const WALL_PAGE_SIZE: u32 = 100;

/// Name of the query parameter carrying the page size, and of the response
/// field carrying the declared total.
pub const COUNT_KEY: &str = "count";

/// Query parameter carrying the pagination offset.
pub const OFFSET_KEY: &str = "offset";

/// Album holding every photo ever attached to the wall.
pub const WALL_ALBUM_ID: &str = "wall";

// ---------------------------------------------------------------------------
// Identifier conventions
// ---------------------------------------------------------------------------

/// Exact key of an item's own identifier.
pub const ID_KEY: &str = "id";

/// Suffix shared by every foreign-key field (`post_id`, `owner_id`, ...).
pub const ID_SUFFIX: &str = "_id";

// ---------------------------------------------------------------------------
// Channel stream boundaries
// ---------------------------------------------------------------------------

/// Messages requested per history call while walking a channel.
pub const CHANNEL_HISTORY_BATCH: u32 = 100;

/// Sequence position given to the single photo of a channel message.
pub const CHANNEL_PHOTO_POSITION: u32 = 1;

// ---------------------------------------------------------------------------
// Response cache
// ---------------------------------------------------------------------------

/// Distinct responses a client remembers during its lifetime.
pub const RESPONSE_CACHE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
