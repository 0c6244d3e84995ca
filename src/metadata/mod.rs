// src/metadata/mod.rs
//! Turning raw listings into one photo table per source.
//!
//! - [`normalize`]: identifier fields to canonical strings
//! - [`extract`]: album items and post attachments to photo candidates
//! - [`reconcile`]: joining both candidate lists into the final records

pub mod extract;
pub mod normalize;
pub mod reconcile;

pub use extract::{extract_album_photos, extract_post_photos};
pub use normalize::normalize;
pub use reconcile::reconcile;
