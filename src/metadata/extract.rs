// src/metadata/extract.rs
//! Projections of album items and wall posts onto [`PhotoCandidate`].

use super::normalize::id_to_string;
use crate::api::types::RawItem;
use crate::error::AppError;
use crate::model::PhotoCandidate;
use serde::Deserialize;
use serde_json::Value;

/// Original-resolution copy of a photo.
#[derive(Debug, Deserialize)]
struct OriginalPhoto {
    #[serde(default)]
    url: Option<String>,
}

/// The fields of a photo that end up in a candidate.
///
/// Album items are photos themselves; post attachments nest one.
#[derive(Debug, Deserialize)]
struct PhotoFields {
    id: Value,
    #[serde(default)]
    post_id: Option<Value>,
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    orig_photo: Option<OriginalPhoto>,
}

impl PhotoFields {
    fn parse(value: Value, context: &str) -> Result<Self, AppError> {
        serde_json::from_value(value)
            .map_err(|e| AppError::MalformedResponse(format!("{}: {}", context, e)))
    }

    fn into_candidate(self, post_id: Option<String>) -> Result<PhotoCandidate, AppError> {
        Ok(PhotoCandidate {
            id: id_to_string("id", &self.id)?,
            post_id,
            date: self.date,
            url: self.orig_photo.and_then(|original| original.url),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Post {
    id: Value,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct Attachment {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    photo: Option<Value>,
}

/// One candidate per album item, in listing order.
pub fn extract_album_photos(items: Vec<RawItem>) -> Result<Vec<PhotoCandidate>, AppError> {
    items
        .into_iter()
        .map(|item| {
            let fields = PhotoFields::parse(Value::Object(item), "album item")?;
            let post_id = fields
                .post_id
                .as_ref()
                .map(|value| id_to_string("post_id", value))
                .transpose()?;
            fields.into_candidate(post_id)
        })
        .collect()
}

/// One candidate per photo attached to a post, in post then attachment
/// order.
///
/// Non-photo attachments are skipped. Photos without an original-size URL
/// cannot be downloaded and are dropped as well.
pub fn extract_post_photos(posts: Vec<RawItem>) -> Result<Vec<PhotoCandidate>, AppError> {
    let mut candidates = Vec::new();
    let mut unresolvable = 0usize;

    for item in posts {
        let post: Post = serde_json::from_value(Value::Object(item))
            .map_err(|e| AppError::MalformedResponse(format!("wall post: {}", e)))?;
        let post_id = id_to_string("id", &post.id)?;

        for attachment in post.attachments {
            if attachment.kind != "photo" {
                continue;
            }
            let Some(photo) = attachment.photo else {
                unresolvable += 1;
                continue;
            };

            let candidate = PhotoFields::parse(photo, "post attachment")?
                .into_candidate(Some(post_id.clone()))?;
            if candidate.url.is_none() {
                unresolvable += 1;
                continue;
            }
            candidates.push(candidate);
        }
    }

    if unresolvable > 0 {
        log::debug!("Skipped {} attached photos without an original URL", unresolvable);
    }
    Ok(candidates)
}
