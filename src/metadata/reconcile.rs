// src/metadata/reconcile.rs
//! Merging the album listing with the post listing of one wall.
//!
//! The album knows every photo's URL and date; the posts know which post
//! each photo was published in. The two listings are paginated
//! independently and only partially overlap, so they are joined on the
//! photo id:
//!
//! 1. full outer join, each post photo matching at most one album photo;
//! 2. the post's association wins, the album's is the fallback, rows with
//!    neither are dropped;
//! 3. every field must be present and `(post_id, id)` must be unique;
//! 4. rows are sorted by photo id, compared as strings, and renumbered
//!    `1..` within each post.

use crate::error::AppError;
use crate::model::{PhotoCandidate, ReconciledPhotoRecord};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Builds the final photo table of one wall.
pub fn reconcile(
    album: Vec<PhotoCandidate>,
    posts: Vec<PhotoCandidate>,
) -> Result<Vec<ReconciledPhotoRecord>, AppError> {
    let album_len = album.len();
    let posts_len = posts.len();

    let joined = outer_join(album, posts)?;
    let joined_len = joined.len();

    let associated: Vec<PhotoCandidate> = joined
        .into_iter()
        .filter(|row| row.post_id.is_some())
        .collect();
    if associated.len() < joined_len {
        log::debug!(
            "Dropped {} album photos not attached to any visible post",
            joined_len - associated.len()
        );
    }

    let mut complete = associated
        .into_iter()
        .map(CompleteRow::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    ensure_unique(&complete)?;

    complete.sort_by(|a, b| compare_photo_ids(&a.photo_id, &b.photo_id));

    let mut positions: HashMap<String, u32> = HashMap::new();
    let records: Vec<ReconciledPhotoRecord> = complete
        .into_iter()
        .map(|row| {
            let position = positions.entry(row.post_id.clone()).or_insert(0);
            *position += 1;
            ReconciledPhotoRecord {
                post_id: row.post_id,
                id: *position,
                date: row.date,
                url: row.url,
            }
        })
        .collect();

    log::info!(
        "Reconciled {} album and {} post photos into {} records across {} posts",
        album_len,
        posts_len,
        records.len(),
        positions.len()
    );

    Ok(records)
}

/// Full outer join on the photo id.
///
/// Matched rows take `date` and `url` from the album, falling back to the
/// post, and `post_id` from the post, falling back to the album. Album rows
/// no post matched are kept as they are, after the post-derived rows.
fn outer_join(
    album: Vec<PhotoCandidate>,
    posts: Vec<PhotoCandidate>,
) -> Result<Vec<PhotoCandidate>, AppError> {
    let mut by_id: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, photo) in album.iter().enumerate() {
        by_id.entry(photo.id.as_str()).or_default().push(index);
    }

    let mut matched = vec![false; album.len()];
    let mut joined = Vec::with_capacity(album.len() + posts.len());

    for post_photo in posts {
        match by_id.get(post_photo.id.as_str()).map(Vec::as_slice) {
            None | Some([]) => joined.push(post_photo),
            Some([index]) => {
                let album_photo = &album[*index];
                matched[*index] = true;
                joined.push(PhotoCandidate {
                    post_id: post_photo.post_id.or_else(|| album_photo.post_id.clone()),
                    date: album_photo.date.or(post_photo.date),
                    url: album_photo.url.clone().or(post_photo.url),
                    id: post_photo.id,
                });
            }
            Some(indices) => {
                return Err(AppError::AmbiguousMatch {
                    photo_id: post_photo.id,
                    matches: indices.len(),
                });
            }
        }
    }

    joined.extend(
        album
            .iter()
            .zip(matched)
            .filter(|(_, was_matched)| !was_matched)
            .map(|(photo, _)| photo.clone()),
    );

    Ok(joined)
}

/// A joined row with every field present.
#[derive(Debug)]
struct CompleteRow {
    photo_id: String,
    post_id: String,
    date: i64,
    url: String,
}

impl TryFrom<PhotoCandidate> for CompleteRow {
    type Error = AppError;

    fn try_from(row: PhotoCandidate) -> Result<Self, Self::Error> {
        let missing = |field| AppError::IncompleteRecord {
            photo_id: row.id.clone(),
            field,
        };
        let post_id = row.post_id.clone().ok_or_else(|| missing("post_id"))?;
        let date = row.date.ok_or_else(|| missing("date"))?;
        let url = row.url.clone().ok_or_else(|| missing("url"))?;

        Ok(Self {
            photo_id: row.id,
            post_id,
            date,
            url,
        })
    }
}

fn ensure_unique(rows: &[CompleteRow]) -> Result<(), AppError> {
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(rows.len());
    for row in rows {
        if !seen.insert((row.post_id.as_str(), row.photo_id.as_str())) {
            return Err(AppError::DuplicateRecord {
                post_id: row.post_id.clone(),
                photo_id: row.photo_id.clone(),
            });
        }
    }
    Ok(())
}

/// Ids are canonical strings by now and order as strings, so `"100"`
/// sorts before `"9"`.
fn compare_photo_ids(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
