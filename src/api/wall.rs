// src/api/wall.rs
//! Listings of one group wall: its photo album and its posts.

use super::pagination::{fetch_all_offsets, PageRequest};
use super::parser::parse_payload;
use super::types::{GroupsById, RawItem};
use super::{ListingTransport, QueryParams};
use crate::constants::{ALBUM_PAGE_SIZE, COUNT_KEY, WALL_ALBUM_ID, WALL_PAGE_SIZE};
use crate::error::AppError;
use crate::progress::ProgressObserver;
use crate::types::ValidationError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A group wall whose owner id has been resolved.
pub struct WallGroup {
    transport: Arc<dyn ListingTransport>,
    name: String,
    owner_id: String,
}

impl WallGroup {
    /// Resolves the group's short name to its owner id.
    pub async fn connect(
        transport: Arc<dyn ListingTransport>,
        name: impl Into<String>,
    ) -> Result<Self, AppError> {
        let name = name.into();
        let owner_id = resolve_owner_id(transport.as_ref(), &name).await?;
        log::info!("Group '{}' resolved to owner {}", name, owner_id);
        Ok(Self {
            transport,
            name,
            owner_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Every photo of the wall album, oldest first.
    ///
    /// `overrides` replace the default parameters; a `count` override sets
    /// the page size.
    pub async fn wall_photos(
        &self,
        overrides: &QueryParams,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawItem>, AppError> {
        let mut params = QueryParams::new();
        params.insert("owner_id".to_string(), self.owner_id.clone());
        params.insert("album_id".to_string(), WALL_ALBUM_ID.to_string());
        params.insert("rev".to_string(), "0".to_string());

        self.list("photos.get", params, ALBUM_PAGE_SIZE, overrides, "photo", observer, cancel)
            .await
    }

    /// Every post on the wall.
    pub async fn posts(
        &self,
        overrides: &QueryParams,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawItem>, AppError> {
        let mut params = QueryParams::new();
        params.insert("domain".to_string(), self.name.clone());

        self.list("wall.get", params, WALL_PAGE_SIZE, overrides, "post", observer, cancel)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        method: &str,
        mut params: QueryParams,
        default_page_size: u32,
        overrides: &QueryParams,
        unit: &str,
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawItem>, AppError> {
        let mut page_size = default_page_size;
        for (key, value) in overrides {
            if key == COUNT_KEY {
                page_size = value
                    .parse()
                    .map_err(|_| ValidationError::InvalidParameter {
                        key: key.clone(),
                        value: value.clone(),
                    })?;
            } else {
                params.insert(key.clone(), value.clone());
            }
        }

        let request = PageRequest::new(method, &params, page_size).with_unit(unit);
        fetch_all_offsets(self.transport.as_ref(), &request, observer, cancel).await
    }
}

/// Looks up a group by short name and returns its owner id, the negated
/// numeric group id.
pub async fn resolve_owner_id<T>(transport: &T, name: &str) -> Result<String, AppError>
where
    T: ListingTransport + ?Sized,
{
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("group name").into());
    }

    let mut params = QueryParams::new();
    params.insert("group_id".to_string(), name.to_string());

    let payload = transport.call("groups.getById", &params).await?;
    let reply: GroupsById = parse_payload("groups.getById", payload)?;

    match reply.groups.as_slice() {
        [group] => Ok((-group.id).to_string()),
        groups => Err(AppError::MalformedResponse(format!(
            "groups.getById returned {} groups for '{}', expected exactly one",
            groups.len(),
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    /// Answers `groups.getById` and records every listing request.
    struct ScriptedWall {
        groups: Value,
        requests: Mutex<Vec<(String, QueryParams)>>,
    }

    #[async_trait::async_trait]
    impl ListingTransport for ScriptedWall {
        async fn call(&self, method: &str, params: &QueryParams) -> Result<Value, AppError> {
            self.requests
                .lock()
                .push((method.to_string(), params.clone()));
            match method {
                "groups.getById" => Ok(json!({ "groups": self.groups.clone() })),
                _ => Ok(json!({ "count": 1, "items": [{ "id": 9, "owner_id": -42 }] })),
            }
        }
    }

    fn scripted(groups: Value) -> Arc<ScriptedWall> {
        Arc::new(ScriptedWall {
            groups,
            requests: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn owner_id_is_negated_group_id() {
        let wall = scripted(json!([{ "id": 42, "screen_name": "memes" }]));
        let group = WallGroup::connect(wall, "memes").await.unwrap();
        assert_eq!(group.owner_id(), "-42");
        assert_eq!(group.name(), "memes");
    }

    #[tokio::test]
    async fn ambiguous_group_lookup_fails() {
        let wall = scripted(json!([{ "id": 1 }, { "id": 2 }]));
        let err = WallGroup::connect(wall, "memes").await.err().unwrap();
        assert!(matches!(err, AppError::MalformedResponse(_)));

        let wall = scripted(json!([]));
        assert!(WallGroup::connect(wall, "memes").await.is_err());
    }

    #[tokio::test]
    async fn wall_photos_use_album_defaults() {
        let wall = scripted(json!([{ "id": 42 }]));
        let group = WallGroup::connect(wall.clone(), "memes").await.unwrap();

        let items = group
            .wall_photos(&QueryParams::new(), &SilentProgress, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(items[0]["owner_id"], json!("-42"));

        let requests = wall.requests.lock();
        let (method, params) = &requests[1];
        assert_eq!(method, "photos.get");
        assert_eq!(params["owner_id"], "-42");
        assert_eq!(params["album_id"], "wall");
        assert_eq!(params["rev"], "0");
        assert_eq!(params["count"], "1000");
        assert_eq!(params["offset"], "0");
    }

    #[tokio::test]
    async fn overrides_replace_defaults_and_page_size() {
        let wall = scripted(json!([{ "id": 42 }]));
        let group = WallGroup::connect(wall.clone(), "memes").await.unwrap();

        let mut overrides = QueryParams::new();
        overrides.insert("count".to_string(), "50".to_string());
        overrides.insert("filter".to_string(), "owner".to_string());
        group
            .posts(&overrides, &SilentProgress, &CancellationToken::new())
            .await
            .unwrap();

        let requests = wall.requests.lock();
        let (method, params) = &requests[1];
        assert_eq!(method, "wall.get");
        assert_eq!(params["domain"], "memes");
        assert_eq!(params["filter"], "owner");
        assert_eq!(params["count"], "50");
    }
}
