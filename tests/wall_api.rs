//! End-to-end tests for the wall API client against a mock server.
//!
//! These tests validate:
//! - Owner id resolution and request parameters
//! - Offset pagination over HTTP
//! - Error envelopes and HTTP failures
//! - The per-client response cache
//! - A full album + posts harvest of one group

use memdex::api::types::RawItem;
use memdex::config::WallApiConfig;
use memdex::{
    AccessToken, ApiErrorCode, AppError, BaseUrl, CachedTransport, ListingTransport,
    PagedAlbumSource, PhotoRow, PhotoSource, QueryParams, RequestRate, SilentProgress, WallGroup,
    WallHttpClient,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn config_for(server: &MockServer) -> WallApiConfig {
    WallApiConfig {
        access_token: AccessToken::new("vk1.a.test-token").unwrap(),
        api_version: "5.199".to_string(),
        base_url: BaseUrl::parse(&server.uri()).unwrap(),
        rate: RequestRate::new(1000.0).unwrap(),
        cache_capacity: 0,
    }
}

fn ok(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": payload }))
}

fn album_photo(id: i64, post_id: Option<i64>, date: i64) -> Value {
    json!({
        "id": id,
        "owner_id": -42,
        "post_id": post_id,
        "date": date,
        "orig_photo": { "url": format!("https://img.example/{}.jpg", id) }
    })
}

async fn mount_group(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/groups.getById"))
        .and(query_param("group_id", "memes"))
        .respond_with(ok(json!({ "groups": [{ "id": 42, "screen_name": "memes" }] })))
        .mount(server)
        .await;
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn test_resolves_owner_id_with_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups.getById"))
        .and(query_param("access_token", "vk1.a.test-token"))
        .and(query_param("v", "5.199"))
        .and(query_param("group_id", "memes"))
        .respond_with(ok(json!({ "groups": [{ "id": 42 }] })))
        .expect(1)
        .mount(&server)
        .await;

    let client: Arc<dyn ListingTransport> =
        Arc::new(WallHttpClient::new(&config_for(&server)).unwrap());
    let wall = WallGroup::connect(client, "memes").await.unwrap();

    assert_eq!(wall.owner_id(), "-42");
}

#[tokio::test]
async fn test_album_is_paged_by_offset() {
    let server = MockServer::start().await;
    mount_group(&server).await;

    for (offset, ids) in [("0", vec![1, 2]), ("2", vec![3])] {
        let items: Vec<Value> = ids.iter().map(|&id| album_photo(id, Some(9), 100)).collect();
        Mock::given(method("GET"))
            .and(path("/photos.get"))
            .and(query_param("owner_id", "-42"))
            .and(query_param("album_id", "wall"))
            .and(query_param("count", "2"))
            .and(query_param("offset", offset))
            .respond_with(ok(json!({ "count": 3, "items": items })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client: Arc<dyn ListingTransport> =
        Arc::new(WallHttpClient::new(&config_for(&server)).unwrap());
    let wall = WallGroup::connect(client, "memes").await.unwrap();

    let mut overrides = QueryParams::new();
    overrides.insert("count".to_string(), "2".to_string());
    let items = wall
        .wall_photos(&overrides, &SilentProgress, &CancellationToken::new())
        .await
        .unwrap();

    let ids: Vec<&Value> = items.iter().map(|item: &RawItem| &item["id"]).collect();
    assert_eq!(ids, vec![&json!("1"), &json!("2"), &json!("3")]);
    assert_eq!(items[0]["post_id"], json!("9"));
}

#[tokio::test]
async fn test_error_envelope_is_a_transport_fault() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups.getById"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "error_code": 15, "error_msg": "Access denied" }
        })))
        .mount(&server)
        .await;

    let client = WallHttpClient::new(&config_for(&server)).unwrap();
    let mut params = QueryParams::new();
    params.insert("group_id".to_string(), "memes".to_string());

    let err = client.call("groups.getById", &params).await.unwrap_err();
    match err {
        AppError::TransportFault { code, message, .. } => {
            assert_eq!(code, ApiErrorCode::AccessDenied);
            assert!(message.contains("Access denied"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_failure_is_a_transport_fault() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wall.get"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = WallHttpClient::new(&config_for(&server)).unwrap();
    let err = client.call("wall.get", &QueryParams::new()).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::TransportFault {
            code: ApiErrorCode::HttpStatus(502),
            ..
        }
    ));
}

#[tokio::test]
async fn test_cached_transport_answers_repeats_from_memory() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups.getById"))
        .respond_with(ok(json!({ "groups": [{ "id": 42 }] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WallHttpClient::new(&config_for(&server)).unwrap();
    let cached = CachedTransport::new(client, 8);
    let mut params = QueryParams::new();
    params.insert("group_id".to_string(), "memes".to_string());

    let first = cached.call("groups.getById", &params).await.unwrap();
    let second = cached.call("groups.getById", &params).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cached.hits(), 1);
    assert_eq!(cached.inner().calls_made().await, 1);
}

// ============================================================================
// Harvest
// ============================================================================

#[tokio::test]
async fn test_group_harvest_reconciles_album_and_posts() {
    let server = MockServer::start().await;
    mount_group(&server).await;

    Mock::given(method("GET"))
        .and(path("/photos.get"))
        .and(query_param("offset", "0"))
        .and(query_param("count", "1000"))
        .respond_with(ok(json!({
            "count": 3,
            "items": [
                album_photo(102, Some(7), 1002),
                album_photo(101, Some(7), 1001),
                album_photo(103, None, 1003)
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wall.get"))
        .and(query_param("domain", "memes"))
        .and(query_param("offset", "0"))
        .and(query_param("count", "100"))
        .respond_with(ok(json!({
            "count": 2,
            "items": [
                {
                    "id": 8,
                    "attachments": [
                        { "type": "link", "link": { "url": "https://example.com" } },
                        { "type": "photo", "photo": {
                            "id": 104, "date": 2004,
                            "orig_photo": { "url": "https://img.example/104.jpg" }
                        } }
                    ]
                },
                {
                    "id": 7,
                    "attachments": [
                        { "type": "photo", "photo": { "id": 101, "date": 1001 } },
                        { "type": "photo", "photo": {
                            "id": 102, "date": 1002,
                            "orig_photo": { "url": "https://img.example/102.jpg" }
                        } }
                    ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let client: Arc<dyn ListingTransport> =
        Arc::new(WallHttpClient::new(&config_for(&server)).unwrap());
    let source = PagedAlbumSource::connect(
        client,
        "memes",
        Arc::new(SilentProgress),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let rows = source.harvest().await.unwrap();

    let row = |post_id: &str, id: u32, date: i64, photo: i64| PhotoRow {
        group: "memes".to_string(),
        post_id: post_id.to_string(),
        id,
        date,
        url: Some(format!("https://img.example/{}.jpg", photo)),
    };
    // 101 has no original URL in its post, so it survives only through the
    // album, which also carries its association with post 7.
    assert_eq!(
        rows,
        vec![
            row("7", 1, 1001, 101),
            row("7", 2, 1002, 102),
            row("8", 1, 2004, 104),
        ]
    );
}

#[tokio::test]
async fn test_short_listing_aborts_the_harvest() {
    let server = MockServer::start().await;
    mount_group(&server).await;

    Mock::given(method("GET"))
        .and(path("/photos.get"))
        .and(query_param("offset", "0"))
        .respond_with(ok(json!({ "count": 2, "items": [album_photo(1, Some(7), 10)] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos.get"))
        .and(query_param("offset", "1000"))
        .respond_with(ok(json!({ "count": 2, "items": [] })))
        .mount(&server)
        .await;

    let client: Arc<dyn ListingTransport> =
        Arc::new(WallHttpClient::new(&config_for(&server)).unwrap());
    let source = PagedAlbumSource::connect(
        client,
        "memes",
        Arc::new(SilentProgress),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let err = source.harvest().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::IncompletePage {
            offset: 1000,
            fetched: 1,
            declared: 2,
            ..
        }
    ));
}
