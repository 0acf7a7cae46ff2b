use hydrodash_listing::{ArchivePartition, SortSpec};
use hydrodash_sync::{ClientConfig, ClientError, ListingClient, ListingQuery, ListingTransport};
use hydrodash_types::{
    DeviceStatus, DeviceUpdate, RecordId, ResourceKind, SortDirection, UserUpdate,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_body(page: u64) -> serde_json::Value {
    json!({
        "items": [{
            "id": 7,
            "user_id": null,
            "name": "Tower 7",
            "serial_number": "SN-0007",
            "status": "connected",
            "archived": false,
            "created_at": 1,
            "updated_at": 1
        }],
        "pagination": {
            "page": page, "perPage": 10, "total": 11, "lastPage": 2,
            "from": (page - 1) * 10 + 1, "to": 10,
            "links": [{"url": null, "label": "Previous", "active": false}]
        },
        "echoedFilters": {"search": "", "status": "connected"},
        "echoedSort": {"column": "name", "direction": "asc"}
    })
}

fn make_client(server: &MockServer) -> ListingClient {
    ListingClient::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn client_config_default() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.timeout, Duration::from_secs(30));
}

// ── Listing ─────────────────────────────────────────────────────

#[tokio::test]
async fn list_sends_wire_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .and(query_param("status", "connected"))
        .and(query_param("sort", "name"))
        .and(query_param("direction", "asc"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(2)))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = ListingQuery::new(ResourceKind::Devices, ArchivePartition::Active);
    query.set_filter("status", "connected");
    query.sort = Some(SortSpec::new("name", SortDirection::Asc));
    query.page = 2;

    let response = make_client(&server).fetch(&query).await.unwrap();
    assert_eq!(response.pagination.page, 2);
    assert_eq!(response.items[0].as_device().unwrap().serial_number, "SN-0007");
    assert_eq!(response.echoed_sort, SortSpec::new("name", SortDirection::Asc));
}

#[tokio::test]
async fn archived_listing_uses_archived_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/archived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListingQuery::new(ResourceKind::Devices, ArchivePartition::Archived);
    assert!(make_client(&server).list(&query).await.is_ok());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing_body(1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = ListingClient::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(200),
    })
    .unwrap();
    let query = ListingQuery::new(ResourceKind::Users, ArchivePartition::Active);
    assert!(matches!(client.list(&query).await, Err(ClientError::Network(_))));
}

// ── Archive & update ────────────────────────────────────────────

#[tokio::test]
async fn archive_decodes_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/devices/7/archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 7, "archived": true, "changed": true})),
        )
        .mount(&server)
        .await;

    let outcome = make_client(&server)
        .archive(ResourceKind::Devices, RecordId::new(7))
        .await
        .unwrap();
    assert!(outcome.archived);
    assert!(outcome.changed);
}

#[tokio::test]
async fn missing_record_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/users/99/unarchive"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "RecordNotFound",
            "message": "user 99 not found"
        })))
        .mount(&server)
        .await;

    let err = make_client(&server)
        .unarchive(ResourceKind::Users, RecordId::new(99))
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, code, .. } => {
            assert_eq!(status, 404);
            assert_eq!(code, "RecordNotFound");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn update_device_puts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/7"))
        .and(body_json(json!({"name": "Tower 7b", "status": "not connected"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "user_id": null, "name": "Tower 7b", "serial_number": "SN-0007",
            "status": "not connected", "archived": false, "created_at": 1, "updated_at": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let device = make_client(&server)
        .update_device(
            RecordId::new(7),
            &DeviceUpdate::new("Tower 7b").with_status(DeviceStatus::NotConnected),
        )
        .await
        .unwrap();
    assert_eq!(device.name, "Tower 7b");
    assert_eq!(device.status, Some(DeviceStatus::NotConnected));
}

#[tokio::test]
async fn validation_failure_keeps_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/3"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": "ValidationFailed",
            "message": "The given data was invalid.",
            "fieldErrors": {"email": "The email has already been taken."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = UserUpdate {
        first_name: "Jane".into(),
        last_name: "Smith".into(),
        email: "john@example.com".into(),
        address: None,
    };
    let err = make_client(&server)
        .update_user(RecordId::new(3), &update)
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, code, field_errors, .. } => {
            assert_eq!(status, 422);
            assert_eq!(code, "ValidationFailed");
            let field_errors = field_errors.expect("field errors");
            assert_eq!(field_errors["email"], "The email has already been taken.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let query = ListingQuery::new(ResourceKind::Users, ArchivePartition::Active);
    let err = make_client(&server).list(&query).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api { status: 502, ref message, field_errors: None, .. } if message == "bad gateway"
    ));
}
