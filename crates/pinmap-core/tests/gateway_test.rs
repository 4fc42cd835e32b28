#![allow(clippy::unwrap_used)]
// Integration tests for `RecordsGateway` against a mocked workspace API.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pinmap_api::WorkspaceClient;
use pinmap_core::{CoreError, FieldType, RecordsGateway};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(max_pages: usize) -> (MockServer, RecordsGateway) {
    let server = MockServer::start().await;
    let client = WorkspaceClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let gateway = RecordsGateway::new(client, Some("parent-1".into()), max_pages);
    (server, gateway)
}

fn database(id: &str, title: &str, archived: bool) -> Value {
    json!({
        "object": "database",
        "id": id,
        "archived": archived,
        "title": [{ "plain_text": title }],
        "properties": {}
    })
}

fn page(id: &str, title: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": { "type": "title", "title": [{ "plain_text": title }] }
        }
    })
}

fn listing(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor
    })
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_collections_filters_archived_and_duplicates() {
    let (server, gateway) = setup(1).await;

    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![
                database("a", "Cafes", false),
                database("b", "Old", true),
                database("a", "Cafes (copy)", false),
                database("c", "Parks", false),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let collections = gateway.list_collections().await.unwrap();
    let titles: Vec<_> = collections.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Cafes", "Parks"]);
}

#[tokio::test]
async fn test_list_collections_follows_cursor() {
    let (server, gateway) = setup(10).await;

    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .and(body_json(json!({
            "filter": { "property": "object", "value": "database" },
            "start_cursor": "c2"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![database("b", "Parks", false)], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .and(body_json(json!({
            "filter": { "property": "object", "value": "database" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![database("a", "Cafes", false)], Some("c2"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ids: Vec<_> = gateway
        .list_collections()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

// ── Items ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_items_stops_at_page_cap() {
    let (server, gateway) = setup(1).await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            vec![page("p1", "1 Market St"), page("p2", "Ferry Building")],
            Some("more"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let items = gateway.list_items("db-1").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].display_title(), "Ferry Building");
    // Pass-through: items serialize back to the upstream objects.
    assert_eq!(serde_json::to_value(&items[0]).unwrap(), page("p1", "1 Market St"));
}

#[tokio::test]
async fn test_list_items_passes_upstream_error_through() {
    let (server, gateway) = setup(1).await;

    Mock::given(method("POST"))
        .and(path("/v1/databases/missing/query"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find database with ID: missing."
        })))
        .mount(&server)
        .await;

    let err = gateway.list_items("missing").await.unwrap_err();
    match err {
        CoreError::Upstream { message, status } => {
            assert_eq!(message, "Could not find database with ID: missing.");
            assert_eq!(status, Some(404));
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

// ── Schema ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_schema_keeps_property_order() {
    let (server, gateway) = setup(1).await;

    Mock::given(method("GET"))
        .and(path("/v1/databases/db-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "database",
            "id": "db-1",
            "properties": {
                "Name": { "id": "title", "type": "title", "title": {} },
                "Phone": { "id": "p", "type": "phone_number", "phone_number": {} },
                "Opened": { "id": "d", "type": "date", "date": {} }
            }
        })))
        .mount(&server)
        .await;

    let schema = gateway.get_schema("db-1").await.unwrap();
    let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Name", "Phone", "Opened"]);
    assert_eq!(schema.get("Phone"), Some(&FieldType::PhoneNumber));
    assert_eq!(schema.get("Opened").map(FieldType::as_str), Some("date"));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_database_uses_configured_parent() {
    let (server, gateway) = setup(1).await;

    Mock::given(method("POST"))
        .and(path("/v1/databases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(database("new", "Trips", false)))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway.create_database("Trips").await.unwrap();
    assert_eq!(created["id"], "new");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["parent"]["page_id"], "parent-1");
}

#[tokio::test]
async fn test_create_database_without_parent_is_config_error() {
    let server = MockServer::start().await;
    let client = WorkspaceClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let gateway = RecordsGateway::new(client, None, 1);

    let err = gateway.create_database("Trips").await.unwrap_err();
    assert!(matches!(err, CoreError::Config { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
