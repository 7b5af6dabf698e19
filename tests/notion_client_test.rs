//! Integration tests for the Notion HTTP client.

use std::time::Duration;

use job_ingest::notion::{
    Block, Filter, NotionClient, NotionError, PageId, Properties, PropertyValue, Workspace,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> NotionClient {
    NotionClient::new(
        &format!("{}/v1", server.uri()),
        "secret_token",
        Duration::from_secs(5),
    )
    .expect("Failed to create client")
}

#[tokio::test]
async fn test_query_sends_filter_and_auth_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/companies-db/query"))
        .and(header("authorization", "Bearer secret_token"))
        .and(header("notion-version", "2022-06-28"))
        .and(body_json(json!({
            "filter": { "property": "Company link", "url": { "equals": "https://acme.test" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [
                { "object": "page", "id": "first-id", "properties": {} },
                { "object": "page", "id": "second-id", "properties": {} }
            ],
            "has_more": false,
            "next_cursor": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client(&server)
        .query_database(
            "companies-db",
            &Filter::UrlEquals {
                property: "Company link",
                value: "https://acme.test".to_string(),
            },
        )
        .await
        .expect("query failed");

    assert_eq!(ids, vec![PageId::from("first-id"), PageId::from("second-id")]);
}

#[tokio::test]
async fn test_create_page_with_icon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_json(json!({
            "parent": { "database_id": "companies-db" },
            "properties": {
                "Name": { "title": [{ "text": { "content": "Acme" } }] }
            },
            "icon": { "type": "external", "external": { "url": "https://logo.test/a.png" } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "object": "page", "id": "new-id" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let props = Properties::new().with("Name", PropertyValue::Title("Acme".to_string()));
    let id = client(&server)
        .create_page("companies-db", &props, Some("https://logo.test/a.png"))
        .await
        .expect("create failed");

    assert_eq!(id, PageId::from("new-id"));
}

#[tokio::test]
async fn test_update_page_patches_properties() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/pages/page-1"))
        .and(body_json(json!({
            "properties": { "DDL": { "date": null } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "object": "page", "id": "page-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let props = Properties::new().with("DDL", PropertyValue::Date(None));
    client(&server)
        .update_page(&PageId::from("page-1"), &props)
        .await
        .expect("update failed");
}

#[tokio::test]
async fn test_append_splits_into_batches_of_100() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/blocks/page-1/children"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "object": "list", "results": [] })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let blocks: Vec<Block> = (0..150)
        .map(|i| Block::Paragraph(format!("line {i}")))
        .collect();
    client(&server)
        .append_blocks(&PageId::from("page-1"), &blocks)
        .await
        .expect("append failed");

    let requests = server.received_requests().await.expect("recording enabled");
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["children"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 50]);

    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(
        second["children"][0]["paragraph"]["rich_text"][0]["text"]["content"],
        "line 100"
    );
}

#[tokio::test]
async fn test_append_nothing_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client(&server)
        .append_blocks(&PageId::from("page-1"), &[])
        .await
        .expect("append failed");
}

#[tokio::test]
async fn test_api_error_carries_notion_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/jobs-db/query"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find database with ID: jobs-db."
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .query_database(
            "jobs-db",
            &Filter::MultiSelectIsEmpty {
                property: "location",
            },
        )
        .await
        .unwrap_err();

    match err {
        NotionError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, "object_not_found");
            assert_eq!(message, "Could not find database with ID: jobs-db.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = NotionClient::new("http://127.0.0.1:9/v1", "t", Duration::from_secs(2))
        .expect("Failed to create client");

    let err = client
        .update_page(&PageId::from("p"), &Properties::new())
        .await
        .unwrap_err();

    assert!(matches!(err, NotionError::Network(_)));
}
