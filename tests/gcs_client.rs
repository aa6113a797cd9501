use futures::TryStreamExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gcs_sweeper::storage::gcs::{Error, GcsClient};
use gcs_sweeper::storage::ObjectStore;

const BUCKET: &str = "test-bucket";

fn client_for(server: &MockServer) -> GcsClient {
    GcsClient::unauthenticated().with_endpoint(server.uri())
}

#[tokio::test]
async fn listing_follows_page_tokens() {
    let server = MockServer::start().await;

    // Mounted first so it wins whenever the pageToken is present.
    Mock::given(method("GET"))
        .and(path(format!("/b/{BUCKET}/o")))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"items": [{"name": "logs/b", "timeCreated": "2023-02-01T00:00:00Z"}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/b/{BUCKET}/o")))
        .and(query_param("prefix", "logs/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "items": [{"name": "logs/a", "timeCreated": "2023-01-01T00:00:00Z"}],
                "nextPageToken": "page-2"
            }"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let records: Vec<_> = client
        .list_objects(BUCKET, "logs/")
        .try_collect()
        .await
        .unwrap();

    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(vec!["logs/a", "logs/b"], names);
}

#[tokio::test]
async fn listing_error_status_surfaces_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/b/{BUCKET}/o")))
        .respond_with(ResponseTemplate::new(403).set_body_string("access denied"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .list_objects(BUCKET, "logs/")
        .try_collect::<Vec<_>>()
        .await
        .unwrap_err();

    match error.downcast_ref::<Error>() {
        Some(Error::Status { status, body }) => {
            assert_eq!(403, status.as_u16());
            assert_eq!("access denied", body);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_encodes_the_object_name_as_one_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/b/{BUCKET}/o/logs%2Fa")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_object(BUCKET, "logs/a").await.unwrap();
}

#[tokio::test]
async fn delete_of_missing_object_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.delete_object(BUCKET, "logs/gone").await.unwrap_err();

    match error.downcast_ref::<Error>() {
        Some(Error::Status { status, .. }) => assert_eq!(404, status.as_u16()),
        other => panic!("expected status error, got {other:?}"),
    }
}
