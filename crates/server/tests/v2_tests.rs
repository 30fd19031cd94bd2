//! Integration tests for the v2 revision endpoints.

mod common;

use common::fixtures::{seed_zlib, CONANINFO, ZLIB_BIN_HASH, ZLIB_PKG};
use common::server::send;
use common::TestServer;
use axum::http::StatusCode;
use serde_json::Value;

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("JSON body")
}

#[tokio::test]
async fn latest_returns_highest_revision() {
    let server = TestServer::new().await;
    server
        .seed(
            &format!("{ZLIB_PKG}/revisions.txt"),
            br#"{"revisions":[
                {"revision":"0","time":"2023-01-01T00:00:00.000Z"},
                {"revision":"2","time":"2023-01-02T00:00:00.000Z"}
            ]}"#,
        )
        .await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/latest",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        serde_json::json!({
            "revision": "2",
            "time": "2023-01-02T00:00:00.000Z"
        })
    );
}

#[tokio::test]
async fn latest_without_index_is_not_found() {
    let server = TestServer::new().await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/latest",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        String::from_utf8_lossy(&body),
        "URI /v2/conans/zlib/1.2.11/_/_/latest not found."
    );
}

#[tokio::test]
async fn latest_with_empty_index_is_not_found() {
    let server = TestServer::new().await;
    server
        .seed(&format!("{ZLIB_PKG}/revisions.txt"), br#"{"revisions":[]}"#)
        .await;

    let (status, _, _) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/latest",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_files_lists_export_contents() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/revisions/0/files",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        serde_json::json!({
            "files": {
                "conan_export.tgz": {},
                "conan_sources.tgz": {},
                "conanfile.py": {},
                "conanmanifest.txt": {}
            }
        })
    );
}

#[tokio::test]
async fn recipe_file_streams_content() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/revisions/0/files/conanfile.py",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"recipe data");
}

#[tokio::test]
async fn recipe_files_of_missing_revision() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let (status, _, _) = send(
        &server.router,
        "GET",
        "/v2/conans/zlib/1.2.11/_/_/revisions/5/files",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn binary_files_lists_revision_contents() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let uri = format!(
        "/v2/conans/{ZLIB_PKG}/revisions/0/packages/{ZLIB_BIN_HASH}/revisions/0/files"
    );
    let (status, _, body) = send(&server.router, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        serde_json::json!({
            "files": {
                "conan_package.tgz": {},
                "conaninfo.txt": {},
                "conanmanifest.txt": {}
            }
        })
    );
}

#[tokio::test]
async fn binary_file_streams_content() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let uri = format!(
        "/v2/conans/{ZLIB_PKG}/revisions/0/packages/{ZLIB_BIN_HASH}/revisions/0/files/conaninfo.txt"
    );
    let (status, _, body) = send(&server.router, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], CONANINFO.as_bytes());
}
