//! Integration tests for the v1 HTTP endpoints.

mod common;

use common::fixtures::{seed_zlib, seed_zmqpp_recipe, CONANINFO, ZLIB_BIN_HASH, ZLIB_PKG};
use common::server::send;
use common::TestServer;
use axum::http::StatusCode;
use md5::{Digest, Md5};
use serde_json::Value;

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("JSON body")
}

#[tokio::test]
async fn ping_advertises_capabilities() {
    let server = TestServer::new().await;

    let (status, headers, body) = send(&server.router, "GET", "/v1/ping", &[], None).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(
        headers
            .get("x-conan-server-capabilities")
            .and_then(|v| v.to_str().ok()),
        Some("complex_search,revisions")
    );
    assert!(body.is_empty());
}

#[tokio::test]
async fn user_endpoints_acknowledge() {
    let server = TestServer::new().await;

    for uri in ["/v1/users/authenticate", "/v1/users/check_credentials"] {
        let (status, _, body) = send(&server.router, "GET", uri, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"{}");
    }
}

#[tokio::test]
async fn recipe_search_matches_substring() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;
    seed_zmqpp_recipe(&server).await;

    let (status, _, body) = send(&server.router, "GET", "/v1/conans/search?q=zlib", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    // the /_/_ namespace is trimmed; four export files dedup to one entry
    assert_eq!(as_json(&body), serde_json::json!({ "results": ["zlib/1.2.11"] }));

    let (status, _, body) = send(&server.router, "GET", "/v1/conans/search?q=", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    let results = as_json(&body)["results"].as_array().unwrap().clone();
    assert!(results.contains(&Value::String("zlib/1.2.11".to_string())));
    assert!(results.contains(&Value::String("zmqpp/4.2.0".to_string())));
}

#[tokio::test]
async fn recipe_search_keeps_real_namespaces() {
    let server = TestServer::new().await;
    server
        .seed("boost/1.70.0/conan/stable/0/export/conanfile.py", b"x")
        .await;

    let (status, _, body) =
        send(&server.router, "GET", "/v1/conans/search?q=boost", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        serde_json::json!({ "results": ["boost/1.70.0/conan/stable"] })
    );
}

#[tokio::test]
async fn recipe_search_with_no_matches_is_empty() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let (status, _, body) =
        send(&server.router, "GET", "/v1/conans/search?q=nothere", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), serde_json::json!({ "results": [] }));
}

#[tokio::test]
async fn binary_search_mirrors_conaninfo() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v1/conans/zlib/1.2.11/_/_/search",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    let package = &json[ZLIB_BIN_HASH];
    assert!(package.is_object(), "response keyed by binary hash: {json}");

    for section in [
        "settings",
        "requires",
        "options",
        "full_settings",
        "full_requires",
        "full_options",
    ] {
        assert!(package[section].is_object(), "missing section {section}");
    }
    assert_eq!(package["settings"]["os"], "Linux");
    assert_eq!(package["settings"]["compiler.version"], "9");
    assert_eq!(package["options"]["fPIC"], "True");
    assert_eq!(
        package["recipe_hash"],
        Value::String("cb005523f87beefc615e1ff49724883e".to_string())
    );
}

#[tokio::test]
async fn binary_search_without_binaries_is_not_found() {
    let server = TestServer::new().await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v1/conans/zlib/1.2.11/_/_/search",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        String::from_utf8_lossy(&body),
        "URI /v1/conans/zlib/1.2.11/_/_/search not found."
    );
}

#[tokio::test]
async fn recipe_download_urls_lists_present_files() {
    let server = TestServer::new().await;
    seed_zmqpp_recipe(&server).await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v1/conans/zmqpp/4.2.0/_/_/download_urls",
        &[("host", "localhost")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_json(&body),
        serde_json::json!({
            "conanmanifest.txt":
                "http://localhost/zmqpp/4.2.0/_/_/0/export/conanmanifest.txt",
            "conan_export.tgz":
                "http://localhost/zmqpp/4.2.0/_/_/0/export/conan_export.tgz",
            "conanfile.py":
                "http://localhost/zmqpp/4.2.0/_/_/0/export/conanfile.py",
        })
    );
}

#[tokio::test]
async fn recipe_download_urls_without_host_header() {
    let server = TestServer::new().await;
    seed_zmqpp_recipe(&server).await;

    let (status, _, body) = send(
        &server.router,
        "GET",
        "/v1/conans/zmqpp/4.2.0/_/_/download_urls",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // the empty-host form is a protocol quirk the client tolerates
    assert_eq!(
        as_json(&body)["conanfile.py"],
        "http:///zmqpp/4.2.0/_/_/0/export/conanfile.py"
    );
}

#[tokio::test]
async fn recipe_download_urls_for_missing_package() {
    let server = TestServer::new().await;

    let (status, _, _) = send(
        &server.router,
        "GET",
        "/v1/conans/absent/1.0/_/_/download_urls",
        &[("host", "localhost")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn binary_download_urls_lists_present_files() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let uri = format!("/v1/conans/{ZLIB_PKG}/packages/{ZLIB_BIN_HASH}/download_urls");
    let (status, _, body) =
        send(&server.router, "GET", &uri, &[("host", "localhost")], None).await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    assert_eq!(
        json["conaninfo.txt"],
        format!("http://localhost/{ZLIB_PKG}/0/package/{ZLIB_BIN_HASH}/0/conaninfo.txt")
    );
    assert!(json.get("conanmanifest.txt").is_some());
    assert!(json.get("conan_package.tgz").is_some());
}

#[tokio::test]
async fn binary_digest_is_md5_of_contents() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    let uri = format!("/v1/conans/{ZLIB_PKG}/packages/{ZLIB_BIN_HASH}");
    let (status, _, body) = send(&server.router, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    assert_eq!(
        json["conaninfo.txt"],
        hex::encode(Md5::digest(CONANINFO.as_bytes()))
    );
    assert_eq!(
        json["conanmanifest.txt"],
        hex::encode(Md5::digest(b"manifest data"))
    );
    assert_eq!(
        json["conan_package.tgz"],
        hex::encode(Md5::digest(b"package data"))
    );
}

#[tokio::test]
async fn binary_digest_maps_absent_files_to_null() {
    let server = TestServer::new().await;
    server
        .seed(
            &format!("{ZLIB_PKG}/0/package/{ZLIB_BIN_HASH}/0/conanmanifest.txt"),
            b"manifest data",
        )
        .await;

    let uri = format!("/v1/conans/{ZLIB_PKG}/packages/{ZLIB_BIN_HASH}");
    let (status, _, body) = send(&server.router, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&body);
    assert!(json["conaninfo.txt"].is_null());
    assert!(json["conan_package.tgz"].is_null());
    assert!(json["conanmanifest.txt"].is_string());
}

#[tokio::test]
async fn binary_digest_of_missing_binary_is_not_found() {
    let server = TestServer::new().await;

    let uri = format!("/v1/conans/{ZLIB_PKG}/packages/{ZLIB_BIN_HASH}");
    let (status, _, _) = send(&server.router, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn binary_digest_rejects_empty_hash() {
    let server = TestServer::new().await;

    let (status, _, _) = send(
        &server.router,
        "GET",
        "/v1/conans/zlib/1.2.11/_/_/packages/",
        &[],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uppercase_hash_matches_no_route() {
    let server = TestServer::new().await;
    seed_zlib(&server).await;

    // hashes are case-sensitive; the uppercase form falls through to the
    // generic file handler and misses
    let uri = "/v1/conans/zlib/1.2.11/_/_/packages/6AF9CC7CB931C5AD942174FD7838EB655717C709";
    let (status, _, _) = send(&server.router, "GET", uri, &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_urls_allocates_signed_urls() {
    let server = TestServer::new().await;

    let body = br#"{"conan_export.tgz":"","conanfile.py":"","conanmanifest.txt":""}"#.to_vec();
    let (status, _, response) = send(
        &server.router,
        "PUT",
        "/v1/conans/zmqpp/4.2.0/_/_/upload_urls",
        &[("host", "localhost")],
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json = as_json(&response);
    for name in ["conan_export.tgz", "conanfile.py", "conanmanifest.txt"] {
        assert_eq!(
            json[name],
            format!("http://localhost/zmqpp/4.2.0/_/_/0/export/{name}?signature=0")
        );
    }
}

#[tokio::test]
async fn upload_urls_refuses_populated_coordinate() {
    let server = TestServer::new().await;
    seed_zmqpp_recipe(&server).await;

    let body = br#"{"conanfile.py":""}"#.to_vec();
    let (status, _, response) = send(
        &server.router,
        "PUT",
        "/v1/conans/zmqpp/4.2.0/_/_/upload_urls",
        &[("host", "localhost")],
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8_lossy(&response).contains("already exists"));
}

#[tokio::test]
async fn upload_urls_rejects_malformed_body() {
    let server = TestServer::new().await;

    let (status, _, _) = send(
        &server.router,
        "PUT",
        "/v1/conans/zmqpp/4.2.0/_/_/upload_urls",
        &[("host", "localhost")],
        Some(b"not json".to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_urls_requires_full_coordinate() {
    let server = TestServer::new().await;

    let (status, _, _) = send(
        &server.router,
        "PUT",
        "/v1/conans/zmqpp/4.2.0/upload_urls",
        &[("host", "localhost")],
        Some(b"{}".to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generic_put_then_get_roundtrip() {
    let server = TestServer::new().await;

    let key = "/zmqpp/4.2.0/_/_/0/export/conanfile.py";
    let (status, _, _) = send(
        &server.router,
        "PUT",
        key,
        &[],
        Some(b"from conans import ConanFile".to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(&server.router, "GET", key, &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"from conans import ConanFile");
}

#[tokio::test]
async fn generic_get_of_missing_blob() {
    let server = TestServer::new().await;

    let (status, _, body) = send(&server.router, "GET", "/no/such/blob", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(String::from_utf8_lossy(&body), "URI /no/such/blob not found.");
}

#[tokio::test]
async fn generic_put_with_traversal_is_rejected() {
    let server = TestServer::new().await;

    let (status, _, _) = send(
        &server.router,
        "PUT",
        "/pkg/../../etc/passwd",
        &[],
        Some(b"nope".to_vec()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
