//! Server test utilities.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use bodega_core::config::{AppConfig, AuthConfig};
use bodega_server::{auth, create_router, AppState};
use bodega_storage::{MemoryBackend, ObjectStore};
use bytes::Bytes;
use std::sync::Arc;
use tower::ServiceExt;

/// A test server over in-memory storage.
/// Note: #[allow(dead_code)] because each test file compiles common/
/// separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestServer {
    /// Create an anonymous test server.
    pub async fn new() -> Self {
        Self::with_auth(AuthConfig::Anonymous).await
    }

    /// Create a test server with an explicit auth configuration.
    pub async fn with_auth(auth_config: AuthConfig) -> Self {
        let storage: Arc<dyn ObjectStore> = Arc::new(MemoryBackend::new());

        let mut config = AppConfig::for_testing();
        config.auth = auth_config;
        let policy = auth::from_config(&config.auth);

        let state = AppState::new(config, storage, policy);
        let router = create_router(state.clone());
        Self { router, state }
    }

    /// Put a blob into the backing store.
    pub async fn seed(&self, key: &str, data: &[u8]) {
        self.state
            .storage
            .put(key, Bytes::copy_from_slice(data))
            .await
            .expect("seed blob");
    }
}

/// Send one request through the router and collect the response.
#[allow(dead_code)]
pub async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Vec<u8>>,
) -> (StatusCode, HeaderMap, Bytes) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(data) => Body::from(data),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes)
}
