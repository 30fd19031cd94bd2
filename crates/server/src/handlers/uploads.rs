//! Upload URL allocation.

use super::{path_param, request_host, PKG_SRC_DIR};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::body::Body;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bodega_core::coordinate::Coordinate;
use regex::Captures;
use serde_json::{Map, Value};

/// Upload request bodies are small JSON maps of filenames.
const MAX_REQUEST_BODY: usize = 64 * 1024;

/// PUT /v1/conans/<coord>/upload_urls - allocate an upload URL per file
/// named in the request body. A coordinate that already holds data refuses
/// re-upload; clients publish a new version instead.
pub async fn upload_urls(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
    body: Body,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    // uploads address full coordinates, never partial paths
    Coordinate::parse(path.as_str())?;
    let host = request_host(parts);

    if !state.storage.list(path.as_str()).await?.is_empty() {
        return Err(ApiError::Conflict(path.to_string()));
    }

    let bytes = axum::body::to_bytes(body, MAX_REQUEST_BODY)
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable request body: {e}")))?;
    let request: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("malformed upload request: {e}")))?;

    let mut urls = Map::new();
    for name in request.keys() {
        urls.insert(
            name.clone(),
            Value::String(format!(
                "http://{host}/{path}{PKG_SRC_DIR}{name}?signature=0"
            )),
        );
    }
    Ok(Json(Value::Object(urls)).into_response())
}
