//! Generic blob download/upload fallthrough.
//!
//! Requests no pattern claims map directly onto the object store: the
//! Conan client fetches package files and pushes uploads through these.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bodega_core::coordinate::PackagePath;
use bodega_storage::StorageError;
use futures::StreamExt;

/// Largest accepted generic upload (1 GiB).
const MAX_BLOB_SIZE: usize = 1024 * 1024 * 1024;

/// Dispatch an unmatched request as a plain blob read or write. The key is
/// validated here because not every backend polices traversal itself.
pub async fn fallthrough(
    state: &AppState,
    method: &Method,
    parts: &Parts,
    body: Body,
) -> ApiResult<Response> {
    let raw = parts.uri.path().trim_start_matches('/');
    if raw.is_empty() {
        return Err(super::not_found(parts));
    }
    let key = PackagePath::parse(raw)?.as_str().to_string();
    match *method {
        Method::GET => download(state, &key, parts).await,
        Method::PUT => upload(state, &key, body).await,
        _ => Err(super::not_found(parts)),
    }
}

/// Stream the blob at `key`. No JSON envelope.
pub async fn download(state: &AppState, key: &str, parts: &Parts) -> ApiResult<Response> {
    let stream = match state.storage.get_stream(key).await {
        Ok(stream) => stream,
        Err(StorageError::NotFound(_)) => return Err(super::not_found(parts)),
        Err(err) => return Err(err.into()),
    };
    let body = Body::from_stream(
        stream.map(|chunk| chunk.map_err(|e| std::io::Error::other(e.to_string()))),
    );
    Ok((StatusCode::OK, body).into_response())
}

async fn upload(state: &AppState, key: &str, body: Body) -> ApiResult<Response> {
    let data = axum::body::to_bytes(body, MAX_BLOB_SIZE)
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable request body: {e}")))?;
    state.storage.put(key, data).await?;
    Ok(StatusCode::CREATED.into_response())
}
