//! User acknowledgement endpoints.

use crate::error::ApiResult;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// GET /v1/users/authenticate and GET /v1/users/check_credentials.
///
/// Credential validation happens in the router's capability check before
/// any handler runs; these endpoints only acknowledge that the request got
/// through.
pub fn acknowledge() -> ApiResult<Response> {
    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], "{}").into_response())
}
