//! Protocol capability ping.

use crate::error::ApiResult;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Capabilities advertised to the Conan client.
const CAPABILITIES: &str = "complex_search,revisions";

/// GET /v1/ping - 202 with the capability header and no body.
pub fn ping() -> ApiResult<Response> {
    Ok((
        StatusCode::ACCEPTED,
        [("x-conan-server-capabilities", CAPABILITIES)],
        "",
    )
        .into_response())
}
