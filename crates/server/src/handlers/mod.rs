//! HTTP request handlers.

pub mod conans;
pub mod files;
pub mod ping;
pub mod uploads;
pub mod users;
pub mod v2;

use crate::error::{ApiError, ApiResult};
use axum::http::header::HOST;
use axum::http::request::Parts;
use bodega_core::coordinate::{BinaryHash, PackagePath};
use regex::Captures;

/// Fixed v1 recipe subdir: revision 0 plus `export/`. The zeros are part of
/// the on-disk contract the v1 client depends on.
pub(crate) const PKG_SRC_DIR: &str = "/0/export/";

/// Fixed v1 binaries subdir under revision 0.
pub(crate) const PKG_BIN_DIR: &str = "/0/package/";

/// Fixed v1 binary revision subdir.
pub(crate) const PKG_REV_DIR: &str = "/0/";

/// Host header value used for absolute URLs in responses. A missing header
/// yields an empty host (`http:///...`), which the Conan client tolerates.
pub(crate) fn request_host(parts: &Parts) -> String {
    parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// 404 for the requested URI, with the protocol's body text.
pub(crate) fn not_found(parts: &Parts) -> ApiError {
    ApiError::NotFound(parts.uri.path().to_string())
}

/// The coordinate portion of a matched URL.
pub(crate) fn path_param(caps: &Captures<'_>) -> ApiResult<PackagePath> {
    let raw = caps.name("path").map(|m| m.as_str()).unwrap_or_default();
    Ok(PackagePath::parse(raw)?)
}

/// The binary hash portion of a matched URL.
pub(crate) fn hash_param(caps: &Captures<'_>) -> ApiResult<BinaryHash> {
    let raw = caps.name("hash").map(|m| m.as_str()).unwrap_or_default();
    Ok(BinaryHash::parse(raw)?)
}

/// A numeric revision capture.
pub(crate) fn rev_param(caps: &Captures<'_>, name: &str) -> ApiResult<u32> {
    let raw = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("bad revision number: {raw}")))
}

/// The `file` capture may contain subdirectories but must stay inside the
/// revision directory.
pub(crate) fn file_param(caps: &Captures<'_>) -> ApiResult<String> {
    let raw = caps.name("file").map(|m| m.as_str()).unwrap_or_default();
    Ok(PackagePath::parse(raw)?.as_str().to_string())
}
