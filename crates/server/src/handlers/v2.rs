//! Conan v2 revision endpoints.

use super::{file_param, hash_param, not_found, path_param, rev_param};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bodega_core::package_list::SRC_SUBDIR;
use bodega_index::RevisionsIndexApi;
use regex::Captures;
use serde_json::{json, Map, Value};

/// GET /v2/conans/<coord>/latest - the highest recipe revision on record.
/// A transiently absent or empty index reads as 404.
pub async fn latest(state: &AppState, caps: &Captures<'_>, parts: &Parts) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let api = RevisionsIndexApi::new(state.storage.clone(), path);
    let entry = match api.latest_recipe_revision().await? {
        Some(entry) => entry,
        None => return Err(not_found(parts)),
    };
    Ok(Json(json!({ "revision": entry.revision, "time": entry.time })).into_response())
}

/// GET /v2/conans/<coord>/revisions/<rev>/files - files beneath one recipe
/// revision.
pub async fn recipe_files(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let rev = rev_param(caps, "rev")?;
    let dir = format!("{path}/{rev}/{SRC_SUBDIR}");
    file_listing(state, &dir, parts).await
}

/// GET /v2/conans/<coord>/revisions/<rev>/files/<name> - stream one recipe
/// file.
pub async fn recipe_file(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let rev = rev_param(caps, "rev")?;
    let file = file_param(caps)?;
    super::files::download(state, &path.recipe_file(rev, &file), parts).await
}

/// GET .../packages/<hash>/revisions/<brev>/files - files beneath one
/// binary revision.
pub async fn binary_files(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let rev = rev_param(caps, "rev")?;
    let hash = hash_param(caps)?;
    let bin_rev = rev_param(caps, "brev")?;
    let dir = format!("{}/{bin_rev}", path.binary_dir(rev, &hash));
    file_listing(state, &dir, parts).await
}

/// GET .../packages/<hash>/revisions/<brev>/files/<name> - stream one
/// binary file.
pub async fn binary_file(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let rev = rev_param(caps, "rev")?;
    let hash = hash_param(caps)?;
    let bin_rev = rev_param(caps, "brev")?;
    let file = file_param(caps)?;
    super::files::download(state, &path.binary_file(rev, &hash, bin_rev, &file), parts).await
}

/// `{"files":{"<name>":{}}}` for every key under `dir` - the wire shape the
/// v2 client expects.
async fn file_listing(state: &AppState, dir: &str, parts: &Parts) -> ApiResult<Response> {
    let keys = state.storage.list(dir).await?;
    let mut files = Map::new();
    for key in keys {
        if let Some(name) = key.strip_prefix(dir).and_then(|r| r.strip_prefix('/')) {
            files.insert(name.to_string(), Value::Object(Map::new()));
        }
    }
    if files.is_empty() {
        return Err(not_found(parts));
    }
    Ok(Json(json!({ "files": files })).into_response())
}
