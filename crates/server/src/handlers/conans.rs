//! Conan /v1/conans metadata endpoints.
//!
//! These handlers compose JSON responses out of blob-store reads. Every
//! response contract here is parsed by the Conan client, down to the 404
//! body text, so shapes follow the protocol rather than taste.

use super::{
    hash_param, not_found, path_param, request_host, PKG_BIN_DIR, PKG_REV_DIR, PKG_SRC_DIR,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::Query;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bodega_core::conaninfo::ConanInfo;
use bodega_core::package_list::{CONAN_INFO, PKG_BIN_LIST, PKG_SRC_LIST};
use md5::{Digest, Md5};
use regex::Captures;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// GET /v1/conans/search?q=<pattern> - substring search over recipe
/// coordinates. No wildcard expansion; an empty pattern lists everything.
pub async fn recipe_search(state: &AppState, parts: &Parts) -> ApiResult<Response> {
    let Query(query) = Query::<SearchQuery>::try_from_uri(&parts.uri)
        .map_err(|e| ApiError::BadRequest(format!("bad search query: {e}")))?;

    let keys = state.storage.list("").await?;
    let mut results: Vec<String> = Vec::new();
    for key in keys {
        // only keys under an export dir belong to a recipe
        let marker = match key.find(PKG_SRC_DIR) {
            Some(marker) if marker > 0 => marker,
            _ => continue,
        };
        let mut recipe = &key[..marker];
        // unnamespaced packages are presented as name/version only
        if let Some(extra) = recipe.find("/_/_") {
            recipe = &recipe[..extra];
        }
        if recipe.contains(&query.q) && !results.iter().any(|r| r == recipe) {
            results.push(recipe.to_string());
        }
    }

    Ok(Json(serde_json::json!({ "results": results })).into_response())
}

/// GET /v1/conans/<coord>/search - the first binary's `conaninfo.txt`
/// rendered as JSON, keyed by the binary hash. The value mirrors the INI
/// structure section by section, plus a top-level `recipe_hash`.
pub async fn binary_search(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let bin_root = format!("{path}{PKG_BIN_DIR}");

    let keys = state.storage.list(bin_root.trim_end_matches('/')).await?;
    let info_key = match keys.iter().find(|k| k.ends_with(CONAN_INFO)) {
        Some(key) => key,
        None => return Err(not_found(parts)),
    };
    let hash = match info_key
        .strip_prefix(&bin_root)
        .and_then(|rest| rest.split('/').next())
    {
        Some(hash) => hash,
        None => return Err(not_found(parts)),
    };

    let data = state.storage.get(info_key).await?;
    let info = ConanInfo::parse(&String::from_utf8_lossy(&data))?;

    let mut package = Map::new();
    for section in info.sections() {
        let mut entries = Map::new();
        for key in info.keys(section) {
            let value = info.get(section, key).unwrap_or_default();
            entries.insert(key.to_string(), Value::String(value.to_string()));
        }
        package.insert(section.to_string(), Value::Object(entries));
    }
    // the recipe hash is carried as the sole key of its section; lift it to
    // a plain string field, replacing the section object
    if let Some(recipe_hash) = info.keys("recipe_hash").first() {
        package.insert(
            "recipe_hash".to_string(),
            Value::String((*recipe_hash).to_string()),
        );
    }

    let mut body = Map::new();
    body.insert(hash.to_string(), Value::Object(package));
    Ok(Json(Value::Object(body)).into_response())
}

/// GET /v1/conans/<coord>/download_urls - absolute URLs for the canonical
/// recipe files present in storage. Absent files are omitted.
pub async fn recipe_download_urls(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let host = request_host(parts);

    let mut urls = Map::new();
    for name in PKG_SRC_LIST {
        let key = format!("{path}{PKG_SRC_DIR}{name}");
        if state.storage.exists(&key).await? {
            urls.insert(
                name.to_string(),
                Value::String(format!("http://{host}/{key}")),
            );
        }
    }
    if urls.is_empty() {
        return Err(not_found(parts));
    }
    Ok(Json(Value::Object(urls)).into_response())
}

/// GET /v1/conans/<coord>/packages/<hash>/download_urls - absolute URLs for
/// the canonical binary files present in storage.
pub async fn binary_download_urls(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let hash = hash_param(caps)?;
    let host = request_host(parts);

    let mut urls = Map::new();
    for name in PKG_BIN_LIST {
        let key = format!("{path}{PKG_BIN_DIR}{hash}{PKG_REV_DIR}{name}");
        if state.storage.exists(&key).await? {
            urls.insert(
                name.to_string(),
                Value::String(format!("http://{host}/{key}")),
            );
        }
    }
    if urls.is_empty() {
        return Err(not_found(parts));
    }
    Ok(Json(Value::Object(urls)).into_response())
}

/// GET /v1/conans/<coord>/packages/<hash> - MD5 digest of each canonical
/// binary file, lowercase hex. Absent files map to JSON null; 404 only when
/// nothing exists at all.
pub async fn binary_digest(
    state: &AppState,
    caps: &Captures<'_>,
    parts: &Parts,
) -> ApiResult<Response> {
    let path = path_param(caps)?;
    let hash = hash_param(caps)?;

    let mut digests = Map::new();
    let mut any_present = false;
    for name in PKG_BIN_LIST {
        let key = format!("{path}{PKG_BIN_DIR}{hash}{PKG_REV_DIR}{name}");
        if state.storage.exists(&key).await? {
            let data = state.storage.get(&key).await?;
            digests.insert(
                name.to_string(),
                Value::String(hex::encode(Md5::digest(&data))),
            );
            any_present = true;
        } else {
            digests.insert(name.to_string(), Value::Null);
        }
    }
    if !any_present {
        return Err(not_found(parts));
    }
    Ok(Json(Value::Object(digests)).into_response())
}
