//! Conan URL patterns and request dispatch.
//!
//! Conan coordinates carry slashes in the middle of the path (for example
//! `/v1/conans/zlib/1.2.11/_/_/download_urls`), which axum's path
//! parameters cannot express, so the whole surface dispatches through a
//! fallback handler over a compiled regex table. First match wins; requests
//! no pattern claims fall through to the generic blob handlers.

use crate::auth::{Action, Decision};
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::Router;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tower_http::trace::TraceLayer;

/// One Conan endpoint family.
#[derive(Clone, Copy, Debug)]
enum Route {
    Ping,
    UserAuth,
    CredsCheck,
    RecipeSearch,
    BinaryDownloadUrls,
    RecipeDownloadUrls,
    BinarySearch,
    BinaryDigest,
    UploadUrls,
    LatestRevision,
    BinaryFileList,
    BinaryFileFetch,
    RecipeFileList,
    RecipeFileFetch,
}

struct RoutePattern {
    method: Method,
    action: Action,
    route: Route,
    regex: Regex,
}

fn entry(method: Method, action: Action, route: Route, pattern: &str) -> RoutePattern {
    RoutePattern {
        method,
        action,
        route,
        regex: Regex::new(pattern).expect("static route pattern"),
    }
}

/// Compiled Conan URL table.
///
/// Order matters twice: the exact `/v1/conans/search` precedes the
/// per-coordinate search, and the v2 binary patterns precede the v2 recipe
/// patterns because the greedy `path` capture would otherwise swallow the
/// `packages/...` tail.
static ROUTES: LazyLock<Vec<RoutePattern>> = LazyLock::new(|| {
    use Action::{Read, Write};
    vec![
        entry(Method::GET, Read, Route::Ping, r"^/v1/ping$"),
        entry(
            Method::GET,
            Read,
            Route::UserAuth,
            r"^/v1/users/authenticate$",
        ),
        entry(
            Method::GET,
            Read,
            Route::CredsCheck,
            r"^/v1/users/check_credentials$",
        ),
        entry(Method::GET, Read, Route::RecipeSearch, r"^/v1/conans/search$"),
        entry(
            Method::GET,
            Read,
            Route::BinaryDownloadUrls,
            r"^/v1/conans/(?P<path>.*)/packages/(?P<hash>[0-9a-f]*)/download_urls$",
        ),
        entry(
            Method::GET,
            Read,
            Route::RecipeDownloadUrls,
            r"^/v1/conans/(?P<path>.*)/download_urls$",
        ),
        entry(
            Method::GET,
            Read,
            Route::BinarySearch,
            r"^/v1/conans/(?P<path>.*)/search$",
        ),
        entry(
            Method::GET,
            Read,
            Route::BinaryDigest,
            r"^/v1/conans/(?P<path>.*)/packages/(?P<hash>[0-9a-f]*)$",
        ),
        entry(
            Method::PUT,
            Write,
            Route::UploadUrls,
            r"^/v1/conans/(?P<path>.*)/upload_urls$",
        ),
        entry(
            Method::GET,
            Read,
            Route::LatestRevision,
            r"^/v2/conans/(?P<path>.*)/latest$",
        ),
        entry(
            Method::GET,
            Read,
            Route::BinaryFileFetch,
            r"^/v2/conans/(?P<path>.*)/revisions/(?P<rev>[0-9]+)/packages/(?P<hash>[0-9a-f]+)/revisions/(?P<brev>[0-9]+)/files/(?P<file>.+)$",
        ),
        entry(
            Method::GET,
            Read,
            Route::BinaryFileList,
            r"^/v2/conans/(?P<path>.*)/revisions/(?P<rev>[0-9]+)/packages/(?P<hash>[0-9a-f]+)/revisions/(?P<brev>[0-9]+)/files$",
        ),
        entry(
            Method::GET,
            Read,
            Route::RecipeFileFetch,
            r"^/v2/conans/(?P<path>.*)/revisions/(?P<rev>[0-9]+)/files/(?P<file>.+)$",
        ),
        entry(
            Method::GET,
            Read,
            Route::RecipeFileList,
            r"^/v2/conans/(?P<path>.*)/revisions/(?P<rev>[0-9]+)/files$",
        ),
    ]
});

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let matched = ROUTES
        .iter()
        .filter(|entry| entry.method == method)
        .find_map(|entry| entry.regex.captures(&path).map(|caps| (entry, caps)));

    let action = match &matched {
        Some((entry, _)) => entry.action,
        None if method == Method::GET => Action::Read,
        None => Action::Write,
    };

    let (parts, body) = req.into_parts();
    match state.auth.check(&parts, action).await {
        Decision::Allow => {}
        Decision::NeedAuth => return ApiError::AuthRequired.into_response(),
        Decision::Deny => return ApiError::Forbidden.into_response(),
    }

    let result = match matched {
        Some((entry, caps)) => invoke(&state, entry.route, &caps, &parts, body).await,
        None => handlers::files::fallthrough(&state, &method, &parts, body).await,
    };

    result.unwrap_or_else(|err| err.into_response())
}

async fn invoke(
    state: &AppState,
    route: Route,
    caps: &Captures<'_>,
    parts: &Parts,
    body: Body,
) -> ApiResult<Response> {
    match route {
        Route::Ping => handlers::ping::ping(),
        Route::UserAuth | Route::CredsCheck => handlers::users::acknowledge(),
        Route::RecipeSearch => handlers::conans::recipe_search(state, parts).await,
        Route::BinarySearch => handlers::conans::binary_search(state, caps, parts).await,
        Route::RecipeDownloadUrls => {
            handlers::conans::recipe_download_urls(state, caps, parts).await
        }
        Route::BinaryDownloadUrls => {
            handlers::conans::binary_download_urls(state, caps, parts).await
        }
        Route::BinaryDigest => handlers::conans::binary_digest(state, caps, parts).await,
        Route::UploadUrls => handlers::uploads::upload_urls(state, caps, parts, body).await,
        Route::LatestRevision => handlers::v2::latest(state, caps, parts).await,
        Route::RecipeFileList => handlers::v2::recipe_files(state, caps, parts).await,
        Route::RecipeFileFetch => handlers::v2::recipe_file(state, caps, parts).await,
        Route::BinaryFileList => handlers::v2::binary_files(state, caps, parts).await,
        Route::BinaryFileFetch => handlers::v2::binary_file(state, caps, parts).await,
    }
}
