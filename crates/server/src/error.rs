//! API error types.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// API error type.
///
/// 4xx variants render the plain-text bodies the Conan client shows to the
/// user; 401/403 carry no body at all; 5xx responses carry only the error
/// kind, never internals.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource absent. The body format is part of the protocol.
    #[error("URI {0} not found.")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upload refused because the target coordinate is already populated.
    #[error("{0} already exists.")]
    Conflict(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("index fault: {0}")]
    Index(#[from] bodega_index::IndexError),

    #[error("storage fault: {0}")]
    Store(#[from] bodega_storage::StorageError),
}

impl From<bodega_core::Error> for ApiError {
    fn from(err: bodega_core::Error) -> Self {
        use bodega_core::Error;
        match err {
            // malformed URL captures are the client's fault
            Error::BadKey(_) | Error::BadCoordinate(_) | Error::BadHash(_) => {
                Self::BadRequest(err.to_string())
            }
            // broken stored documents are ours
            Error::InvalidIni(reason) | Error::InvalidIndex(reason) => {
                Self::Store(bodega_storage::StorageError::Config(reason))
            }
        }
    }
}

impl ApiError {
    /// Get the error kind for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::AuthRequired => "auth_required",
            Self::Forbidden => "forbidden",
            Self::Index(_) => "index_fault",
            Self::Store(_) => "store_fault",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // the v1 client expects 404 on a refused re-upload
            Self::Conflict(_) => StatusCode::NOT_FOUND,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) => match e {
                bodega_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                bodega_storage::StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::AuthRequired | Self::Forbidden => String::new(),
            _ if status.is_server_error() => self.kind().to_string(),
            _ => self.to_string(),
        };
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
