//! HTTP API server for the Conan repository protocol.
//!
//! This crate provides the HTTP surface:
//! - v1 recipe and binary metadata endpoints (search, download URLs,
//!   manifest digests)
//! - Upload URL allocation
//! - v2 revision endpoints (latest, file listing and retrieval)
//! - Generic blob download/upload fallthrough onto the object store

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AccessPolicy, Action, AnonymousPolicy, BasicAuthPolicy, Decision};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
