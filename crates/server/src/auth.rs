//! Authentication and authorization capability checks.
//!
//! The router evaluates one capability check per request before the
//! handler runs. Policies are pluggable; the server ships an anonymous
//! policy and HTTP Basic against a configured user table, which is what
//! stock Conan clients speak.

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose;
use base64::Engine as _;
use bodega_core::config::{AuthConfig, BasicUser};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a request wants to do with the repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Outcome of a capability check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Let the handler run.
    Allow,
    /// Credentials missing or unusable: respond 401.
    NeedAuth,
    /// Credentials fine but the action is not permitted: respond 403.
    Deny,
}

/// Pluggable capability check evaluated before every route.
#[async_trait]
pub trait AccessPolicy: Send + Sync + 'static {
    /// Decide whether the request may perform `action`.
    async fn check(&self, request: &Parts, action: Action) -> Decision;
}

/// Policy that lets every request through.
pub struct AnonymousPolicy;

#[async_trait]
impl AccessPolicy for AnonymousPolicy {
    async fn check(&self, _request: &Parts, _action: Action) -> Decision {
        Decision::Allow
    }
}

/// HTTP Basic authentication against a fixed user table.
pub struct BasicAuthPolicy {
    users: BTreeMap<String, BasicUser>,
}

impl BasicAuthPolicy {
    /// Create a policy over a user table.
    pub fn new(users: BTreeMap<String, BasicUser>) -> Self {
        Self { users }
    }
}

/// Extract the username/password pair from an `Authorization: Basic` header.
/// Per RFC 7617 the scheme is case-insensitive.
fn decode_basic(parts: &Parts) -> Option<(String, String)> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    if header.len() < 6 || !header[..6].eq_ignore_ascii_case("basic ") {
        return None;
    }
    let decoded = general_purpose::STANDARD.decode(header[6..].trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, password) = text.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

#[async_trait]
impl AccessPolicy for BasicAuthPolicy {
    async fn check(&self, request: &Parts, action: Action) -> Decision {
        let Some((user, password)) = decode_basic(request) else {
            return Decision::NeedAuth;
        };
        match self.users.get(&user) {
            Some(record) if record.password == password => {
                if action == Action::Write && !record.write {
                    Decision::Deny
                } else {
                    Decision::Allow
                }
            }
            // wrong password and unknown user look identical to the client
            _ => Decision::NeedAuth,
        }
    }
}

/// Build the configured policy.
pub fn from_config(config: &AuthConfig) -> Arc<dyn AccessPolicy> {
    match config {
        AuthConfig::Anonymous => Arc::new(AnonymousPolicy),
        AuthConfig::Basic { users } => Arc::new(BasicAuthPolicy::new(users.clone())),
    }
}
