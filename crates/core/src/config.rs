//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:9300").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:9300".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
    /// Non-persistent in-memory storage.
    Memory,
}

/// Authentication configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthConfig {
    /// Every request is allowed.
    #[default]
    Anonymous,
    /// HTTP Basic authentication against a fixed user table.
    Basic {
        /// Username to credentials.
        users: BTreeMap<String, BasicUser>,
    },
}

/// One configured Basic-auth user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BasicUser {
    pub password: String,
    /// Whether the user may upload. Read access is implied.
    #[serde(default = "default_write")]
    pub write: bool,
}

fn default_write() -> bool {
    true
}

/// Top-level application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// In-memory, anonymous configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::Memory,
            auth: AuthConfig::Anonymous,
        }
    }
}
