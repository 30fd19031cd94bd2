//! Package coordinates and storage key construction.

use crate::error::{Error, Result};
use crate::package_list::{BIN_SUBDIR, INDEX_FILE, SRC_SUBDIR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated slash-separated package path taken from a request URL.
///
/// Conan v1 addresses packages as `name/version/user/channel`, and the URL
/// matcher hands the whole slash-separated run over as a single capture.
/// The path is checked for traversal and malformed segments before it is
/// ever joined into a storage key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackagePath(String);

impl PackagePath {
    /// Parse a package path, rejecting traversal and malformed segments.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::BadKey("empty package path".to_string()));
        }
        if path.contains('\\') {
            return Err(Error::BadKey(format!("backslash in package path: {path}")));
        }
        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(Error::BadKey(format!(
                    "empty segment in package path: {path}"
                )));
            }
            if segment == ".." || segment == "." {
                return Err(Error::BadKey(format!("path traversal not allowed: {path}")));
            }
        }
        Ok(Self(path.to_string()))
    }

    /// Get the path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of a recipe file: `<path>/<rev>/export/<name>`.
    pub fn recipe_file(&self, rev: u32, name: &str) -> String {
        format!("{}/{}/{}/{}", self.0, rev, SRC_SUBDIR, name)
    }

    /// Storage key of the directory holding one binary's revisions:
    /// `<path>/<recipe_rev>/package/<hash>`.
    pub fn binary_dir(&self, recipe_rev: u32, hash: &BinaryHash) -> String {
        format!("{}/{}/{}/{}", self.0, recipe_rev, BIN_SUBDIR, hash)
    }

    /// Storage key of a binary file:
    /// `<path>/<recipe_rev>/package/<hash>/<bin_rev>/<name>`.
    pub fn binary_file(
        &self,
        recipe_rev: u32,
        hash: &BinaryHash,
        bin_rev: u32,
        name: &str,
    ) -> String {
        format!("{}/{}/{}", self.binary_dir(recipe_rev, hash), bin_rev, name)
    }

    /// Storage key of the recipe revisions index.
    pub fn index_key(&self) -> String {
        format!("{}/{}", self.0, INDEX_FILE)
    }

    /// Storage key of a binary revisions index.
    pub fn binary_index_key(&self, recipe_rev: u32, hash: &BinaryHash) -> String {
        format!("{}/{}", self.binary_dir(recipe_rev, hash), INDEX_FILE)
    }
}

impl fmt::Debug for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackagePath({})", self.0)
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lowercase-hex binary package hash.
///
/// Hashes appear in URLs and storage keys and are compared case-sensitively,
/// so uppercase input is rejected rather than folded.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryHash(String);

impl BinaryHash {
    /// Parse a hash string, requiring non-empty lowercase hex.
    pub fn parse(hash: &str) -> Result<Self> {
        if hash.is_empty() {
            return Err(Error::BadHash("empty binary hash".to_string()));
        }
        for c in hash.chars() {
            if !matches!(c, '0'..='9' | 'a'..='f') {
                return Err(Error::BadHash(format!(
                    "binary hash must be lowercase hex: {hash}"
                )));
            }
        }
        Ok(Self(hash.to_string()))
    }

    /// Get the hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BinaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryHash({})", self.0)
    }
}

impl fmt::Display for BinaryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A full four-segment `name/version/user/channel` coordinate.
///
/// User and channel default to the literal `_` for packages published
/// without a namespace; the underscores are part of the on-disk contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    name: String,
    version: String,
    user: String,
    channel: String,
}

impl Coordinate {
    /// Parse a coordinate from its four-segment path form.
    pub fn parse(path: &str) -> Result<Self> {
        let checked = PackagePath::parse(path).map_err(|_| {
            Error::BadCoordinate(format!("malformed coordinate path: {path}"))
        })?;
        let segments: Vec<&str> = checked.as_str().split('/').collect();
        let [name, version, user, channel] = segments.as_slice() else {
            return Err(Error::BadCoordinate(format!(
                "expected name/version/user/channel, got: {path}"
            )));
        };
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            user: user.to_string(),
            channel: channel.to_string(),
        })
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the package version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the publishing user (`_` when unset).
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Get the channel (`_` when unset).
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }
}
