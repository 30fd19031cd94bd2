//! Core domain types for the Bodega Conan repository.
//!
//! This crate provides:
//! - Package coordinates and storage key construction
//! - The `conaninfo.txt` INI document model
//! - Canonical package file lists and the `revisions.txt` document model
//! - Configuration types shared across crates

pub mod conaninfo;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod package_list;
pub mod revision;

pub use conaninfo::ConanInfo;
pub use coordinate::{BinaryHash, Coordinate, PackagePath};
pub use error::{Error, Result};
pub use revision::{RevisionEntry, RevisionList};
