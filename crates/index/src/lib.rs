//! Revision index maintenance for Conan packages.
//!
//! Conan v2 clients discover revisions through `revisions.txt` files kept
//! at the coordinate root (recipe revisions) and under each binary hash
//! (binary revisions). This crate rebuilds and edits those files against
//! any `ObjectStore`, serializing per-coordinate through the storage lock.

pub mod api;
pub mod error;
pub mod indexer;

pub use api::{BinaryUpdate, FullUpdate, RevisionsIndexApi};
pub use error::{IndexError, IndexResult};
pub use indexer::RevisionsIndexer;
