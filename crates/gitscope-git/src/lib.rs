//! # gitscope-git
//!
//! Git plumbing for gitscope, built on git2-rs.
//! Provides name resolution, ref listing and commit walks with a
//! reachability oracle, behind the [`ObjectReader`] and [`Walk`] traits.

mod error;
mod repository;
mod traits;
mod types;
mod walk;

pub use error::{Error, Result};
pub use git2::Oid as ObjectId;
pub use repository::{DEFAULT_REACHABILITY_LIMIT, Repository};
pub use traits::{ObjectReader, Walk};
pub use types::{Commit, ObjectKind, R_HEADS, R_TAGS, RefEntry, WalkOrder};
pub use walk::RevWalk;
