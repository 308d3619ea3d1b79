//! Error types for gitscope-git.

use git2::Oid;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git plumbing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No repository at the given path.
    #[error("not a git repository")]
    NotARepository,

    /// Object is missing from the object database.
    #[error("object not found: {0}")]
    ObjectNotFound(Oid),

    /// Object exists but does not peel to a commit.
    #[error("object {0} is not a commit")]
    NotACommit(Oid),

    /// A reachability test visited more commits than its budget allows.
    #[error("reachability walk exceeded {0} commits")]
    WalkLimitExceeded(usize),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}
