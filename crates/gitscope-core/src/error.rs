//! Error types for gitscope-core.

use gitscope_git::ObjectId;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitscope-core operations.
///
/// Unresolvable or hidden revisions are not errors; they surface as
/// `None`/`false`. Only caller mistakes and storage failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page size must be positive.
    #[error("page limit must be positive")]
    InvalidLimit,

    /// The requested page start is not part of the walk.
    #[error("page start {0} is not in the requested history")]
    StartNotFound(ObjectId),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Git operation error.
    #[error("git error: {0}")]
    Git(#[from] gitscope_git::Error),
}
