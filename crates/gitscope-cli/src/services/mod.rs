//! Service layer for business logic with dependency injection.
//!
//! Services borrow a repository through the `ObjectReader` trait, the
//! principal through `AccessControl` and a shared `VisibilityGate`, and are
//! handed a walk per call. Presentation stays in `commands`.

pub mod log;
pub mod resolve;
pub mod visible;

pub use log::{LogPage, LogService};
pub use resolve::{ResolveResult, ResolveService};
pub use visible::VisibleService;

#[cfg(test)]
pub mod test_repo;
