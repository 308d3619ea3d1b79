//! Trait abstractions for git plumbing.
//!
//! This module defines the `ObjectReader` and `Walk` traits, which are the
//! only way the request-resolution core touches a repository. Keeping them
//! as traits enables dependency injection and testing against in-memory
//! graphs.

use git2::Oid;

use crate::{Commit, ObjectKind, RefEntry, Result, WalkOrder};

/// Read-only access to names, objects and refs of one repository.
///
/// Note: like git2 itself, all operations are synchronous.
#[allow(clippy::missing_errors_doc)]
pub trait ObjectReader {
    /// Name the repository is served under.
    fn name(&self) -> &str;

    /// Resolve a revision name (ref, abbreviated or full id, `name^`,
    /// `name~n`) to an object id.
    ///
    /// Returns `None` when the name is unknown, ambiguous or malformed.
    fn resolve(&self, name: &str) -> Result<Option<Oid>>;

    /// Kind of the object with the given id, or `None` if it is missing.
    fn object_kind(&self, id: Oid) -> Result<Option<ObjectKind>>;

    /// Object an annotated tag points at, or `None` if `id` is not a tag.
    fn tag_target(&self, id: Oid) -> Result<Option<(Oid, ObjectKind)>>;

    /// All refs in the repository, excluding `HEAD`.
    fn list_refs(&self) -> Result<Vec<RefEntry>>;

    /// Refs whose target or peeled target is `id`.
    fn refs_pointing_at(&self, id: Oid) -> Result<Vec<RefEntry>> {
        Ok(self
            .list_refs()?
            .into_iter()
            .filter(|r| r.points_at(id))
            .collect())
    }
}

/// A stateful commit-graph traversal.
///
/// Walks are owned by a single request and are never shared; marks, order
/// and cursor position are mutable state.
#[allow(clippy::missing_errors_doc)]
pub trait Walk {
    /// Add a commit the walk starts from.
    fn mark_start(&mut self, id: Oid) -> Result<()>;

    /// Hide a commit and all its ancestors from the walk.
    fn mark_uninteresting(&mut self, id: Oid) -> Result<()>;

    /// Next commit in walk order, or `None` when exhausted.
    fn next_commit(&mut self) -> Result<Option<Commit>>;

    /// Clear all marks so the walk can be configured again.
    fn reset(&mut self) -> Result<()>;

    /// Change the order of subsequent iteration.
    fn set_order(&mut self, order: WalkOrder) -> Result<()>;

    /// Look up a commit, peeling annotated tags.
    ///
    /// Fails with [`crate::Error::NotACommit`] if the object is a tree or blob,
    /// or a tag that does not lead to a commit.
    fn parse_commit(&mut self, id: Oid) -> Result<Commit>;

    /// Whether `target` is reachable from any commit in `from`.
    ///
    /// May fail with [`crate::Error::WalkLimitExceeded`] when the history
    /// that must be inspected is larger than the walk's budget.
    fn is_reachable(&mut self, target: &Commit, from: &[Commit]) -> Result<bool>;
}

impl<W: Walk + ?Sized> Walk for &mut W {
    fn mark_start(&mut self, id: Oid) -> Result<()> {
        (**self).mark_start(id)
    }

    fn mark_uninteresting(&mut self, id: Oid) -> Result<()> {
        (**self).mark_uninteresting(id)
    }

    fn next_commit(&mut self) -> Result<Option<Commit>> {
        (**self).next_commit()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn set_order(&mut self, order: WalkOrder) -> Result<()> {
        (**self).set_order(order)
    }

    fn parse_commit(&mut self, id: Oid) -> Result<Commit> {
        (**self).parse_commit(id)
    }

    fn is_reachable(&mut self, target: &Commit, from: &[Commit]) -> Result<bool> {
        (**self).is_reachable(target, from)
    }
}
