//! git2-backed implementation of [`Walk`].

use git2::{ErrorCode, Oid};
use tracing::warn;

use crate::error::{Error, Result};
use crate::traits::Walk;
use crate::types::{Commit, ObjectKind, WalkOrder};

/// Commit walk over a git2 repository.
///
/// Created by [`crate::Repository::walk`]. Reachability tests run on a
/// separate internal revwalk, so they do not disturb the main cursor.
pub struct RevWalk<'r> {
    repo: &'r git2::Repository,
    inner: git2::Revwalk<'r>,
    order: WalkOrder,
    reachability_limit: usize,
}

impl<'r> RevWalk<'r> {
    pub(crate) fn new(repo: &'r git2::Repository, reachability_limit: usize) -> Result<Self> {
        let order = WalkOrder::default();
        let mut inner = repo.revwalk()?;
        inner.set_sorting(order.to_git2())?;
        Ok(Self {
            repo,
            inner,
            order,
            reachability_limit,
        })
    }

    /// Commits a single reachability test may visit.
    #[must_use]
    pub const fn reachability_limit(&self) -> usize {
        self.reachability_limit
    }
}

impl Walk for RevWalk<'_> {
    fn mark_start(&mut self, id: Oid) -> Result<()> {
        Ok(self.inner.push(id)?)
    }

    fn mark_uninteresting(&mut self, id: Oid) -> Result<()> {
        Ok(self.inner.hide(id)?)
    }

    fn next_commit(&mut self) -> Result<Option<Commit>> {
        let Some(id) = self.inner.next() else {
            return Ok(None);
        };
        let commit = self.repo.find_commit(id?)?;
        Ok(Some(Commit::from_git2(&commit)))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.inner.set_sorting(self.order.to_git2())?;
        Ok(())
    }

    fn set_order(&mut self, order: WalkOrder) -> Result<()> {
        self.order = order;
        Ok(self.inner.set_sorting(order.to_git2())?)
    }

    fn parse_commit(&mut self, id: Oid) -> Result<Commit> {
        let object = match self.repo.find_object(id, None) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => return Err(Error::ObjectNotFound(id)),
            Err(e) => return Err(e.into()),
        };

        let commit = match object.kind().and_then(ObjectKind::from_git2) {
            Some(ObjectKind::Commit) => object.into_commit().map_err(|_| Error::NotACommit(id))?,
            Some(ObjectKind::Tag) => object
                .peel_to_commit()
                .map_err(|_| Error::NotACommit(id))?,
            _ => return Err(Error::NotACommit(id)),
        };
        Ok(Commit::from_git2(&commit))
    }

    fn is_reachable(&mut self, target: &Commit, from: &[Commit]) -> Result<bool> {
        if from.iter().any(|c| c.id == target.id) {
            return Ok(true);
        }
        if from.is_empty() {
            return Ok(false);
        }

        let mut walk = self.repo.revwalk()?;
        for start in from {
            walk.push(start.id)?;
        }

        let mut visited = 0usize;
        for id in walk {
            if id? == target.id {
                return Ok(true);
            }
            visited += 1;
            if visited >= self.reachability_limit {
                warn!(
                    target = %target.id,
                    limit = self.reachability_limit,
                    "reachability walk exhausted its budget"
                );
                return Err(Error::WalkLimitExceeded(self.reachability_limit));
            }
        }
        Ok(false)
    }
}

impl std::fmt::Debug for RevWalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevWalk")
            .field("order", &self.order)
            .field("reachability_limit", &self.reachability_limit)
            .finish_non_exhaustive()
    }
}
