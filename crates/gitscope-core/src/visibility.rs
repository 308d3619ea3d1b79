//! Object visibility by ref reachability.
//!
//! An object may be shown to a principal only if it is the tip of a ref or
//! a commit reachable from one. Callers that want to show trees, blobs or
//! tags must prove visibility through the commit that reaches them.

use std::collections::BTreeSet;
use std::sync::Arc;

use gitscope_git::{Commit, Error as GitError, ObjectId, ObjectReader, RefEntry, Walk};
use tracing::{debug, trace, warn};

use crate::access::AccessControl;
use crate::cache::{CacheKey, VisibilityCache};
use crate::config::VisibilityConfig;
use crate::error::Result;

/// Decides whether an object id may be disclosed.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    cache: Arc<VisibilityCache>,
    hidden_ref_prefixes: Vec<String>,
}

impl VisibilityGate {
    /// Create a gate over a shared cache, hiding `refs/changes/`.
    #[must_use]
    pub fn new(cache: Arc<VisibilityCache>) -> Self {
        Self {
            cache,
            hidden_ref_prefixes: VisibilityConfig::default().hidden_ref_prefixes,
        }
    }

    /// Create a gate and its cache from configuration.
    #[must_use]
    pub fn from_config(config: &VisibilityConfig) -> Self {
        Self {
            cache: Arc::new(VisibilityCache::from_config(config)),
            hidden_ref_prefixes: config.hidden_ref_prefixes.clone(),
        }
    }

    /// Replace the ref prefixes that never count as proof of visibility.
    #[must_use]
    pub fn with_hidden_ref_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.hidden_ref_prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &VisibilityCache {
        &self.cache
    }

    /// Whether `id` may be shown to the principal of `access`.
    ///
    /// `known_reachable` are ids the caller already shows and that are
    /// cheap to relate to `id`, like the other end of a diff. They are
    /// tried before any ref.
    ///
    /// Ref tips are visible without consulting the cache. Everything else
    /// is cached per principal, repository and id. A reachability test
    /// that runs out of budget counts as not visible.
    ///
    /// # Errors
    /// Returns error if refs or objects cannot be read.
    pub fn is_visible<R, W>(
        &self,
        repo: &R,
        walk: &mut W,
        access: &dyn AccessControl,
        id: ObjectId,
        known_reachable: &[ObjectId],
    ) -> Result<bool>
    where
        R: ObjectReader + ?Sized,
        W: Walk + ?Sized,
    {
        if !repo.refs_pointing_at(id)?.is_empty() {
            trace!(%id, "object is a ref tip");
            return Ok(true);
        }

        let key = CacheKey::new(access.principal_key(), repo.name(), id);
        self.cache
            .get_or_compute(key, || self.compute(repo, walk, id, known_reachable))
    }

    fn compute<R, W>(
        &self,
        repo: &R,
        walk: &mut W,
        id: ObjectId,
        known_reachable: &[ObjectId],
    ) -> Result<bool>
    where
        R: ObjectReader + ?Sized,
        W: Walk + ?Sized,
    {
        let commit = match walk.parse_commit(id) {
            Ok(commit) => commit,
            Err(GitError::NotACommit(_) | GitError::ObjectNotFound(_)) => {
                debug!(%id, "not a commit, hidden");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let refs = repo.list_refs()?;
        let buckets = [
            ("known", known_reachable.iter().copied().collect()),
            ("branches", tips(&refs, RefEntry::is_branch)),
            ("tags", tips(&refs, RefEntry::is_tag)),
            ("other", tips(&refs, |r| self.is_other(r))),
        ];

        for (bucket, starts) in buckets {
            match reachable_from(walk, &commit, &starts) {
                Ok(true) => {
                    debug!(%id, bucket, "reachable");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(GitError::WalkLimitExceeded(limit)) => {
                    warn!(%id, bucket, limit, "reachability budget exhausted, hiding object");
                    return Ok(false);
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!(%id, "not reachable from any ref");
        Ok(false)
    }

    /// Refs outside heads and tags that are not in a hidden namespace.
    fn is_other(&self, r: &RefEntry) -> bool {
        !r.is_branch()
            && !r.is_tag()
            && !self
                .hidden_ref_prefixes
                .iter()
                .any(|prefix| r.name.starts_with(prefix.as_str()))
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(Arc::new(VisibilityCache::default()))
    }
}

fn tips(refs: &[RefEntry], filter: impl Fn(&RefEntry) -> bool) -> BTreeSet<ObjectId> {
    refs.iter().filter(|r| filter(r)).map(RefEntry::tip).collect()
}

/// Whether `commit` is reachable from any of `starts`; starts that are not
/// commits are ignored.
fn reachable_from<W>(
    walk: &mut W,
    commit: &Commit,
    starts: &BTreeSet<ObjectId>,
) -> gitscope_git::Result<bool>
where
    W: Walk + ?Sized,
{
    if starts.is_empty() {
        return Ok(false);
    }

    let mut from = Vec::with_capacity(starts.len());
    for id in starts {
        match walk.parse_commit(*id) {
            Ok(c) => from.push(c),
            Err(GitError::NotACommit(_) | GitError::ObjectNotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }
    if from.is_empty() {
        return Ok(false);
    }
    walk.is_reachable(commit, &from)
}
