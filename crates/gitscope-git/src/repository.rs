//! Repository wrapper implementing [`ObjectReader`] over git2.

use std::path::Path;

use git2::{ErrorClass, ErrorCode, Oid, ReferenceType};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::ObjectReader;
use crate::types::{ObjectKind, RefEntry};
use crate::walk::RevWalk;

/// Commits a single reachability test may visit by default.
pub const DEFAULT_REACHABILITY_LIMIT: usize = 100_000;

/// Read-only handle on a git repository served under a name.
pub struct Repository {
    inner: git2::Repository,
    name: String,
    reachability_limit: usize,
}

impl Repository {
    /// Open a repository at the given path, or any parent of it.
    ///
    /// The repository is named after its directory.
    ///
    /// # Errors
    /// Returns `NotARepository` if no repository is found.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                Error::NotARepository
            } else {
                Error::Git2(e)
            }
        })?;
        let name = default_name(&inner);
        Ok(Self {
            inner,
            name,
            reachability_limit: DEFAULT_REACHABILITY_LIMIT,
        })
    }

    /// Open a repository and serve it under an explicit name.
    ///
    /// # Errors
    /// Returns `NotARepository` if no repository is found.
    pub fn open_named(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let mut repo = Self::open(path)?;
        repo.name = name.into();
        Ok(repo)
    }

    /// Set the budget of commits a reachability test may visit.
    #[must_use]
    pub const fn with_reachability_limit(mut self, limit: usize) -> Self {
        self.reachability_limit = limit;
        self
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Start a new commit walk. Each request should own its own walk.
    ///
    /// # Errors
    /// Returns error if the walk cannot be allocated.
    pub fn walk(&self) -> Result<RevWalk<'_>> {
        RevWalk::new(&self.inner, self.reachability_limit)
    }

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer the trait methods.
    #[must_use]
    pub const fn inner(&self) -> &git2::Repository {
        &self.inner
    }

    fn to_entry(&self, reference: &git2::Reference<'_>) -> Result<Option<RefEntry>> {
        let Some(name) = reference.name() else {
            return Ok(None);
        };
        if name == "HEAD" {
            return Ok(None);
        }

        let symbolic;
        let resolved = if reference.kind() == Some(ReferenceType::Symbolic) {
            symbolic = match reference.resolve() {
                Ok(r) => r,
                Err(e) => {
                    debug!(reference = name, error = %e, "skipping dangling symbolic ref");
                    return Ok(None);
                }
            };
            &symbolic
        } else {
            reference
        };
        let Some(target) = resolved.target() else {
            return Ok(None);
        };

        if self.object_kind(target)? == Some(ObjectKind::Tag) {
            let peeled = resolved.peel(git2::ObjectType::Any)?.id();
            Ok(Some(RefEntry::peeled(name, target, peeled)))
        } else {
            Ok(Some(RefEntry::new(name, target)))
        }
    }
}

impl ObjectReader for Repository {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, name: &str) -> Result<Option<Oid>> {
        match self.inner.revparse_single(name) {
            Ok(object) => Ok(Some(object.id())),
            Err(e) if is_unresolvable(&e) => {
                debug!(name, error = %e, "name did not resolve");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn object_kind(&self, id: Oid) -> Result<Option<ObjectKind>> {
        match self.inner.find_object(id, None) {
            Ok(object) => Ok(object.kind().and_then(ObjectKind::from_git2)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn tag_target(&self, id: Oid) -> Result<Option<(Oid, ObjectKind)>> {
        if self.object_kind(id)? != Some(ObjectKind::Tag) {
            return Ok(None);
        }
        let tag = self.inner.find_tag(id)?;
        Ok(tag
            .target_type()
            .and_then(ObjectKind::from_git2)
            .map(|kind| (tag.target_id(), kind)))
    }

    fn list_refs(&self) -> Result<Vec<RefEntry>> {
        let mut refs = Vec::new();
        for reference in self.inner.references()? {
            if let Some(entry) = self.to_entry(&reference?)? {
                refs.push(entry);
            }
        }
        Ok(refs)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("name", &self.name)
            .field("path", &self.git_dir())
            .finish_non_exhaustive()
    }
}

/// Errors from revparse that mean "no such revision" rather than a
/// storage failure.
fn is_unresolvable(e: &git2::Error) -> bool {
    matches!(
        e.code(),
        ErrorCode::NotFound | ErrorCode::Ambiguous | ErrorCode::InvalidSpec | ErrorCode::Invalid
    ) || matches!(
        e.class(),
        ErrorClass::Reference | ErrorClass::Object | ErrorClass::Invalid
    )
}

/// Directory name of the work tree, or of the git dir for bare
/// repositories, without a `.git` suffix.
fn default_name(repo: &git2::Repository) -> String {
    let dir = repo.workdir().unwrap_or_else(|| repo.path());
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".git").map_or_else(|| name.clone(), str::to_owned)
}
