//! Revision expressions embedded in URL paths.
//!
//! A request path such as `/release/42..main/src/lib.rs` mixes a revision
//! expression with a tree path, and both may contain slashes. The parser
//! walks the path segment by segment, growing a candidate name until it
//! resolves; the first candidate that resolves wins and everything after it
//! is tree path. Two operators are recognised while no range has been
//! seen yet:
//!
//! - `a..b` — the range from `a` to `b`.
//! - `a^!` — the commit `a` against its first parent. Must end the path:
//!   no tree path may follow it.
//!
//! Reflog (`@`), tracking (`@{u}`), type-cast (`^{tree}`) and path (`:`)
//! syntax is rejected so the grammar stays unambiguous.
//!
//! Every way a path can fail, including naming an object the principal may
//! not see, yields the same `None`.

use gitscope_git::{ObjectId, ObjectKind, ObjectReader, Walk};
use tracing::debug;

use crate::access::AccessControl;
use crate::error::Result;
use crate::revision::Revision;
use crate::visibility::VisibilityGate;

/// The revision part of a path, and where the tree path starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedExpression {
    revision: Revision,
    old_revision: Option<Revision>,
    path_start: usize,
    path_remainder: String,
}

impl ParsedExpression {
    fn new(
        revision: Revision,
        old_revision: Option<Revision>,
        path_start: usize,
        path: &str,
    ) -> Self {
        let path_remainder = path
            .get(path_start..)
            .unwrap_or("")
            .trim_start_matches('/')
            .to_owned();
        Self {
            revision,
            old_revision,
            path_start,
            path_remainder,
        }
    }

    /// The revision the request is about; the new side of a range.
    #[must_use]
    pub const fn revision(&self) -> &Revision {
        &self.revision
    }

    /// The old side of a range or `^!` expression. [`Revision::null`] when
    /// the new side is a root commit.
    #[must_use]
    pub const fn old_revision(&self) -> Option<&Revision> {
        self.old_revision.as_ref()
    }

    /// Byte offset, in the path without its leading `/`, just past the
    /// revision expression.
    #[must_use]
    pub const fn path_start(&self) -> usize {
        self.path_start
    }

    /// Tree path following the revision expression, without leading `/`.
    #[must_use]
    pub fn path_remainder(&self) -> &str {
        &self.path_remainder
    }

    #[must_use]
    pub const fn is_range(&self) -> bool {
        self.old_revision.is_some()
    }
}

/// Splits request paths into revisions and tree paths.
pub struct ExpressionParser<'a, R: ObjectReader + ?Sized> {
    repo: &'a R,
    access: &'a dyn AccessControl,
    gate: &'a VisibilityGate,
}

impl<'a, R: ObjectReader + ?Sized> ExpressionParser<'a, R> {
    pub const fn new(repo: &'a R, access: &'a dyn AccessControl, gate: &'a VisibilityGate) -> Self {
        Self { repo, access, gate }
    }

    /// Parse `path`, which may start with a single `/`.
    ///
    /// Returns `None` if the path is malformed, names nothing, or names
    /// something the principal may not see.
    ///
    /// # Errors
    /// Returns error only if the repository cannot be read.
    pub fn parse<W: Walk + ?Sized>(
        &self,
        walk: &mut W,
        path: &str,
    ) -> Result<Option<ParsedExpression>> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut name = String::new();
        let mut old_revision: Option<Revision> = None;

        for segment in path.split('/') {
            if segment.is_empty() {
                debug!(path, "empty path segment");
                return Ok(None);
            }

            let mut part = segment;
            if old_revision.is_none() {
                let dots = part.find("..");
                let first_parent = part.find("^!");
                if dots == Some(0) || first_parent == Some(0) {
                    debug!(path, segment, "operator without a left side");
                    return Ok(None);
                }

                if let Some(dots) = dots {
                    name.push_str(&part[..dots]);
                    let Some(old) = self.resolve(&name)? else {
                        return Ok(None);
                    };
                    old_revision = Some(old);
                    part = &part[dots + 2..];
                    name.clear();
                } else if let Some(first_parent) = first_parent {
                    if first_parent != part.len() - 2 {
                        debug!(path, segment, "^! must end its segment");
                        return Ok(None);
                    }
                    name.push_str(&part[..first_parent]);
                    if path.len() > name.len() + 2 {
                        debug!(path, "^! must end the path");
                        return Ok(None);
                    }
                    return self.first_parent(walk, &name, path);
                }
            }

            name.push_str(part);
            if !is_valid_name(&name) {
                debug!(path, name, "disallowed revision syntax");
                return Ok(None);
            }

            if let Some(id) = self.repo.resolve(&name)? {
                let Some(revision) = Revision::peel(name.as_str(), id, self.repo)? else {
                    return Ok(None);
                };
                let path_start = old_revision
                    .as_ref()
                    .map_or(name.len(), |old| old.name().len() + 2 + name.len());
                let parsed = ParsedExpression::new(revision, old_revision, path_start, path);
                return self.check_visible(walk, parsed);
            }

            name.push('/');
        }

        debug!(path, "no revision found in path");
        Ok(None)
    }

    /// Validate and resolve a complete name.
    fn resolve(&self, name: &str) -> Result<Option<Revision>> {
        if !is_valid_name(name) {
            debug!(name, "disallowed revision syntax");
            return Ok(None);
        }
        let Some(id) = self.repo.resolve(name)? else {
            debug!(name, "revision does not resolve");
            return Ok(None);
        };
        Revision::peel(name, id, self.repo)
    }

    /// Handle `name^!`: the commit against its first parent.
    fn first_parent<W: Walk + ?Sized>(
        &self,
        walk: &mut W,
        name: &str,
        path: &str,
    ) -> Result<Option<ParsedExpression>> {
        let Some(resolved) = self.resolve(name)? else {
            return Ok(None);
        };
        if resolved.peeled_kind() != ObjectKind::Commit {
            debug!(name, kind = %resolved.peeled_kind(), "^! needs a commit");
            return Ok(None);
        }

        let commit = walk.parse_commit(resolved.peeled_id())?;
        let old = commit.first_parent().map_or_else(Revision::null, |parent| {
            Revision::peeled(format!("{name}^"), parent)
        });
        let parsed = ParsedExpression::new(
            Revision::peeled(name, commit.id),
            Some(old),
            name.len() + 2,
            path,
        );
        self.check_visible(walk, parsed)
    }

    /// Both ends must be visible. The new end vouches for the old one.
    fn check_visible<W: Walk + ?Sized>(
        &self,
        walk: &mut W,
        parsed: ParsedExpression,
    ) -> Result<Option<ParsedExpression>> {
        let revision = parsed.revision.id();
        if !self
            .gate
            .is_visible(self.repo, walk, self.access, revision, &[])?
        {
            debug!(%revision, "revision not visible");
            return Ok(None);
        }

        if let Some(old) = parsed.old_revision.as_ref().filter(|old| !old.is_null()) {
            let old_id: ObjectId = old.id();
            if !self
                .gate
                .is_visible(self.repo, walk, self.access, old_id, &[revision])?
            {
                debug!(old = %old_id, "old revision not visible");
                return Ok(None);
            }
        }

        Ok(Some(parsed))
    }
}

/// Reject syntax that would make the URL grammar ambiguous or expose ref
/// internals: paths (`:`), type casts (`^{`) and reflog/upstream (`@`).
fn is_valid_name(name: &str) -> bool {
    !name.contains(':') && !name.contains("^{") && !name.contains('@')
}
