//! Resolve a request path into revisions and a tree path.

use anyhow::Result;
use gitscope_core::{AccessControl, ExpressionParser, Revision, VisibilityGate};
use gitscope_git::{ObjectReader, Walk};
use serde::Serialize;

/// A resolved request path.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveResult {
    pub repository: String,
    pub revision: Revision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_revision: Option<Revision>,
    pub path: String,
}

/// Service for resolving request paths.
pub struct ResolveService<'a, R: ObjectReader + ?Sized> {
    repo: &'a R,
    access: &'a dyn AccessControl,
    gate: &'a VisibilityGate,
}

impl<'a, R: ObjectReader + ?Sized> ResolveService<'a, R> {
    pub const fn new(repo: &'a R, access: &'a dyn AccessControl, gate: &'a VisibilityGate) -> Self {
        Self { repo, access, gate }
    }

    /// Resolve `path`; `None` if it names nothing the principal may see.
    pub fn resolve<W: Walk + ?Sized>(&self, walk: &mut W, path: &str) -> Result<Option<ResolveResult>> {
        let parser = ExpressionParser::new(self.repo, self.access, self.gate);
        let Some(parsed) = parser.parse(walk, path)? else {
            return Ok(None);
        };

        Ok(Some(ResolveResult {
            repository: self.repo.name().to_owned(),
            revision: parsed.revision().clone(),
            old_revision: parsed.old_revision().cloned(),
            path: parsed.path_remainder().to_owned(),
        }))
    }
}
