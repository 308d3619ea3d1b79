//! Log service for paging through the history a request path names.
//!
//! `/main` pages through everything reachable from `main`; `/a..b` and
//! `/c^!` page through what the new side adds over the old one.

use anyhow::{Result, bail};
use chrono::{DateTime, FixedOffset};
use gitscope_core::{AccessControl, ExpressionParser, Paginator, Revision, VisibilityGate};
use gitscope_git::{Commit, ObjectId, ObjectKind, ObjectReader, Walk};
use serde::Serialize;

/// Information about a single commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub id: String,
    pub summary: String,
    pub author: String,
    /// Author time in RFC 3339, in the author's own offset.
    pub time: Option<String>,
}

impl From<&Commit> for CommitInfo {
    fn from(commit: &Commit) -> Self {
        let time = FixedOffset::east_opt(commit.offset_minutes * 60).and_then(|offset| {
            DateTime::from_timestamp(commit.time, 0).map(|t| t.with_timezone(&offset).to_rfc3339())
        });
        Self {
            id: commit.id.to_string(),
            summary: commit.summary.clone(),
            author: commit.author_name.clone(),
            time,
        }
    }
}

/// One page of history.
#[derive(Debug, Clone, Serialize)]
pub struct LogPage {
    pub revision: Revision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_revision: Option<Revision>,
    pub commits: Vec<CommitInfo>,
    /// Start of the previous page.
    pub previous: Option<String>,
    /// Start of the next page.
    pub next: Option<String>,
}

/// Service for paging through history.
pub struct LogService<'a, R: ObjectReader + ?Sized> {
    repo: &'a R,
    access: &'a dyn AccessControl,
    gate: &'a VisibilityGate,
}

impl<'a, R: ObjectReader + ?Sized> LogService<'a, R> {
    pub const fn new(repo: &'a R, access: &'a dyn AccessControl, gate: &'a VisibilityGate) -> Self {
        Self { repo, access, gate }
    }

    /// Resolve `path` and emit the page of `limit` commits starting at
    /// `start`, or at the newest commit.
    ///
    /// Returns `None` if the path names nothing the principal may see.
    pub fn page<W: Walk>(
        &self,
        mut walk: W,
        path: &str,
        limit: usize,
        start: Option<ObjectId>,
    ) -> Result<Option<LogPage>> {
        let parser = ExpressionParser::new(self.repo, self.access, self.gate);
        let Some(parsed) = parser.parse(&mut walk, path)? else {
            return Ok(None);
        };

        let revision = parsed.revision();
        if revision.peeled_kind() != ObjectKind::Commit {
            bail!("{revision} is a {}, not a commit", revision.peeled_kind());
        }

        walk.reset()?;
        walk.mark_start(revision.peeled_id())?;
        if let Some(old) = parsed.old_revision().filter(|old| !old.is_null()) {
            if old.peeled_kind() != ObjectKind::Commit {
                bail!("{old} is a {}, not a commit", old.peeled_kind());
            }
            walk.mark_uninteresting(old.peeled_id())?;
        }

        let mut paginator = Paginator::new(walk, limit, start)?;
        let commits = paginator
            .by_ref()
            .map(|c| c.map(|c| CommitInfo::from(&c)))
            .collect::<gitscope_core::Result<Vec<_>>>()?;

        Ok(Some(LogPage {
            revision: revision.clone(),
            old_revision: parsed.old_revision().cloned(),
            commits,
            previous: paginator.previous_cursor().map(|id| id.to_string()),
            next: paginator.next_cursor().map(|id| id.to_string()),
        }))
    }
}
