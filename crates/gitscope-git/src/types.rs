//! Value types shared by the plumbing traits.

use std::fmt;

use git2::Oid;

/// Prefix of branch refs.
pub const R_HEADS: &str = "refs/heads/";

/// Prefix of tag refs.
pub const R_TAGS: &str = "refs/tags/";

/// The four kinds of object stored in a git repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectKind {
    /// Lower-case git name of the kind, as printed by `git cat-file -t`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Tree => "tree",
            Self::Blob => "blob",
            Self::Tag => "tag",
        }
    }

    /// Map a git2 object type, which also has an `Any` wildcard.
    #[must_use]
    pub const fn from_git2(kind: git2::ObjectType) -> Option<Self> {
        match kind {
            git2::ObjectType::Commit => Some(Self::Commit),
            git2::ObjectType::Tree => Some(Self::Tree),
            git2::ObjectType::Blob => Some(Self::Blob),
            git2::ObjectType::Tag => Some(Self::Tag),
            git2::ObjectType::Any => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference and the object it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    /// Full name, e.g. `refs/heads/main`.
    pub name: String,
    /// Object the ref directly targets.
    pub target: Oid,
    /// For annotated tags, the first non-tag object in the tag chain.
    pub peeled: Option<Oid>,
}

impl RefEntry {
    /// Create an entry for a ref that targets a non-tag object.
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        Self {
            name: name.into(),
            target,
            peeled: None,
        }
    }

    /// Create an entry for an annotated tag ref.
    pub fn peeled(name: impl Into<String>, target: Oid, peeled: Oid) -> Self {
        Self {
            name: name.into(),
            target,
            peeled: Some(peeled),
        }
    }

    /// The object a walk should start from: the peeled id if any.
    #[must_use]
    pub fn tip(&self) -> Oid {
        self.peeled.unwrap_or(self.target)
    }

    /// Whether this ref's target or peeled id is `id`.
    #[must_use]
    pub fn points_at(&self, id: Oid) -> bool {
        self.target == id || self.peeled == Some(id)
    }

    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.name.starts_with(R_HEADS)
    }

    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.name.starts_with(R_TAGS)
    }
}

/// Minimal commit view handed out by walks.
///
/// Only the graph shape (`id`, `parents`) matters to traversal; the
/// remaining fields are carried for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: Oid,
    pub parents: Vec<Oid>,
    pub summary: String,
    pub author_name: String,
    pub author_email: String,
    /// Author time in seconds since the epoch.
    pub time: i64,
    /// Author timezone offset in minutes.
    pub offset_minutes: i32,
}

impl Commit {
    /// Create a commit view with only graph information.
    #[must_use]
    pub fn bare(id: Oid, parents: Vec<Oid>) -> Self {
        Self {
            id,
            parents,
            summary: String::new(),
            author_name: String::new(),
            author_email: String::new(),
            time: 0,
            offset_minutes: 0,
        }
    }

    #[must_use]
    pub fn first_parent(&self) -> Option<Oid> {
        self.parents.first().copied()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub(crate) fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        let when = author.when();
        Self {
            id: commit.id(),
            parents: commit.parent_ids().collect(),
            summary: commit.summary().unwrap_or("").to_owned(),
            author_name: author.name().unwrap_or("unknown").to_owned(),
            author_email: author.email().unwrap_or("").to_owned(),
            time: when.seconds(),
            offset_minutes: when.offset_minutes(),
        }
    }
}

/// Order in which a walk yields commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkOrder {
    /// Parents are never shown before all their children.
    #[default]
    Topological,
    /// Newest commit time first.
    Time,
    /// Topological, ties broken by commit time.
    TopologicalTime,
    /// Oldest first.
    Reverse,
}

impl WalkOrder {
    pub(crate) fn to_git2(self) -> git2::Sort {
        match self {
            Self::Topological => git2::Sort::TOPOLOGICAL,
            Self::Time => git2::Sort::TIME,
            Self::TopologicalTime => git2::Sort::TOPOLOGICAL | git2::Sort::TIME,
            Self::Reverse => git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE,
        }
    }
}
