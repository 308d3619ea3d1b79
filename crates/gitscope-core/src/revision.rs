//! Resolved revision endpoints.

use std::fmt;

use gitscope_git::{ObjectId, ObjectKind, ObjectReader};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::Result;

/// Longest tag chain [`Revision::peel`] follows before giving up.
pub const MAX_TAG_DEPTH: usize = 32;

/// One resolved endpoint of a revision expression.
///
/// `peeled_kind` is never [`ObjectKind::Tag`]: tag chains are followed
/// until a non-tag object is reached. For everything but annotated tags
/// the peeled fields equal the raw ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision {
    name: String,
    id: ObjectId,
    kind: ObjectKind,
    peeled_id: ObjectId,
    peeled_kind: ObjectKind,
}

impl Revision {
    /// The "no revision" sentinel, used as the base of a root commit's
    /// diff. It stands for the empty tree.
    #[must_use]
    pub fn null() -> Self {
        Self {
            name: String::new(),
            id: ObjectId::zero(),
            kind: ObjectKind::Tree,
            peeled_id: ObjectId::zero(),
            peeled_kind: ObjectKind::Tree,
        }
    }

    /// A revision known to name a commit.
    pub fn peeled(name: impl Into<String>, commit: ObjectId) -> Self {
        Self {
            name: name.into(),
            id: commit,
            kind: ObjectKind::Commit,
            peeled_id: commit,
            peeled_kind: ObjectKind::Commit,
        }
    }

    /// Look up `id` and follow any tag chain it starts.
    ///
    /// Returns `None` if the object or any link of the chain is missing,
    /// or the chain is longer than [`MAX_TAG_DEPTH`].
    ///
    /// # Errors
    /// Returns error if the object database cannot be read.
    pub fn peel<R>(name: impl Into<String>, id: ObjectId, reader: &R) -> Result<Option<Self>>
    where
        R: ObjectReader + ?Sized,
    {
        let Some(kind) = reader.object_kind(id)? else {
            return Ok(None);
        };

        let mut peeled_id = id;
        let mut peeled_kind = kind;
        let mut depth = 0;
        while peeled_kind == ObjectKind::Tag {
            depth += 1;
            if depth > MAX_TAG_DEPTH {
                debug!(%id, "tag chain too deep");
                return Ok(None);
            }
            let Some((target, target_kind)) = reader.tag_target(peeled_id)? else {
                return Ok(None);
            };
            peeled_id = target;
            peeled_kind = target_kind;
        }

        Ok(Some(Self {
            name: name.into(),
            id,
            kind,
            peeled_id,
            peeled_kind,
        }))
    }

    /// The expression text this revision was resolved from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[must_use]
    pub const fn peeled_id(&self) -> ObjectId {
        self.peeled_id
    }

    #[must_use]
    pub const fn peeled_kind(&self) -> ObjectKind {
        self.peeled_kind
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.id.is_zero()
    }

    /// First seven hex digits of the id.
    #[must_use]
    pub fn short_id(&self) -> String {
        let hex = self.id.to_string();
        hex.get(..7).unwrap_or(&hex).to_owned()
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            f.write_str(&self.name)
        }
    }
}

impl Serialize for Revision {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Revision", 5)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("id", &self.id.to_string())?;
        s.serialize_field("type", self.kind.as_str())?;
        s.serialize_field("peeled_id", &self.peeled_id.to_string())?;
        s.serialize_field("peeled_type", self.peeled_kind.as_str())?;
        s.end()
    }
}
