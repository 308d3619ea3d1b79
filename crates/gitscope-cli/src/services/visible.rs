//! Visibility checks for raw object ids.

use anyhow::{Result, bail};
use gitscope_core::{AccessControl, VisibilityGate};
use gitscope_git::{ObjectId, ObjectReader, Walk};

/// Shortest abbreviation accepted for an object id.
const MIN_ABBREV: usize = 4;

/// Service answering "may this principal see this object?".
pub struct VisibleService<'a, R: ObjectReader + ?Sized> {
    repo: &'a R,
    access: &'a dyn AccessControl,
    gate: &'a VisibilityGate,
}

impl<'a, R: ObjectReader + ?Sized> VisibleService<'a, R> {
    pub const fn new(repo: &'a R, access: &'a dyn AccessControl, gate: &'a VisibilityGate) -> Self {
        Self { repo, access, gate }
    }

    /// Look up an id given as hex, full or abbreviated.
    ///
    /// Ref names are refused so the answer is about the object, never
    /// about whatever a name happens to point at.
    pub fn lookup(&self, hex: &str) -> Result<Option<ObjectId>> {
        if hex.len() < MIN_ABBREV || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("'{hex}' is not an object id");
        }
        Ok(self.repo.resolve(hex)?)
    }

    /// Whether the object `hex` names exists and may be shown.
    ///
    /// Missing and hidden objects both answer `false`.
    pub fn check<W: Walk + ?Sized>(&self, walk: &mut W, hex: &str) -> Result<bool> {
        let Some(id) = self.lookup(hex)? else {
            return Ok(false);
        };
        Ok(self.gate.is_visible(self.repo, walk, self.access, id, &[])?)
    }
}
