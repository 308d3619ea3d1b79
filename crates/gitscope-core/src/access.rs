//! Access-control seam.
//!
//! The core never interprets who a principal is; it only needs a key that
//! separates one principal's cached visibility decisions from another's.

use std::fmt;

/// Opaque identity of the principal a request is served for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalKey(String);

impl PrincipalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key shared by all unauthenticated requests.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PrincipalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_anonymous() {
            f.write_str("<anonymous>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Access-control collaborator consulted once per visibility check.
pub trait AccessControl {
    fn principal_key(&self) -> PrincipalKey;
}

/// Access control with a fixed principal.
#[derive(Debug, Clone)]
pub struct StaticAccess {
    key: PrincipalKey,
}

impl StaticAccess {
    #[must_use]
    pub const fn new(key: PrincipalKey) -> Self {
        Self { key }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(PrincipalKey::anonymous())
    }
}

impl AccessControl for StaticAccess {
    fn principal_key(&self) -> PrincipalKey {
        self.key.clone()
    }
}
