//! # gitscope-core
//!
//! Request-resolution core of the gitscope repository browser.
//!
//! - [`ExpressionParser`] splits a URL path into revisions and a tree path.
//! - [`VisibilityGate`] decides, per principal, whether an object may be
//!   shown, caching decisions in a shared [`VisibilityCache`].
//! - [`Paginator`] turns a configured commit walk into cursor-based pages.

pub mod access;
pub mod cache;
pub mod config;
pub mod error;
pub mod paginator;
pub mod parser;
pub mod revision;
pub mod ring_buffer;
pub mod visibility;

#[cfg(test)]
mod test_mocks;

pub use access::{AccessControl, PrincipalKey, StaticAccess};
pub use cache::{CacheKey, VisibilityCache};
pub use config::Config;
pub use error::{Error, Result};
pub use paginator::Paginator;
pub use parser::{ExpressionParser, ParsedExpression};
pub use revision::Revision;
pub use ring_buffer::RingBuffer;
pub use visibility::VisibilityGate;
