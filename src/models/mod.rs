//! Data models for the CMS collections.
//!
//! Field names serialize in camelCase to match the stored JSON documents and
//! the blog renderer that consumes them.

mod post;
mod tag;

pub use post::*;
pub use tag::*;
