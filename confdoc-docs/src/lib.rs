//! Documentation trees for configuration schemas.
//!
//! A [`DocNode`] tree mirrors a schema's nesting and carries the comment of
//! every field under its external key. Trees are built either from a runtime
//! descriptor plus the schema's source ([`build`]) or from the source alone
//! ([`build_from_source`]), and flattened with [`render`].

mod build;
mod error;
mod node;
mod render;
mod resolve;
mod source_only;

pub use build::{build, build_with_file};
pub use error::{Error, Result};
pub use node::{DocKind, DocNode, Walk};
pub use render::{DocEntry, render, render_reference};
pub use source_only::{build_from_file, build_from_source};
