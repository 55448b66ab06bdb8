//! Commented TOML trees for confdoc.
//!
//! A [`Node`] is a TOML value where every key can carry a comment. Nodes are
//! produced by encoding a configuration value or parsing existing TOML,
//! annotated from a doc tree with [`merge`], and written back out with
//! [`Node::to_toml_string`].

mod error;
mod merge;
mod node;
mod write;

pub use error::{Error, Result};
pub use merge::{annotate, merge};
pub use node::{Node, NodeValue};
