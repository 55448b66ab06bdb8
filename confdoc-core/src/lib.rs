//! Type descriptors and schema walking for confdoc.
//!
//! This crate provides the runtime half of schema introspection:
//! - [`Describe`] / [`TypeDescriptor`] - how a schema type describes its shape
//! - [`describe_record!`] - derive-style implementation for structs
//! - [`walk`] - enumerate a record's fields with their external keys
//! - [`RenameRule`] - serde `rename_all` conventions

mod descriptor;
mod error;
mod rename;
mod walker;

pub use descriptor::{Describe, DescribeFn, FieldDef, RecordDescriptor, TypeDescriptor};
pub use error::{Error, Result};
pub use rename::{RenameRule, UnknownRenameRule, to_camel_case, to_pascal_case, unraw};
pub use walker::{FieldDescriptor, FieldKind, walk, walk_record};
