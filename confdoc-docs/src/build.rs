//! Doc tree building from a runtime descriptor and its source.

use confdoc_core::{FieldKind, RecordDescriptor, TypeDescriptor, walk_record};
use confdoc_source::{SourceFile, StructDecl, TypeExpr};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    node::{DocKind, DocNode},
    resolve::classify,
};

/// Build the doc tree for `descriptor`, reading comments from `source`.
///
/// `type_name` names the declaration of the root record in `source`; it may
/// be a `type` alias. Nested records are looked up in the same source.
pub fn build(descriptor: &TypeDescriptor, source: &str, type_name: &str) -> Result<DocNode> {
    let file = SourceFile::parse(source)?;
    build_with_file(descriptor, &file, type_name)
}

/// Like [`build`], reusing an already parsed file.
pub fn build_with_file(
    descriptor: &TypeDescriptor,
    file: &SourceFile,
    type_name: &str,
) -> Result<DocNode> {
    let record = descriptor
        .as_record()
        .ok_or_else(|| confdoc_core::Error::NotARecord {
            type_name: descriptor.type_name(),
        })?;

    file.require(type_name)?;
    let decl = file.resolve_struct(type_name);
    if decl.is_none() {
        warn!(type_name, "declaration has no named fields, comments will be empty");
    }

    let mut builder = Builder {
        file,
        stack: Vec::new(),
    };
    let mut root = DocNode::root(decl.and_then(|d| d.comment.clone()).unwrap_or_default());
    root.children = builder.record(record, decl)?;

    debug!(
        type_name,
        nodes = root.walk().count(),
        "built doc tree from descriptor"
    );
    Ok(root)
}

struct Builder<'a> {
    file: &'a SourceFile,
    /// Records on the current path: (identity, display name).
    stack: Vec<(&'static str, &'static str)>,
}

impl<'a> Builder<'a> {
    fn record(
        &mut self,
        record: &RecordDescriptor,
        decl: Option<&'a StructDecl>,
    ) -> Result<IndexMap<String, DocNode>> {
        if self.stack.iter().any(|(id, _)| *id == record.identity()) {
            return Err(Error::cycle(
                self.stack.iter().map(|(_, name)| *name),
                record.name(),
            ));
        }
        self.stack.push((record.identity(), record.name()));

        let mut children = IndexMap::new();
        for field in walk_record(record) {
            let source_field = decl.and_then(|d| d.field(field.declared_name));
            let comment = source_field
                .and_then(|f| f.comment.clone())
                .unwrap_or_default();
            trace!(
                record = record.name(),
                field = field.declared_name,
                key = %field.external_key,
                documented = !comment.is_empty(),
                "field"
            );

            let mut node = DocNode::new(field.external_key.clone(), comment);
            if let Some(nested) = &field.nested {
                node.kind = match field.kind {
                    FieldKind::MapOfComposite => DocKind::MapOfRecords,
                    _ => DocKind::Record,
                };
                let nested_decl = self.locate(source_field.map(|f| &f.ty), nested);
                node.children = self.record(nested, nested_decl)?;
            }

            if children.insert(node.key.clone(), node).is_some() {
                debug!(key = %field.external_key, "duplicate key, later field wins");
            }
        }

        self.stack.pop();
        Ok(children)
    }

    /// Find the declaration of a nested record, via the field's declared
    /// type first and the descriptor's name second.
    fn locate(
        &self,
        declared: Option<&'a TypeExpr>,
        nested: &RecordDescriptor,
    ) -> Option<&'a StructDecl> {
        let file = self.file;
        let found = declared
            .and_then(|ty| classify(file, ty))
            .map(|(_, decl)| decl)
            .or_else(|| file.resolve_struct(nested.name()));
        if found.is_none() {
            warn!(
                record = nested.name(),
                "declaration not found in source, nested comments will be empty"
            );
        }
        found
    }
}
