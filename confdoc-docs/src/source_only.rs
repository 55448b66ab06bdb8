//! Doc tree building from source alone.
//!
//! Field enumeration, external keys and nesting all come from the parsed
//! declarations and their serde attributes, so no runtime descriptor is
//! needed.

use confdoc_core::RenameRule;
use confdoc_source::{SourceFile, StructDecl};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::{
    error::{Error, Result},
    node::{DocKind, DocNode},
    resolve::classify,
};

/// Build the doc tree of `type_name` from `source` alone.
pub fn build_from_source(source: &str, type_name: &str) -> Result<DocNode> {
    let file = SourceFile::parse(source)?;
    build_from_file(&file, type_name)
}

/// Like [`build_from_source`], reusing an already parsed file.
pub fn build_from_file(file: &SourceFile, type_name: &str) -> Result<DocNode> {
    file.require(type_name)?;
    let Some(decl) = file.resolve_struct(type_name) else {
        warn!(type_name, "declaration has no named fields");
        return Ok(DocNode::root(""));
    };

    let mut builder = SourceBuilder {
        file,
        stack: Vec::new(),
    };
    let mut root = DocNode::root(decl.comment.clone().unwrap_or_default());
    root.children = builder.record(decl)?;

    debug!(
        type_name,
        nodes = root.walk().count(),
        "built doc tree from source"
    );
    Ok(root)
}

struct SourceBuilder<'a> {
    file: &'a SourceFile,
    stack: Vec<&'a str>,
}

impl<'a> SourceBuilder<'a> {
    fn record(&mut self, decl: &'a StructDecl) -> Result<IndexMap<String, DocNode>> {
        if self.stack.contains(&decl.name.as_str()) {
            return Err(Error::cycle(self.stack.iter().copied(), &decl.name));
        }
        self.stack.push(&decl.name);

        let rule = rename_rule(decl);
        let mut children = IndexMap::new();
        for field in &decl.fields {
            if field.serde.skip {
                trace!(record = %decl.name, field = %field.name, "skipped");
                continue;
            }
            let nested = classify(self.file, &field.ty);

            if field.serde.flatten {
                // Flattened maps contribute keys only known at runtime.
                if let Some((DocKind::Record, inner)) = nested {
                    for (key, node) in self.record(inner)? {
                        children.insert(key, node);
                    }
                }
                continue;
            }

            let key = match (field.serde.rename.as_deref(), rule) {
                (Some(rename), _) if !rename.is_empty() => rename.to_string(),
                (_, Some(rule)) => rule.apply(&field.name),
                _ => field.name.clone(),
            };
            trace!(record = %decl.name, field = %field.name, %key, "field");

            let mut node = DocNode::new(key, field.comment.clone().unwrap_or_default());
            if let Some((kind, inner)) = nested {
                node.kind = kind;
                node.children = self.record(inner)?;
            }
            if children.insert(node.key.clone(), node).is_some() {
                debug!(record = %decl.name, field = %field.name, "duplicate key, later field wins");
            }
        }

        self.stack.pop();
        Ok(children)
    }
}

fn rename_rule(decl: &StructDecl) -> Option<RenameRule> {
    let spelling = decl.serde.rename_all.as_deref()?;
    match spelling.parse() {
        Ok(rule) => Some(rule),
        Err(err) => {
            warn!(record = %decl.name, "{err}, keeping declared names");
            None
        }
    }
}
