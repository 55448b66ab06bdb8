//! Locating nested record declarations from declared field types.

use confdoc_source::{SourceFile, StructDecl, StructKind, TypeExpr};

use crate::node::DocKind;

const MAX_DEPTH: usize = 32;

/// Classify a declared type as a nested record or map of records.
///
/// Follows `type` aliases, sees through `Option`, `Box`, `Rc` and `Arc`, and
/// fans out over the value type of `HashMap`, `BTreeMap` and `IndexMap`.
/// Types that are not declared in `file` as structs with named fields are
/// leaves and yield `None`.
pub(crate) fn classify<'s>(
    file: &'s SourceFile,
    ty: &'s TypeExpr,
) -> Option<(DocKind, &'s StructDecl)> {
    classify_at(file, ty, 0)
}

fn classify_at<'s>(
    file: &'s SourceFile,
    ty: &'s TypeExpr,
    depth: usize,
) -> Option<(DocKind, &'s StructDecl)> {
    if depth > MAX_DEPTH {
        return None;
    }
    let ty = file.resolve_type(ty);
    match ty.name()? {
        "Option" | "Box" | "Rc" | "Arc" => classify_at(file, ty.args().first()?, depth + 1),
        "HashMap" | "BTreeMap" | "IndexMap" => {
            match classify_at(file, ty.args().get(1)?, depth + 1)? {
                (DocKind::Record, decl) => Some((DocKind::MapOfRecords, decl)),
                _ => None,
            }
        }
        name => file
            .resolve_struct(name)
            .filter(|decl| decl.kind == StructKind::Named)
            .map(|decl| (DocKind::Record, decl)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(src: &str, field: &str) -> Option<(DocKind, String)> {
        let file = SourceFile::parse(src).unwrap();
        let root = file.resolve_struct("Root").unwrap();
        let ty = &root.field(field).unwrap().ty;
        classify(&file, ty).map(|(kind, decl)| (kind, decl.name.clone()))
    }

    const SRC: &str = r#"
struct Root {
    plain: u8,
    nested: Inner,
    optional: Option<Box<Inner>>,
    shared: std::sync::Arc<Inner>,
    by_name: HashMap<String, Inner>,
    aliased: Alias,
    list: Vec<Inner>,
    nested_map: BTreeMap<String, HashMap<String, Inner>>,
    external: other::Thing,
    tuple: Pair,
}
struct Inner { v: u8 }
struct Pair(u8, u8);
type Alias = Option<Inner>;
"#;

    #[test]
    fn test_records_and_wrappers() {
        let record = Some((DocKind::Record, "Inner".to_string()));
        assert_eq!(kind_of(SRC, "plain"), None);
        assert_eq!(kind_of(SRC, "nested"), record);
        assert_eq!(kind_of(SRC, "optional"), record);
        assert_eq!(kind_of(SRC, "shared"), record);
        assert_eq!(kind_of(SRC, "aliased"), record);
    }

    #[test]
    fn test_maps_and_leaves() {
        assert_eq!(
            kind_of(SRC, "by_name"),
            Some((DocKind::MapOfRecords, "Inner".to_string()))
        );
        assert_eq!(kind_of(SRC, "list"), None);
        assert_eq!(kind_of(SRC, "nested_map"), None);
        assert_eq!(kind_of(SRC, "external"), None);
        assert_eq!(kind_of(SRC, "tuple"), None);
    }

    #[test]
    fn test_self_referential_alias_terminates() {
        let src = "struct Root { a: A }\ntype A = Box<A>;";
        assert_eq!(kind_of(src, "a"), None);
    }
}
