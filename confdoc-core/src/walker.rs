//! Schema walking over runtime descriptors.

use crate::{
    Error, Result,
    descriptor::{RecordDescriptor, TypeDescriptor},
};

/// How the walker classifies a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Anything the doc tree does not recurse into.
    Primitive,
    /// A nested record.
    Composite,
    /// `Option<Record>`.
    PointerToComposite,
    /// A keyed container whose values are records.
    MapOfComposite,
}

/// One declared field, as seen through the runtime descriptor.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub declared_name: &'static str,
    pub external_key: String,
    pub kind: FieldKind,
    /// The nested record for non-primitive kinds.
    pub nested: Option<RecordDescriptor>,
}

/// Enumerate the fields of a record descriptor in declaration order.
pub fn walk(descriptor: &TypeDescriptor) -> Result<Vec<FieldDescriptor>> {
    let record = descriptor.as_record().ok_or_else(|| Error::NotARecord {
        type_name: descriptor.type_name(),
    })?;
    Ok(walk_record(record))
}

/// Enumerate the fields of a record in declaration order.
pub fn walk_record(record: &RecordDescriptor) -> Vec<FieldDescriptor> {
    record
        .fields()
        .iter()
        .map(|field| {
            let external_key = match (field.explicit_key(), record.rename_rule()) {
                (Some(key), _) => key.to_string(),
                (None, Some(rule)) => rule.apply(field.name()),
                (None, None) => field.name().to_string(),
            };
            let (kind, nested) = classify(field.describe_type());

            FieldDescriptor {
                declared_name: field.name(),
                external_key,
                kind,
                nested,
            }
        })
        .collect()
}

const MAX_DEPTH: usize = 32;

fn classify(ty: TypeDescriptor) -> (FieldKind, Option<RecordDescriptor>) {
    match classify_at(ty, 0) {
        Some((kind, record)) => (kind, Some(record)),
        None => (FieldKind::Primitive, None),
    }
}

/// Sees through any number of `Option`s and fans out over map values whose
/// type is a record, optionally wrapped.
fn classify_at(ty: TypeDescriptor, depth: usize) -> Option<(FieldKind, RecordDescriptor)> {
    if depth > MAX_DEPTH {
        return None;
    }
    match ty {
        TypeDescriptor::Record(record) => Some((FieldKind::Composite, record)),
        TypeDescriptor::Optional(inner) => match classify_at(inner(), depth + 1)? {
            (FieldKind::Composite, record) => Some((FieldKind::PointerToComposite, record)),
            found => Some(found),
        },
        TypeDescriptor::Map(value) => match classify_at(value(), depth + 1)? {
            (FieldKind::Composite | FieldKind::PointerToComposite, record) => {
                Some((FieldKind::MapOfComposite, record))
            }
            _ => None,
        },
        TypeDescriptor::Primitive(_) | TypeDescriptor::Sequence(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::{Describe, FieldDef, RenameRule, describe_record};

    #[allow(dead_code)]
    struct Inner {
        value: i64,
    }

    describe_record!(Inner { value: i64 });

    #[allow(dead_code)]
    struct Outer {
        debug: bool,
        inner: Inner,
        maybe: Option<Inner>,
        boxed: Box<Inner>,
        by_name: HashMap<String, Inner>,
        sorted: BTreeMap<String, i64>,
        list: Vec<Inner>,
        maybe_count: Option<u32>,
    }

    describe_record!(Outer {
        debug: bool => "debug",
        inner: Inner => "in",
        maybe: Option<Inner>,
        boxed: Box<Inner>,
        by_name: HashMap<String, Inner> => "by-name",
        sorted: BTreeMap<String, i64>,
        list: Vec<Inner>,
        maybe_count: Option<u32>,
    });

    #[test]
    fn test_walk_declaration_order_and_keys() {
        let fields = walk(&Outer::describe()).unwrap();
        let keys: Vec<_> = fields.iter().map(|f| f.external_key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["debug", "in", "maybe", "boxed", "by-name", "sorted", "list", "maybe_count"]
        );
        assert_eq!(fields[1].declared_name, "inner");
    }

    #[test]
    fn test_walk_classification() {
        let fields = walk(&Outer::describe()).unwrap();
        let kinds: Vec<_> = fields.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::Primitive,
                FieldKind::Composite,
                FieldKind::PointerToComposite,
                FieldKind::Composite,
                FieldKind::MapOfComposite,
                FieldKind::Primitive,
                FieldKind::Primitive,
                FieldKind::Primitive,
            ]
        );
        assert_eq!(fields[4].nested.as_ref().map(|r| r.name()), Some("Inner"));
        assert!(fields[0].nested.is_none());
    }

    #[allow(dead_code)]
    struct Wrapped {
        optional_map: Option<HashMap<String, Inner>>,
        map_of_optional: BTreeMap<String, Option<Inner>>,
        double: Option<Option<Inner>>,
        map_of_maps: HashMap<String, HashMap<String, Inner>>,
    }

    describe_record!(Wrapped {
        optional_map: Option<HashMap<String, Inner>>,
        map_of_optional: BTreeMap<String, Option<Inner>>,
        double: Option<Option<Inner>>,
        map_of_maps: HashMap<String, HashMap<String, Inner>>,
    });

    #[test]
    fn test_walk_sees_through_optional_maps() {
        let fields = walk(&Wrapped::describe()).unwrap();
        let kinds: Vec<_> = fields.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FieldKind::MapOfComposite,
                FieldKind::MapOfComposite,
                FieldKind::PointerToComposite,
                FieldKind::Primitive,
            ]
        );
        assert_eq!(fields[0].nested.as_ref().map(|r| r.name()), Some("Inner"));
        assert_eq!(fields[1].nested.as_ref().map(|r| r.name()), Some("Inner"));
        assert!(fields[3].nested.is_none());
    }

    #[test]
    fn test_walk_rejects_non_records() {
        let err = walk(&u32::describe()).unwrap_err();
        assert!(matches!(err, Error::NotARecord { ref type_name } if type_name == "u32"));

        let err = walk(&<Option<Inner>>::describe()).unwrap_err();
        assert_eq!(err.to_string(), "'Option<Inner>' is not a record type");
    }

    #[test]
    fn test_walk_applies_rename_all_to_unannotated_fields() {
        let record = RecordDescriptor::new("Pool")
            .field(FieldDef::new("max_connections", u32::describe))
            .field(FieldDef::new("idle_timeout", u64::describe).rename("idle"))
            .rename_all(RenameRule::Camel);
        let fields = walk(&TypeDescriptor::Record(record)).unwrap();
        assert_eq!(fields[0].external_key, "maxConnections");
        assert_eq!(fields[1].external_key, "idle");
    }

    #[test]
    fn test_walk_is_shallow_for_self_references() {
        fn node() -> TypeDescriptor {
            TypeDescriptor::Record(
                RecordDescriptor::new("Node").field(FieldDef::new(
                    "next",
                    || TypeDescriptor::Optional(node),
                )),
            )
        }

        let fields = walk(&node()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, FieldKind::PointerToComposite);
    }
}
