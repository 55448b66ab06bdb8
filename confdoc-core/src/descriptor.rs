//! Runtime type descriptors.
//!
//! Rust has no runtime reflection, so a schema type describes itself through
//! the [`Describe`] trait. Records list their fields in declaration order;
//! container types point at their element type through a function pointer
//! so that self-referential schemas can be described without recursing at
//! construction time.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    path::PathBuf,
    rc::Rc,
    sync::Arc,
};

use indexmap::IndexMap;

use crate::rename::{RenameRule, unraw};

/// Lazily produces the descriptor of a nested type.
pub type DescribeFn = fn() -> TypeDescriptor;

/// A type that can describe its own shape at runtime.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

/// Shape of a schema type.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    /// Scalars and anything the walker never recurses into.
    Primitive(&'static str),
    /// A struct with named fields.
    Record(RecordDescriptor),
    /// `Option<T>`.
    Optional(DescribeFn),
    /// `Vec<T>` and other sequences.
    Sequence(DescribeFn),
    /// Keyed containers; the function describes the value type.
    Map(DescribeFn),
}

impl TypeDescriptor {
    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::Primitive(name) => (*name).to_string(),
            Self::Record(record) => record.name().to_string(),
            Self::Optional(inner) => format!("Option<{}>", inner().type_name()),
            Self::Sequence(inner) => format!("Vec<{}>", inner().type_name()),
            Self::Map(value) => format!("Map<_, {}>", value().type_name()),
        }
    }

    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}

/// Descriptor of a struct-like type.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    name: &'static str,
    path: &'static str,
    fields: Vec<FieldDef>,
    rename_all: Option<RenameRule>,
}

impl RecordDescriptor {
    /// Create a record descriptor. The identity path defaults to `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            path: name,
            fields: Vec::new(),
            rename_all: None,
        }
    }

    /// Set the identity path (usually `std::any::type_name::<T>()`).
    pub fn path(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn rename_all(mut self, rule: RenameRule) -> Self {
        self.rename_all = Some(rule);
        self
    }

    pub fn rename_all_opt(mut self, rule: Option<RenameRule>) -> Self {
        self.rename_all = rule;
        self
    }

    /// The declared type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity used to detect a record reappearing on a recursion path.
    pub fn identity(&self) -> &'static str {
        self.path
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn rename_rule(&self) -> Option<RenameRule> {
        self.rename_all
    }
}

/// A declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: &'static str,
    rename: Option<&'static str>,
    ty: DescribeFn,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: DescribeFn) -> Self {
        Self {
            name: unraw(name),
            rename: None,
            ty,
        }
    }

    /// Set the serialization key annotation.
    pub fn rename(mut self, key: &'static str) -> Self {
        self.rename = Some(key);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The explicit key annotation, ignoring empty values.
    pub fn explicit_key(&self) -> Option<&'static str> {
        self.rename.filter(|key| !key.is_empty())
    }

    /// Produce the descriptor of the field's type.
    pub fn describe_type(&self) -> TypeDescriptor {
        (self.ty)()
    }
}

/// Implement [`Describe`] for a struct by listing its fields.
///
/// Each field is `name: Type`, optionally followed by `=> "key"` when the
/// serialized key differs from the field name.
///
/// ```
/// use confdoc_core::{Describe, describe_record};
///
/// struct Server {
///     host: String,
///     max_conn: u32,
/// }
///
/// describe_record!(Server {
///     host: String,
///     max_conn: u32 => "max-connections",
/// });
///
/// let record = Server::describe();
/// assert_eq!(record.as_record().unwrap().fields().len(), 2);
/// ```
#[macro_export]
macro_rules! describe_record {
    ($ty:ident { $($body:tt)* }) => {
        $crate::describe_record!(@impl $ty, ::core::option::Option::None, { $($body)* });
    };
    ($ty:ident, rename_all = $rule:expr, { $($body:tt)* }) => {
        $crate::describe_record!(@impl $ty, ::core::option::Option::Some($rule), { $($body)* });
    };
    (@impl $ty:ident, $rule:expr, { $($field:ident : $fty:ty $(=> $key:literal)?),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn describe() -> $crate::TypeDescriptor {
                let record = $crate::RecordDescriptor::new(stringify!($ty))
                    .path(::std::any::type_name::<$ty>())
                    $(
                        .field(
                            $crate::FieldDef::new(
                                stringify!($field),
                                <$fty as $crate::Describe>::describe,
                            )
                            $(.rename($key))?
                        )
                    )*;
                $crate::TypeDescriptor::Record(record.rename_all_opt($rule))
            }
        }
    };
}

macro_rules! describe_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Primitive(stringify!($ty))
                }
            }
        )*
    };
}

describe_primitive!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    PathBuf,
);

impl Describe for &'static str {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Primitive("&str")
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Optional(T::describe)
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe> Describe for Rc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<K, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(V::describe)
    }
}

impl<K, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(V::describe)
    }
}

impl<K, V: Describe, S> Describe for IndexMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Map(V::describe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listener {
        #[allow(dead_code)]
        port: u16,
    }

    describe_record!(Listener { port: u16 });

    struct Gateway {
        #[allow(dead_code)]
        r#type: String,
        #[allow(dead_code)]
        listener: Option<Listener>,
    }

    describe_record!(Gateway, rename_all = RenameRule::Kebab, {
        r#type: String => "kind",
        listener: Option<Listener>,
    });

    #[test]
    fn test_primitive_names() {
        assert_eq!(u16::describe().type_name(), "u16");
        assert_eq!(String::describe().type_name(), "String");
        assert_eq!(<Vec<bool>>::describe().type_name(), "Vec<bool>");
    }

    #[test]
    fn test_option_and_box() {
        assert!(matches!(
            <Option<Listener>>::describe(),
            TypeDescriptor::Optional(_)
        ));
        assert!(<Box<Listener>>::describe().is_record());
        assert_eq!(
            <Option<Box<Listener>>>::describe().type_name(),
            "Option<Listener>"
        );
    }

    #[test]
    fn test_maps_describe_value_type() {
        let descriptor = <HashMap<String, Listener>>::describe();
        let TypeDescriptor::Map(value) = descriptor else {
            panic!("expected a map descriptor");
        };
        assert!(value().is_record());
    }

    #[test]
    fn test_macro_record() {
        let descriptor = Gateway::describe();
        let record = descriptor.as_record().unwrap();
        assert_eq!(record.name(), "Gateway");
        assert!(record.identity().ends_with("Gateway"));
        assert_eq!(record.rename_rule(), Some(RenameRule::Kebab));

        let names: Vec<_> = record.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["type", "listener"]);
        assert_eq!(record.fields()[0].explicit_key(), Some("kind"));
        assert_eq!(record.fields()[1].explicit_key(), None);
    }

    #[test]
    fn test_empty_rename_is_ignored() {
        let field = FieldDef::new("debug", bool::describe).rename("");
        assert_eq!(field.explicit_key(), None);
    }
}
