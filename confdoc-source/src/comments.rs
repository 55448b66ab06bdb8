use indexmap::IndexMap;

use crate::{
    error::Result,
    file::SourceFile,
    parser::Decl,
};

/// The documentation comment attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Field name as declared, without any `r#` prefix.
    pub field_name: String,
    /// Comment lines with their markers removed, joined by `\n`.
    pub text: String,
}

impl SourceFile {
    /// Field comments of a top-level type, keyed by declared field name.
    ///
    /// Fields without a comment block are absent. Aliases, enums and
    /// structs without named fields yield an empty map.
    pub fn comments(&self, type_name: &str) -> Result<IndexMap<String, CommentRecord>> {
        let Decl::Struct(decl) = self.require(type_name)? else {
            return Ok(IndexMap::new());
        };
        Ok(decl
            .fields
            .iter()
            .filter_map(|field| {
                let text = field.comment.clone()?;
                Some((
                    field.name.clone(),
                    CommentRecord {
                        field_name: field.name.clone(),
                        text,
                    },
                ))
            })
            .collect())
    }
}

/// Parse `source` and return the field comments of `type_name`.
pub fn extract_comments(source: &str, type_name: &str) -> Result<IndexMap<String, CommentRecord>> {
    SourceFile::parse(source)?.comments(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str, type_name: &str) -> Vec<(String, String)> {
        extract_comments(source, type_name)
            .unwrap()
            .into_values()
            .map(|r| (r.field_name, r.text))
            .collect()
    }

    fn pair(name: &str, text: &str) -> (String, String) {
        (name.to_string(), text.to_string())
    }

    #[test]
    fn test_single_and_multi_line() {
        let src = "
struct A {
    /// doc for x1
    x1: u8,
    // first line
    // second line
    x2: u8,
    x3: u8,
}
";
        assert_eq!(
            texts(src, "A"),
            vec![pair("x1", "doc for x1"), pair("x2", "first line\nsecond line")]
        );
    }

    #[test]
    fn test_blank_line_separates_block() {
        let src = "
struct A {
    // detached

    x: u8,
    // above y

    // attached
    y: u8,
}
";
        assert_eq!(texts(src, "A"), vec![pair("y", "attached")]);
    }

    #[test]
    fn test_attributes_between_comment_and_field() {
        let src = r#"
struct A {
    /// port to bind
    #[serde(rename = "listen-port")]
    #[serde(default)]
    port: u16,
    /// dropped by the gap

    #[serde(default)]
    host: String,
}
"#;
        assert_eq!(texts(src, "A"), vec![pair("port", "port to bind")]);
    }

    #[test]
    fn test_trailing_comments_are_not_docs() {
        let src = "
struct A {
    a: u8, // about a
    b: u8,
    c: u8, /* block */
    /* block above */
    d: u8,
}
";
        assert!(texts(src, "A").is_empty());
    }

    #[test]
    fn test_fields_on_one_line_share_comment() {
        let src = "
struct A {
    // shared
    a: u8, b: u8,
    c: u8,
}
";
        assert_eq!(texts(src, "A"), vec![pair("a", "shared"), pair("b", "shared")]);
    }

    #[test]
    fn test_marker_and_whitespace_handling() {
        let src = "
struct A {
    //no space
    //   indented
    ///
    a: u8,
}
";
        assert_eq!(texts(src, "A"), vec![pair("a", "no space\n  indented\n")]);
    }

    #[test]
    fn test_raw_identifier_field() {
        let src = "struct A {\n    // kind\n    r#type: String,\n}";
        assert_eq!(texts(src, "A"), vec![pair("type", "kind")]);
    }

    #[test]
    fn test_non_struct_types_have_no_comments() {
        let src = "type B = A;\nenum E { X }\nstruct U;\nstruct A { /* x */ }";
        assert!(texts(src, "B").is_empty());
        assert!(texts(src, "E").is_empty());
        assert!(texts(src, "U").is_empty());
        assert!(texts(src, "A").is_empty());
    }

    #[test]
    fn test_missing_type() {
        let err = extract_comments("struct A;", "Nope").unwrap_err();
        assert!(err.is_type_not_found());
    }
}
