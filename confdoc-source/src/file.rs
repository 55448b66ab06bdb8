use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{Error, Result, SourceContext},
    lexer::tokenize,
    parser::{Decl, Parser, StructDecl, TypeExpr, check_delimiters},
};

/// A parsed Rust source file.
///
/// Holds the top-level type declarations in declaration order. When a name
/// is declared twice, the first declaration wins.
#[derive(Debug, Clone)]
pub struct SourceFile {
    ctx: SourceContext,
    decls: IndexMap<String, Decl>,
}

impl SourceFile {
    /// Parse source text. Errors are reported against `<source>`.
    pub fn parse(src: &str) -> Result<Self> {
        Self::parse_with_filename(src, "<source>")
    }

    /// Parse source text, using `filename` in diagnostics.
    pub fn parse_with_filename(src: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(src, filename);
        let tokens = tokenize(src)
            .map_err(|e| ctx.parse_error(e.message, Some((e.offset, e.len).into())))?;
        check_delimiters(&tokens, &ctx)?;

        let mut decls = IndexMap::new();
        for decl in Parser::new(&tokens, &ctx).parse_items()? {
            decls.entry(decl.name().to_string()).or_insert(decl);
        }
        debug!(filename, declarations = decls.len(), "parsed source");

        Ok(Self { ctx, decls })
    }

    /// Read and parse a file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Self::parse_with_filename(&src, &path.display().to_string())
    }

    pub fn context(&self) -> &SourceContext {
        &self.ctx
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Decl> {
        self.decls.get(name)
    }

    /// Look up a declaration, failing with `TypeNotFound`.
    pub fn require(&self, name: &str) -> Result<&Decl> {
        self.decls
            .get(name)
            .ok_or_else(|| self.ctx.type_not_found(name, self.type_names()))
    }

    /// Follow type aliases until reaching a non-alias type.
    ///
    /// Only argument-free paths are followed; a generic alias is returned as
    /// written.
    pub fn resolve_type<'s>(&'s self, ty: &'s TypeExpr) -> &'s TypeExpr {
        let mut current = ty;
        for _ in 0..=self.decls.len() {
            if !current.args().is_empty() {
                break;
            }
            match current.name().and_then(|name| self.decls.get(name)) {
                Some(Decl::Alias { target, .. }) => current = target,
                _ => break,
            }
        }
        current
    }

    /// Find the struct a name refers to, looking through aliases.
    pub fn resolve_struct(&self, name: &str) -> Option<&StructDecl> {
        match self.decls.get(name)? {
            Decl::Struct(decl) => Some(decl),
            Decl::Alias { target, .. } => {
                let resolved = self.resolve_type(target);
                if !resolved.args().is_empty() {
                    return None;
                }
                self.decls.get(resolved.name()?)?.as_struct()
            }
            Decl::Enum { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_declaration_wins() {
        let file = SourceFile::parse("struct A { x: u8 }\nstruct A { y: u8 }").unwrap();
        let a = file.resolve_struct("A").unwrap();
        assert_eq!(a.fields[0].name, "x");
        assert_eq!(file.type_names().count(), 1);
    }

    #[test]
    fn test_resolve_through_aliases() {
        let file = SourceFile::parse(
            "type Outer = Inner;\ntype Inner = Real;\nstruct Real { v: u8 }\ntype Loop = Loop;",
        )
        .unwrap();
        assert_eq!(file.resolve_struct("Outer").map(|s| s.name.as_str()), Some("Real"));
        assert!(file.resolve_struct("Loop").is_none());
        assert!(file.resolve_struct("Missing").is_none());
    }

    #[test]
    fn test_require_reports_declared_types() {
        let file = SourceFile::parse_with_filename("struct A;\nenum B { X }", "config.rs").unwrap();
        let err = file.require("C").unwrap_err();
        assert!(err.is_type_not_found());
        assert_eq!(err.to_string(), "type 'C' is not declared in config.rs");
        match *err {
            Error::TypeNotFound { available, .. } => assert_eq!(available, "A, B"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lex_errors_are_parse_errors() {
        let err = SourceFile::parse("struct A { s: \"open }").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.rs");
        std::fs::write(&path, "pub struct Config { pub port: u16 }").unwrap();

        let file = SourceFile::from_file(&path).unwrap();
        assert!(file.resolve_struct("Config").is_some());
        assert!(file.context().filename().ends_with("config.rs"));

        let missing = SourceFile::from_file(dir.path().join("nope.rs")).unwrap_err();
        assert!(matches!(*missing, Error::Io { .. }));
    }
}
