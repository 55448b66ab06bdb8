//! Rust source parsing for confdoc.
//!
//! Locates top-level type declarations in a source file and recovers the
//! comment block written above each field, together with the field's type
//! and serde attributes. Only declarations are understood; function bodies,
//! impls and macros are skipped.

mod comments;
mod error;
mod file;
mod lexer;
mod parser;

pub use comments::{CommentRecord, extract_comments};
pub use error::{Error, Result, SourceContext};
pub use file::SourceFile;
pub use lexer::{Comment, CommentStyle, LexError, Token, TokenKind, tokenize};
pub use parser::{Decl, FieldDecl, SerdeAttrs, StructDecl, StructKind, TypeExpr};
