use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for source operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Carries the source text and filename so that errors raised deep inside
/// the parser can point back at the offending span.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error pointing at `span`.
    pub fn parse_error(&self, message: impl Into<String>, span: Option<SourceSpan>) -> Box<Error> {
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            message: message.into(),
        })
    }

    /// Create a type-not-found error listing the types that were found.
    pub fn type_not_found<'a>(
        &self,
        name: impl Into<String>,
        declared: impl IntoIterator<Item = &'a str>,
    ) -> Box<Error> {
        let available = declared.into_iter().collect::<Vec<_>>().join(", ");
        Box::new(Error::TypeNotFound {
            name: name.into(),
            filename: self.filename.clone(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available
            },
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(confdoc::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse source: {message}")]
    #[diagnostic(code(confdoc::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("type '{name}' is not declared in {filename}")]
    #[diagnostic(
        code(confdoc::type_not_found),
        help("top-level types declared in this file: {available}")
    )]
    TypeNotFound {
        name: String,
        filename: String,
        available: String,
    },
}

impl Error {
    /// Whether this is a `TypeNotFound` error.
    pub fn is_type_not_found(&self) -> bool {
        matches!(self, Self::TypeNotFound { .. })
    }
}
