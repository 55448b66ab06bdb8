use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for TOML operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to encode configuration as TOML")]
    #[diagnostic(code(confdoc::encode_error))]
    Encode(#[source] toml::ser::Error),

    #[error("failed to parse TOML")]
    #[diagnostic(code(confdoc::toml_parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("expected a table at the document root, found {found}")]
    #[diagnostic(
        code(confdoc::root_not_table),
        help("only structs and maps can be annotated")
    )]
    RootNotTable { found: String },
}

impl Error {
    pub(crate) fn parse(src: &str, filename: &str, source: toml::de::Error) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Self::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }
}
