use miette::Diagnostic;
use thiserror::Error;

/// Result type for schema walking.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("'{type_name}' is not a record type")]
    #[diagnostic(
        code(confdoc::not_a_record),
        help("only structs with named fields can be documented")
    )]
    NotARecord { type_name: String },
}
