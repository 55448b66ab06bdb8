use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Walk(#[from] confdoc_core::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(confdoc_source::Error),

    #[error("cyclic schema: {path}")]
    #[diagnostic(
        code(confdoc::cyclic_schema),
        help("a record may not contain itself, directly or through other records")
    )]
    CyclicSchema { path: String },
}

impl From<Box<confdoc_source::Error>> for Error {
    fn from(err: Box<confdoc_source::Error>) -> Self {
        Self::Source(*err)
    }
}

impl Error {
    pub(crate) fn cycle<'a>(stack: impl IntoIterator<Item = &'a str>, repeated: &'a str) -> Self {
        let mut names: Vec<&str> = stack.into_iter().collect();
        if let Some(start) = names.iter().position(|name| *name == repeated) {
            names.drain(..start);
        }
        names.push(repeated);
        Self::CyclicSchema {
            path: names.join(" -> "),
        }
    }
}
