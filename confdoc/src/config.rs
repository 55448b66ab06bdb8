//! The optional `confdoc.toml` project file.

use std::path::{Path, PathBuf};

use eyre::{Result as EyreResult, bail};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "confdoc.toml";

/// Result type for project file loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<ConfigError>>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("create a confdoc.toml or pass --source and --type"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(confdoc::config_parse_error))]
    Parse {
        filename: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of `confdoc.toml`.
///
/// ```toml
/// [schema]
/// source = "src/config.rs"
/// type = "Config"
///
/// [output]
/// reference = "docs/config.md"
/// annotated = "config.example.toml"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub schema: SchemaSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchemaSection {
    pub source: Option<PathBuf>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub reference: Option<PathBuf>,
    pub annotated: Option<PathBuf>,
}

impl ProjectConfig {
    /// Parse a project file from a string, using `filename` in diagnostics.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| {
            let span = source.span().map(SourceSpan::from);
            Box::new(ConfigError::Parse {
                filename: filename.to_string(),
                src: NamedSource::new(filename, content.to_string()),
                span,
                source,
            })
        })
    }

    /// Read and parse a project file.
    ///
    /// Relative paths in the file are resolved against its directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        let mut config = Self::from_str_with_filename(&content, &path.display().to_string())?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// Open `explicit`, or `./confdoc.toml` when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Option<Self>> {
        match explicit {
            Some(path) => Self::open(path).map(Some),
            None => Self::discover_in(Path::new(".")),
        }
    }

    fn discover_in(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::open(path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.schema.source,
            &mut self.output.reference,
            &mut self.output.annotated,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Fully resolved command inputs.
#[derive(Debug, PartialEq)]
pub struct Schema {
    pub source: PathBuf,
    pub type_name: String,
    pub output: OutputSection,
}

impl Schema {
    /// Combine command-line values with the project file. Flags win.
    pub fn resolve(
        source: Option<PathBuf>,
        type_name: Option<String>,
        project: Option<ProjectConfig>,
    ) -> EyreResult<Self> {
        let project = project.unwrap_or_default();
        let Some(source) = source.or(project.schema.source) else {
            bail!(
                "no schema source given; pass --source or set `source` under [schema] in {CONFIG_FILE}"
            );
        };
        let Some(type_name) = type_name.or(project.schema.type_name) else {
            bail!(
                "no schema type given; pass --type or set `type` under [schema] in {CONFIG_FILE}"
            );
        };
        Ok(Self {
            source,
            type_name,
            output: project.output,
        })
    }
}
