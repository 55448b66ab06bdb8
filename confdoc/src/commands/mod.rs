mod annotate;
mod check;
mod completions;
mod reference;

use std::path::{Path, PathBuf};

use annotate::AnnotateCommand;
use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use confdoc_docs::DocNode;
use confdoc_source::SourceFile;
use eyre::{Context, Result, eyre};
use reference::ReferenceCommand;
use tracing::info;

use crate::config::{ProjectConfig, Schema};

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

fn exit_with(diagnostic: impl miette::Diagnostic + Send + Sync + 'static) -> ! {
    eprintln!("{:?}", miette::Report::new(diagnostic));
    std::process::exit(1);
}

impl<T> UnwrapOrExit<T> for confdoc_source::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(*e))
    }
}

impl<T> UnwrapOrExit<T> for confdoc_docs::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(e))
    }
}

impl<T> UnwrapOrExit<T> for confdoc_toml::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(*e))
    }
}

impl<T> UnwrapOrExit<T> for crate::config::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| exit_with(*e))
    }
}

#[derive(Parser)]
#[command(name = "confdoc")]
#[command(version)]
#[command(about = "Document configuration structs and annotate TOML files")]
pub(crate) struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Reference(cmd) => cmd.run(),
            Commands::Annotate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key reference of a configuration type
    Reference(ReferenceCommand),

    /// Add documentation comments to an existing TOML file
    Annotate(AnnotateCommand),

    /// Report configuration keys that have no documentation
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Where the schema comes from. Flags override confdoc.toml.
#[derive(Args, Debug, Default)]
pub(crate) struct SchemaArgs {
    /// Rust source file declaring the configuration types
    #[arg(short, long, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Name of the root configuration type
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub type_name: Option<String>,

    /// Project file (defaults to ./confdoc.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SchemaArgs {
    /// Combine flags with the project file, if any.
    pub fn resolve(&self) -> Result<Schema> {
        let project = ProjectConfig::discover(self.config.as_deref()).unwrap_or_exit();
        Schema::resolve(self.source.clone(), self.type_name.clone(), project)
    }
}

impl Schema {
    /// Parse the schema source and build its doc tree.
    pub fn load(&self) -> Result<DocNode> {
        let file = SourceFile::from_file(&self.source).unwrap_or_exit();
        let tree = confdoc_docs::build_from_file(&file, &self.type_name).unwrap_or_exit();
        info!(
            source = %self.source.display(),
            type_name = %self.type_name,
            keys = tree.walk().count(),
            "loaded schema"
        );
        Ok(tree)
    }
}

/// Look up a nested table by dotted path.
pub(crate) fn select<'a>(
    tree: &'a DocNode,
    path: Option<&str>,
    type_name: &str,
) -> Result<&'a DocNode> {
    let Some(path) = path else {
        return Ok(tree);
    };
    tree.get_path(path)
        .filter(|node| !node.children.is_empty())
        .ok_or_else(|| eyre!("'{path}' is not a table of {type_name}"))
}

/// Write to `path`, or to stdout when no path is given.
pub(crate) fn emit(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reference_args() {
        let cli = Cli::try_parse_from([
            "confdoc",
            "reference",
            "--source",
            "src/config.rs",
            "-t",
            "Config",
            "--path",
            "server",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Reference(cmd) = cli.command else {
            panic!("expected the reference command");
        };
        assert_eq!(cmd.schema.source, Some(PathBuf::from("src/config.rs")));
        assert_eq!(cmd.schema.type_name.as_deref(), Some("Config"));
        assert_eq!(cmd.path.as_deref(), Some("server"));
    }

    #[test]
    fn test_select_nested_table() {
        let mut server = DocNode::new("server", "Server.");
        server.insert(DocNode::new("port", "Port."));
        let mut root = DocNode::root("");
        root.insert(DocNode::new("name", "Name."));
        root.insert(server);

        assert_eq!(select(&root, None, "Config").unwrap().key, "");
        assert_eq!(select(&root, Some("server"), "Config").unwrap().key, "server");
        let err = select(&root, Some("name"), "Config").unwrap_err();
        assert_eq!(err.to_string(), "'name' is not a table of Config");
        assert!(select(&root, Some("missing"), "Config").is_err());
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        emit(Some(path.as_path()), "[name]\n\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[name]\n\n");
    }
}
