use std::path::PathBuf;

use clap::Args;
use confdoc_toml::{Node, annotate};
use eyre::{Context, Result};

use super::{SchemaArgs, UnwrapOrExit, emit};

#[derive(Args)]
pub struct AnnotateCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// TOML configuration file to annotate
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write the annotated file here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl AnnotateCommand {
    pub fn run(&self) -> Result<()> {
        let schema = self.schema.resolve()?;
        let tree = schema.load()?;

        let content = std::fs::read_to_string(&self.input)
            .wrap_err_with(|| format!("Failed to read {}", self.input.display()))?;
        let mut node =
            Node::parse_with_filename(&content, &self.input.display().to_string()).unwrap_or_exit();
        annotate(&mut node, &tree);

        let output = self.output.as_deref().or(schema.output.annotated.as_deref());
        emit(output, &node.to_toml_string())
    }
}
