use std::path::PathBuf;

use clap::Args;
use confdoc_docs::render_reference;
use eyre::Result;

use super::{SchemaArgs, emit, select};

#[derive(Args)]
pub struct ReferenceCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Document a nested table instead of the root (e.g. `server.tls`)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Write the reference to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ReferenceCommand {
    pub fn run(&self) -> Result<()> {
        let schema = self.schema.resolve()?;
        let tree = schema.load()?;
        let node = select(&tree, self.path.as_deref(), &schema.type_name)?;

        let output = self.output.as_deref().or(schema.output.reference.as_deref());
        emit(output, &render_reference(node))
    }
}
