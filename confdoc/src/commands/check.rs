use clap::Args;
use eyre::Result;

use super::SchemaArgs;
use crate::reports::{CheckReport, Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Exit with an error when any key is undocumented
    #[arg(long)]
    pub strict: bool,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let schema = self.schema.resolve()?;
        let tree = schema.load()?;

        let report = CheckReport::from_tree(schema.source, schema.type_name, &tree);
        report.render(&mut TerminalOutput);

        if self.strict && !report.is_complete() {
            std::process::exit(1);
        }
        Ok(())
    }
}
