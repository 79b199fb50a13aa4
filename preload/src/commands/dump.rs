use clap::Args;
use eyre::Result;

use super::ProjectArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct DumpCommand {
    /// Print the merged autoload_files.php instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl DumpCommand {
    pub fn run(&self, project: &ProjectArgs) -> Result<()> {
        let project = project.load();

        let report = ops::dump(
            &project,
            ops::dump::DumpOptions {
                dry_run: self.dry_run,
            },
        )?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
