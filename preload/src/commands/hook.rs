use clap::Args;
use eyre::Result;
use preload_codegen::HostEvent;

use super::ProjectArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct HookCommand {
    /// Events to handle, in order (post-autoload-dump, post-install-cmd)
    #[arg(required = true)]
    pub events: Vec<HostEvent>,
}

impl HookCommand {
    pub fn run(&self, project: &ProjectArgs) -> Result<()> {
        let project = project.load();

        let report = ops::hook(&project, &self.events)?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
