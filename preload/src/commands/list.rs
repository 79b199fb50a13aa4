use clap::Args;
use eyre::Result;

use super::ProjectArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn run(&self, project: &ProjectArgs) -> Result<()> {
        let project = project.load();
        ops::list(&project).render(&mut TerminalOutput::new());
        Ok(())
    }
}
