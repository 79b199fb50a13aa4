mod completions;
mod dump;
mod hook;
mod list;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use completions::CompletionsCommand;
use dump::DumpCommand;
use eyre::Result;
use hook::HookCommand;
use list::ListCommand;
use preload_manifest::{COMPOSER_JSON, ComposerProject, ProjectConfig};

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for preload_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "preload")]
#[command(version)]
#[command(about = "Prepend preload files to Composer's generated autoload files")]
pub(crate) struct Cli {
    #[command(flatten)]
    project: ProjectArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Dump(cmd) => cmd.run(&self.project),
            Commands::Hook(cmd) => cmd.run(&self.project),
            Commands::List(cmd) => cmd.run(&self.project),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add preload files to the generated autoload files
    Dump(DumpCommand),

    /// Handle Composer script events (e.g. post-autoload-dump)
    Hook(HookCommand),

    /// List collected preload files in include order
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Where the Composer project lives.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(short = 'd', long, default_value = ".", global = true)]
    pub working_dir: PathBuf,

    /// Root manifest, relative to the project root
    #[arg(long, env = "COMPOSER", default_value = COMPOSER_JSON, global = true)]
    pub composer_file: PathBuf,

    /// Vendor directory (overrides config.vendor-dir in composer.json)
    #[arg(long, env = "COMPOSER_VENDOR_DIR", global = true)]
    pub vendor_dir: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn config(&self) -> ProjectConfig {
        ProjectConfig {
            working_dir: self.working_dir.clone(),
            composer_file: self.composer_file.clone(),
            vendor_dir: self.vendor_dir.clone(),
        }
    }

    /// Load the project, exiting with a diagnostic when that fails.
    pub fn load(&self) -> ComposerProject {
        ComposerProject::load(&self.config()).unwrap_or_exit()
    }
}
