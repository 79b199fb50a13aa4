//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod dump;
mod hook;
mod list;
mod output;

pub use dump::{DumpReport, FileStatus, PreloadedFile, PreviewResult, WrittenResult};
pub use hook::{HookEvent, HookReport};
pub use list::{ListReport, ListedFile};
pub use output::{Report, TerminalOutput};
