//! List command report data structures.

use super::output::{Output, Report};

/// Report data for the collected preload files.
#[derive(Debug)]
pub struct ListReport {
    pub files: Vec<ListedFile>,
}

/// A collected preload file.
#[derive(Debug)]
pub struct ListedFile {
    pub identifier: String,
    /// Path relative to the project root when inside it.
    pub path: String,
    pub package: String,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.files.is_empty() {
            out.preformatted("No preload files declared");
            return;
        }

        out.section(&format!("Preload files ({})", self.files.len()));
        for (index, file) in self.files.iter().enumerate() {
            out.numbered_item(
                index + 1,
                &format!("{} ({}) {}", file.path, file.package, file.identifier),
            );
        }
    }
}
