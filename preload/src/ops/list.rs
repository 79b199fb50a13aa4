//! List operation - the collected preload files.

use std::path::Path;

use preload_codegen::collect_from;
use preload_manifest::ComposerProject;

use super::display_path;
use crate::reports::{ListReport, ListedFile};

/// Collect preload files without touching the generated files.
pub fn list(project: &ComposerProject) -> ListReport {
    let base_dir = project.dirs().base_dir();
    let files = collect_from(project, base_dir)
        .into_iter()
        .map(|(identifier, entry)| ListedFile {
            identifier,
            path: display_path(Path::new(&entry.path), base_dir),
            package: entry.package,
        })
        .collect();

    ListReport { files }
}
