//! Dump command report data structures.

use super::output::{Output, Report};

/// Report data from a dump.
#[derive(Debug)]
pub enum DumpReport {
    /// No package declares preload files.
    NothingToPreload,
    /// The generated files were updated.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Preload files in include order.
    pub preloaded: Vec<PreloadedFile>,
    /// Generated files and whether they changed.
    pub files: Vec<FileStatus>,
    /// Entries in the merged autoload_files.php.
    pub total: usize,
    /// Paths listed under more than one identifier.
    pub duplicates: Vec<String>,
    /// Autoloader class suffix found in autoload.php.
    pub suffix: Option<String>,
}

/// A preload file and its declaring package.
#[derive(Debug)]
pub struct PreloadedFile {
    pub package: String,
    pub declared: String,
}

/// A generated file.
#[derive(Debug)]
pub struct FileStatus {
    pub path: String,
    pub written: bool,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Path of the file that would be written.
    pub path: String,
    /// Content that would be written.
    pub content: String,
    /// Number of preload files.
    pub preloaded: usize,
    /// Paths listed under more than one identifier.
    pub duplicates: Vec<String>,
}

impl Report for DumpReport {
    fn render(&self, out: &mut dyn Output) {
        match self {
            DumpReport::NothingToPreload => out.preformatted("No preload files declared"),
            DumpReport::Written(written) => render_written(out, written),
            DumpReport::Preview(preview) => render_preview(out, preview),
        }
    }
}

fn render_written(out: &mut dyn Output, written: &WrittenResult) {
    render_duplicates(out, &written.duplicates);

    out.preformatted("Adding preload files to the autoload files.");
    out.newline();

    out.section(&format!("Preload files ({})", written.preloaded.len()));
    for file in &written.preloaded {
        out.added_item(&format!("{} ({})", file.declared, file.package));
    }
    out.newline();

    for file in &written.files {
        let status = if file.written { "Updated" } else { "Unchanged" };
        out.key_value(status, &file.path);
    }
    out.key_value("Autoload files", &written.total.to_string());
    if let Some(suffix) = &written.suffix {
        out.key_value("Static class", &format!("ComposerStaticInit{suffix}"));
    }
}

fn render_preview(out: &mut dyn Output, preview: &PreviewResult) {
    render_duplicates(out, &preview.duplicates);

    out.divider(&preview.path);
    out.preformatted(&preview.content);

    out.divider("Summary");
    out.preformatted(&format!(
        "{} preload files would be added to {}",
        preview.preloaded, preview.path
    ));
}

fn render_duplicates(out: &mut dyn Output, duplicates: &[String]) {
    for path in duplicates {
        out.warning(&format!("'{path}' is listed more than once in the autoload files"));
    }
}
