//! Dump operation - merge preload files into the autoload files.

use std::path::Path;

use eyre::Result;
use preload_codegen::{ComposerTemplates, DumpOutcome, Duplicate, add_preload_files, preview};
use preload_core::WriteResult;
use preload_manifest::ComposerProject;

use super::display_path;
use crate::reports::{DumpReport, FileStatus, PreloadedFile, PreviewResult, WrittenResult};

/// Options for the dump operation.
pub struct DumpOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the dump operation.
pub fn dump(project: &ComposerProject, opts: DumpOptions) -> Result<DumpReport> {
    let dirs = project.dirs();
    tracing::debug!(dry_run = opts.dry_run, target_dir = dirs.target_dir(), "dump");

    if opts.dry_run {
        let preview = preview(project, dirs, &ComposerTemplates)?;
        let Some(manifest) = preview.manifest else {
            return Ok(DumpReport::NothingToPreload);
        };
        return Ok(DumpReport::Preview(PreviewResult {
            path: display_path(manifest.path(), dirs.base_dir()),
            content: manifest.content().to_string(),
            preloaded: preview.registry.len(),
            duplicates: duplicate_paths(&preview.duplicates, dirs.base_dir()),
        }));
    }

    let outcome = add_preload_files(project, dirs, &ComposerTemplates)?;
    Ok(report(outcome, dirs.base_dir()))
}

/// Build the report for a finished run.
pub(crate) fn report(outcome: DumpOutcome, base_dir: &str) -> DumpReport {
    let DumpOutcome::Updated {
        registry,
        manifest,
        static_registry,
    } = outcome
    else {
        return DumpReport::NothingToPreload;
    };

    DumpReport::Written(WrittenResult {
        preloaded: registry
            .values()
            .map(|entry| PreloadedFile {
                package: entry.package.clone(),
                declared: entry.declared.clone(),
            })
            .collect(),
        files: vec![
            file_status(&manifest.path, manifest.result, base_dir),
            file_status(&static_registry.path, static_registry.result, base_dir),
        ],
        total: manifest.total,
        duplicates: duplicate_paths(&manifest.duplicates, base_dir),
        suffix: static_registry.suffix,
    })
}

fn file_status(path: &Path, result: WriteResult, base_dir: &str) -> FileStatus {
    FileStatus {
        path: display_path(path, base_dir),
        written: result == WriteResult::Written,
    }
}

fn duplicate_paths(duplicates: &[Duplicate], base_dir: &str) -> Vec<String> {
    duplicates
        .iter()
        .map(|d| display_path(Path::new(&d.path), base_dir))
        .collect()
}
