//! Merging preload files into `autoload_files.php` and regenerating
//! `autoload_static.php`.

use std::{path::PathBuf, sync::LazyLock};

use eyre::{Context, Result};
use preload_core::{
    File, OrderedMap, PathError, WriteResult, find_shortest_path_code, normalize_path,
};
use preload_manifest::{AutoloadDirs, PackageGraph};
use regex::Regex;

use crate::{AutoloadTemplates, PreloadRegistry, collect_from, paths::AUTOLOAD_PHP};

/// Identifier to absolute path, in include order.
pub type FileManifest = OrderedMap<String, String>;

static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ComposerAutoloaderInit([^:\s]+)::").expect("suffix pattern is valid")
});

/// How `autoload_files.php` locates the vendor and base directories at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCodes {
    /// Expression for the vendor dir, evaluated in the target dir.
    pub vendor_dir_code: String,
    /// Expression for the base dir in terms of `$vendorDir`.
    pub base_dir_code: String,
}

impl PathCodes {
    pub fn new(dirs: &AutoloadDirs) -> Result<Self, PathError> {
        let vendor_dir_code =
            find_shortest_path_code(dirs.target_dir(), dirs.vendor_dir(), true, false)?;
        let base_dir_code =
            find_shortest_path_code(dirs.vendor_dir(), dirs.base_dir(), true, false)?
                .replace("__DIR__", "$vendorDir");
        Ok(Self {
            vendor_dir_code,
            base_dir_code,
        })
    }
}

/// A path listed under more than one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub path: String,
    pub identifiers: Vec<String>,
}

/// Result of writing `autoload_files.php`.
#[derive(Debug, Clone)]
pub struct ManifestOutcome {
    pub path: PathBuf,
    pub result: WriteResult,
    /// Entries contributed by preload declarations.
    pub preloaded: usize,
    /// Entries in the merged file.
    pub total: usize,
    pub duplicates: Vec<Duplicate>,
}

/// Result of writing `autoload_static.php`.
#[derive(Debug, Clone)]
pub struct StaticOutcome {
    pub path: PathBuf,
    pub result: WriteResult,
    /// Autoloader class suffix, when `autoload.php` named one.
    pub suffix: Option<String>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub enum DumpOutcome {
    /// No package declares preload files; nothing was read or written.
    NothingToPreload,
    Updated {
        registry: PreloadRegistry,
        manifest: ManifestOutcome,
        static_registry: StaticOutcome,
    },
}

/// What a run would write, without writing it.
#[derive(Debug, Clone)]
pub struct Preview {
    pub registry: PreloadRegistry,
    /// The rendered `autoload_files.php`; `None` when there is nothing to preload.
    pub manifest: Option<File>,
    pub duplicates: Vec<Duplicate>,
}

/// Preload entries first, then the existing entries.
///
/// An identifier present in both keeps the preload position and the
/// existing path.
pub fn merge(preload: &PreloadRegistry, existing: FileManifest) -> FileManifest {
    let mut merged: FileManifest = preload
        .iter()
        .map(|(identifier, entry)| (identifier.clone(), entry.path.clone()))
        .collect();
    merged.extend(existing);
    merged
}

/// Paths listed under more than one identifier, in first-seen order.
pub fn find_duplicates(manifest: &FileManifest) -> Vec<Duplicate> {
    let mut by_path: OrderedMap<String, Vec<String>> = OrderedMap::new();
    for (identifier, path) in manifest {
        by_path
            .entry(normalize_path(path))
            .or_default()
            .push(identifier.clone());
    }
    by_path
        .into_iter()
        .filter(|(_, identifiers)| identifiers.len() > 1)
        .map(|(path, identifiers)| Duplicate { path, identifiers })
        .collect()
}

/// Merge `registry` in front of the existing `autoload_files.php` and write it.
pub fn merge_and_write(
    registry: &PreloadRegistry,
    dirs: &AutoloadDirs,
    templates: &dyn AutoloadTemplates,
) -> Result<ManifestOutcome> {
    let (file, merged, duplicates) = render_merged(registry, dirs, templates)?;
    let result = file.write()?;
    tracing::debug!(
        path = %file.path().display(),
        ?result,
        entries = merged.len(),
        "autoload files"
    );

    Ok(ManifestOutcome {
        path: file.path().to_path_buf(),
        result,
        preloaded: registry.len(),
        total: merged.len(),
        duplicates,
    })
}

fn render_merged(
    registry: &PreloadRegistry,
    dirs: &AutoloadDirs,
    templates: &dyn AutoloadTemplates,
) -> Result<(File, FileManifest, Vec<Duplicate>)> {
    let codes = PathCodes::new(dirs)?;
    let existing = templates.load_existing_manifest(dirs)?;
    let merged = merge(registry, existing);

    let duplicates = find_duplicates(&merged);
    for duplicate in &duplicates {
        tracing::warn!(
            path = %duplicate.path,
            identifiers = ?duplicate.identifiers,
            "file is listed more than once in the autoload files"
        );
    }

    let file = templates.render_manifest(&merged, dirs, &codes)?;
    Ok((file, merged, duplicates))
}

/// The autoloader class suffix named in `autoload.php`.
pub fn extract_suffix(autoload: &str) -> Option<String> {
    SUFFIX_RE
        .captures(autoload)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Re-render `autoload_static.php` from the autoload files now on disk.
pub fn regenerate_static(
    dirs: &AutoloadDirs,
    templates: &dyn AutoloadTemplates,
) -> Result<StaticOutcome> {
    let autoload = dirs.vendor_file(AUTOLOAD_PHP);
    let content = std::fs::read_to_string(&autoload)
        .wrap_err_with(|| format!("failed to read '{}'", autoload.display()))?;

    let suffix = extract_suffix(&content);
    if suffix.is_none() {
        tracing::warn!(
            path = %autoload.display(),
            "no autoloader class suffix found, generating an unsuffixed static class"
        );
    }

    let file = templates.render_static_registry(suffix.as_deref(), dirs)?;
    let result = file.write()?;
    tracing::debug!(path = %file.path().display(), ?result, "static autoload registry");

    Ok(StaticOutcome {
        path: file.path().to_path_buf(),
        result,
        suffix,
    })
}

/// Collect preload files and, when there are any, update both generated files.
pub fn add_preload_files(
    graph: &dyn PackageGraph,
    dirs: &AutoloadDirs,
    templates: &dyn AutoloadTemplates,
) -> Result<DumpOutcome> {
    let registry = collect_from(graph, dirs.base_dir());
    if registry.is_empty() {
        tracing::debug!("no preload files declared");
        return Ok(DumpOutcome::NothingToPreload);
    }

    tracing::info!("Adding preload files to the autoload files.");
    let manifest = merge_and_write(&registry, dirs, templates)?;
    let static_registry = regenerate_static(dirs, templates)?;

    Ok(DumpOutcome::Updated {
        registry,
        manifest,
        static_registry,
    })
}

/// Render the merged `autoload_files.php` without touching the disk.
pub fn preview(
    graph: &dyn PackageGraph,
    dirs: &AutoloadDirs,
    templates: &dyn AutoloadTemplates,
) -> Result<Preview> {
    let registry = collect_from(graph, dirs.base_dir());
    if registry.is_empty() {
        return Ok(Preview {
            registry,
            manifest: None,
            duplicates: Vec::new(),
        });
    }

    let (file, _, duplicates) = render_merged(&registry, dirs, templates)?;
    Ok(Preview {
        registry,
        manifest: Some(file),
        duplicates,
    })
}
