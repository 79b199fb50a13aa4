//! Rendering of the Composer autoload files, behind a trait so the emitter
//! does not depend on the concrete formats.

use std::path::Path;

use eyre::{Context, Result};
use preload_core::{File, GeneratedFile, normalize_path};
use preload_manifest::AutoloadDirs;

use crate::{
    FileManifest, PathCodes,
    files::{AutoloadFilesPhp, AutoloadStaticPhp, ClassLoaderTables},
    paths::{
        AUTOLOAD_CLASSMAP_PHP, AUTOLOAD_FILES_PHP, AUTOLOAD_NAMESPACES_PHP, AUTOLOAD_PSR4_PHP,
    },
    php::{self, PhpArray, PhpValue},
};

/// Reads and renders the generated autoload files.
pub trait AutoloadTemplates {
    /// The files listed in the current `autoload_files.php`.
    ///
    /// Empty when the file does not exist or cannot be understood.
    fn load_existing_manifest(&self, dirs: &AutoloadDirs) -> Result<FileManifest>;

    /// `autoload_files.php` listing `files` in order.
    fn render_manifest(
        &self,
        files: &FileManifest,
        dirs: &AutoloadDirs,
        codes: &PathCodes,
    ) -> Result<File>;

    /// `autoload_static.php` for the autoloader class `suffix`, built from the
    /// autoload files currently on disk.
    fn render_static_registry(&self, suffix: Option<&str>, dirs: &AutoloadDirs) -> Result<File>;
}

/// The file formats written by Composer 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerTemplates;

impl AutoloadTemplates for ComposerTemplates {
    fn load_existing_manifest(&self, dirs: &AutoloadDirs) -> Result<FileManifest> {
        let path = dirs.target_file(AUTOLOAD_FILES_PHP);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no existing autoload files");
            return Ok(FileManifest::new());
        }

        let source = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
        let file = normalize_path(&path.to_string_lossy());
        match php::evaluate(&source, &file) {
            Ok(PhpValue::Array(files)) => Ok(to_manifest(files)),
            Ok(other) => {
                tracing::warn!(
                    path = %path.display(),
                    returned = other.type_name(),
                    "existing autoload files did not return an array, ignoring them"
                );
                Ok(FileManifest::new())
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "could not read existing autoload files, ignoring them"
                );
                Ok(FileManifest::new())
            }
        }
    }

    fn render_manifest(
        &self,
        files: &FileManifest,
        dirs: &AutoloadDirs,
        codes: &PathCodes,
    ) -> Result<File> {
        Ok(AutoloadFilesPhp::new(files, dirs, codes).file(Path::new(dirs.target_dir())))
    }

    fn render_static_registry(&self, suffix: Option<&str>, dirs: &AutoloadDirs) -> Result<File> {
        let files_path = dirs.target_file(AUTOLOAD_FILES_PHP);
        let files = if files_path.exists() {
            Some(php::require_array(&files_path)?)
        } else {
            None
        };

        let namespaces = php::require_array(&dirs.target_file(AUTOLOAD_NAMESPACES_PHP))?;
        let psr4 = php::require_array(&dirs.target_file(AUTOLOAD_PSR4_PHP))?;
        let class_map = php::require_array(&dirs.target_file(AUTOLOAD_CLASSMAP_PHP))?;
        let tables = ClassLoaderTables::build(&namespaces, &psr4, &class_map)
            .wrap_err_with(|| format!("invalid '{AUTOLOAD_PSR4_PHP}'"))?;

        let static_php =
            AutoloadStaticPhp::new(suffix.unwrap_or_default(), dirs, files.as_ref(), &tables);
        Ok(static_php.file(Path::new(dirs.target_dir())))
    }
}

fn to_manifest(files: PhpArray) -> FileManifest {
    files
        .into_iter()
        .filter_map(|(identifier, path)| match path.to_php_string() {
            Some(path) => Some((identifier.as_string(), path)),
            None => {
                tracing::debug!(%identifier, "ignoring non-string autoload file entry");
                None
            }
        })
        .collect()
}
