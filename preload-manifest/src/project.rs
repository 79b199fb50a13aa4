//! A Composer project on disk: the concrete package graph provider.

use std::path::PathBuf;

use crate::{
    AutoloadDirs, ComposerJson, PackageDescriptor, PackageGraph, Result, installed::read_installed,
};

/// Default name of the root manifest.
pub const COMPOSER_JSON: &str = "composer.json";

/// Default vendor directory, relative to the project root.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Where to find a project and how it is laid out.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root.
    pub working_dir: PathBuf,
    /// Root manifest, relative to `working_dir` unless absolute.
    pub composer_file: PathBuf,
    /// Vendor directory override; takes precedence over `config.vendor-dir`.
    pub vendor_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Configuration for the project rooted at `working_dir` with default file names.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            composer_file: PathBuf::from(COMPOSER_JSON),
            vendor_dir: None,
        }
    }

    /// Absolute path of the root manifest.
    pub fn composer_path(&self) -> PathBuf {
        self.working_dir.join(&self.composer_file)
    }
}

/// A loaded Composer project.
#[derive(Debug, Clone)]
pub struct ComposerProject {
    root: PackageDescriptor,
    packages: Vec<PackageDescriptor>,
    dirs: AutoloadDirs,
}

impl ComposerProject {
    /// Load `composer.json`, resolve the directories, and read `installed.json`.
    pub fn load(config: &ProjectConfig) -> Result<Self> {
        let composer_json = ComposerJson::open(config.composer_path())?;

        let vendor_dir = config
            .vendor_dir
            .clone()
            .or_else(|| composer_json.config.vendor_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VENDOR_DIR));
        let dirs = AutoloadDirs::resolve(&config.working_dir, &vendor_dir)?;

        let packages = read_installed(&dirs)?;
        tracing::debug!(
            base_dir = dirs.base_dir(),
            vendor_dir = dirs.vendor_dir(),
            packages = packages.len(),
            "loaded project"
        );

        Ok(Self {
            root: composer_json.root_package(),
            packages,
            dirs,
        })
    }

    /// Assemble a project from already-known parts.
    pub fn from_parts(
        root: PackageDescriptor,
        packages: Vec<PackageDescriptor>,
        dirs: AutoloadDirs,
    ) -> Self {
        Self {
            root,
            packages,
            dirs,
        }
    }

    /// The resolved directories.
    pub fn dirs(&self) -> &AutoloadDirs {
        &self.dirs
    }
}

impl PackageGraph for ComposerProject {
    fn root_package(&self) -> &PackageDescriptor {
        &self.root
    }

    fn installed_packages(&self) -> &[PackageDescriptor] {
        &self.packages
    }
}
