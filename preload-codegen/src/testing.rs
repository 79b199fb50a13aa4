//! Test utilities: on-disk Composer projects as left behind by `composer install`.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use preload_core::quote_string;
use preload_manifest::{AutoloadDirs, ComposerProject, ProjectConfig};
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::paths::{
    AUTOLOAD_CLASSMAP_PHP, AUTOLOAD_FILES_PHP, AUTOLOAD_NAMESPACES_PHP, AUTOLOAD_PHP,
    AUTOLOAD_PSR4_PHP, AUTOLOAD_STATIC_PHP,
};

/// Builder for a temporary Composer project.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    root_name: Option<String>,
    root_preload: Vec<String>,
    packages: Vec<Value>,
    existing: Vec<(String, String)>,
    suffix: Option<String>,
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self {
            root_name: Some("acme/app".to_string()),
            root_preload: Vec::new(),
            packages: Vec::new(),
            existing: Vec::new(),
            suffix: Some("0123456789abcdef".to_string()),
        }
    }
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the root package; `None` leaves it out of `composer.json`.
    pub fn root_name(mut self, name: Option<&str>) -> Self {
        self.root_name = name.map(str::to_string);
        self
    }

    pub fn root_preload(mut self, files: &[&str]) -> Self {
        self.root_preload = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// An installed library at `{vendor}/{name}`.
    pub fn package(mut self, name: &str, preload: &[&str]) -> Self {
        self.packages.push(json!({
            "name": name,
            "type": "library",
            "extra": { "preload-files": preload },
            "install-path": format!("../{name}"),
        }));
        self
    }

    /// An installed metapackage, which has nothing on disk.
    pub fn metapackage(mut self, name: &str, preload: &[&str]) -> Self {
        self.packages.push(json!({
            "name": name,
            "type": "metapackage",
            "extra": { "preload-files": preload },
            "install-path": null,
        }));
        self
    }

    /// An entry Composer itself wrote to `autoload_files.php`, relative to the vendor dir.
    pub fn existing_file(mut self, identifier: &str, vendor_path: &str) -> Self {
        self.existing
            .push((identifier.to_string(), vendor_path.to_string()));
        self
    }

    /// Autoloader class suffix in `autoload.php`; `None` writes an `autoload.php` without one.
    pub fn suffix(mut self, suffix: Option<&str>) -> Self {
        self.suffix = suffix.map(str::to_string);
        self
    }

    /// Write the project into a fresh temporary directory.
    pub fn build(self) -> Result<Fixture> {
        let temp = TempDir::new().wrap_err("failed to create temp dir")?;
        let root = temp.path().to_path_buf();
        let target = root.join("vendor/composer");

        let mut composer = json!({ "extra": { "preload-files": self.root_preload } });
        if let Some(name) = &self.root_name {
            composer["name"] = json!(name);
        }
        write(&root.join("composer.json"), &pretty(&composer)?)?;
        write(
            &target.join("installed.json"),
            &pretty(&json!({
                "packages": self.packages,
                "dev": true,
                "dev-package-names": [],
            }))?,
        )?;

        write(&root.join("vendor").join(AUTOLOAD_PHP), &autoload_php(self.suffix.as_deref()))?;
        write(
            &target.join(AUTOLOAD_NAMESPACES_PHP),
            &data_file(AUTOLOAD_NAMESPACES_PHP, &[]),
        )?;
        write(
            &target.join(AUTOLOAD_PSR4_PHP),
            &data_file(
                AUTOLOAD_PSR4_PHP,
                &["'App\\\\' => array($baseDir . '/app'),".to_string()],
            ),
        )?;
        write(
            &target.join(AUTOLOAD_CLASSMAP_PHP),
            &data_file(
                AUTOLOAD_CLASSMAP_PHP,
                &[
                    "'Composer\\\\InstalledVersions' => $vendorDir . '/composer/InstalledVersions.php',"
                        .to_string(),
                ],
            ),
        )?;
        if !self.existing.is_empty() {
            let entries: Vec<String> = self
                .existing
                .iter()
                .map(|(id, path)| {
                    format!(
                        "{} => $vendorDir . {},",
                        quote_string(id),
                        quote_string(&format!("/{path}"))
                    )
                })
                .collect();
            write(&target.join(AUTOLOAD_FILES_PHP), &data_file(AUTOLOAD_FILES_PHP, &entries))?;
        }

        let dirs = AutoloadDirs::resolve(&root, Path::new("vendor"))?;
        Ok(Fixture { temp, dirs })
    }
}

/// A project written by [`ProjectFixture::build`], deleted on drop.
#[derive(Debug)]
pub struct Fixture {
    temp: TempDir,
    dirs: AutoloadDirs,
}

impl Fixture {
    /// The project root as created.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The resolved directories.
    pub fn dirs(&self) -> &AutoloadDirs {
        &self.dirs
    }

    /// Load the project the way the CLI does.
    pub fn project(&self) -> Result<ComposerProject> {
        Ok(ComposerProject::load(&ProjectConfig::new(self.root()))?)
    }

    pub fn target_path(&self, name: &str) -> PathBuf {
        self.dirs.target_file(name)
    }

    pub fn read_target(&self, name: &str) -> Result<String> {
        let path = self.target_path(name);
        std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read '{}'", path.display()))
    }

    pub fn autoload_files(&self) -> Result<String> {
        self.read_target(AUTOLOAD_FILES_PHP)
    }

    pub fn autoload_static(&self) -> Result<String> {
        self.read_target(AUTOLOAD_STATIC_PHP)
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write '{}'", path.display()))
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).wrap_err("failed to serialize fixture json")
}

fn autoload_php(suffix: Option<&str>) -> String {
    let loader = match suffix {
        Some(suffix) => format!("return ComposerAutoloaderInit{suffix}::getLoader();"),
        None => "return require __DIR__ . '/composer/loader.php';".to_string(),
    };
    format!(
        "<?php\n\n// autoload.php @generated by Composer\n\nrequire_once __DIR__ . '/composer/autoload_real.php';\n\n{loader}\n"
    )
}

fn data_file(name: &str, entries: &[String]) -> String {
    let body: String = entries.iter().map(|e| format!("    {e}\n")).collect();
    format!(
        "<?php\n\n// {name} @generated by Composer\n\n$vendorDir = dirname(__DIR__);\n$baseDir = dirname($vendorDir);\n\nreturn array(\n{body});\n"
    )
}
