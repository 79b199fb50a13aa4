//! Composer package graph for the preload autoload generator.
//!
//! Reads the root `composer.json` and `vendor/composer/installed.json` and
//! exposes them as [`PackageDescriptor`]s through the [`PackageGraph`] trait.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod composer_json;
mod dirs;
mod error;
mod installed;
mod package;
mod project;

pub use composer_json::{ComposerConfig, ComposerJson};
pub use dirs::{AutoloadDirs, TARGET_SUBDIR};
pub use error::{Error, Result};
pub use installed::{INSTALLED_JSON, parse_installed, read_installed};
pub use package::{DEFAULT_PACKAGE_TYPE, PackageDescriptor, PackageGraph, ROOT_FALLBACK_NAME};
pub use project::{COMPOSER_JSON, ComposerProject, DEFAULT_VENDOR_DIR, ProjectConfig};
