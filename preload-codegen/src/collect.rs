//! Collecting `preload-files` declarations from the package graph.

use md5::{Digest, Md5};
use preload_core::{OrderedMap, normalize_path};
use preload_manifest::{PackageDescriptor, PackageGraph};
use serde_json::Value;

/// Key inside a package's `extra` section.
pub const PRELOAD_FILES_KEY: &str = "preload-files";

/// One collected preload file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadEntry {
    /// Normalized absolute path.
    pub path: String,
    /// Declaring package.
    pub package: String,
    /// Path as written in the declaration.
    pub declared: String,
}

/// Preload files keyed by identifier, in collection order.
pub type PreloadRegistry = OrderedMap<String, PreloadEntry>;

/// Identifier of a file declared by `package`, shared with Composer's own
/// `autoload.files` entries.
pub fn file_identifier(package: &str, path: &str) -> String {
    hex::encode(Md5::digest(format!("{package}:{path}").as_bytes()))
}

/// Collect from the root package and then every installed package, in
/// enumeration order.
///
/// Root declarations resolve against `base_dir`, dependency declarations
/// against their install path. Metapackages and packages without an install
/// path are skipped. A later declaration with the same identifier replaces the
/// earlier path but keeps its position.
pub fn collect(
    root: &PackageDescriptor,
    packages: &[PackageDescriptor],
    base_dir: &str,
) -> PreloadRegistry {
    let mut registry = PreloadRegistry::new();
    add_declarations(&mut registry, root, base_dir);

    for package in packages {
        if package.is_metapackage() {
            tracing::debug!(package = %package.name, "skipping metapackage");
            continue;
        }
        let Some(install_path) = package.install_path.as_deref() else {
            tracing::debug!(package = %package.name, "skipping package without install path");
            continue;
        };
        add_declarations(&mut registry, package, &normalize_path(install_path));
    }

    registry
}

/// [`collect`] over a [`PackageGraph`].
pub fn collect_from(graph: &dyn PackageGraph, base_dir: &str) -> PreloadRegistry {
    collect(graph.root_package(), graph.installed_packages(), base_dir)
}

fn add_declarations(registry: &mut PreloadRegistry, package: &PackageDescriptor, dir: &str) {
    for declared in declarations(package) {
        registry.insert(
            file_identifier(&package.name, declared),
            PreloadEntry {
                path: normalize_path(&format!("{dir}/{declared}")),
                package: package.name.clone(),
                declared: declared.to_string(),
            },
        );
    }
}

fn declarations(package: &PackageDescriptor) -> Vec<&str> {
    match package.extra.get(PRELOAD_FILES_KEY) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let path = item.as_str();
                if path.is_none() {
                    tracing::debug!(
                        package = %package.name,
                        %item,
                        "ignoring non-string preload file"
                    );
                }
                path
            })
            .collect(),
        Some(other) => {
            tracing::debug!(
                package = %package.name,
                value = %other,
                "ignoring non-array preload-files"
            );
            Vec::new()
        }
    }
}
