//! `vendor/composer/installed.json`, the local repository of installed packages.

use std::path::Path;

use preload_core::{is_absolute_path, normalize_path};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    AutoloadDirs, Error, PackageDescriptor, Result,
    package::{DEFAULT_PACKAGE_TYPE, object_or_empty},
};

/// File name of the local repository, inside the target directory.
pub const INSTALLED_JSON: &str = "installed.json";

/// Both on-disk layouts of `installed.json`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstalledJson {
    /// Composer 2: `{"packages": [...], "dev": true, ...}`
    V2 { packages: Vec<InstalledPackage> },
    /// Composer 1: a bare array of packages
    V1(Vec<InstalledPackage>),
}

#[derive(Debug, Deserialize)]
struct InstalledPackage {
    name: Option<String>,

    #[serde(rename = "type")]
    kind: Option<String>,

    #[serde(default, deserialize_with = "object_or_empty")]
    extra: Map<String, Value>,

    /// Relative to the target directory; null for packages with nothing on disk.
    #[serde(rename = "install-path")]
    install_path: Option<String>,
}

/// Parse `installed.json` content into descriptors, in file order.
///
/// Entries without a name are dropped. Install paths are resolved against
/// `dirs`: Composer 2 records them relative to the target directory, Composer 1
/// always installs into `{vendor}/{name}`.
pub fn parse_installed(
    content: &str,
    filename: &str,
    dirs: &AutoloadDirs,
) -> Result<Vec<PackageDescriptor>> {
    let installed: InstalledJson =
        serde_json::from_str(content).map_err(|e| Error::parse(e, content, filename))?;

    let (packages, v2) = match installed {
        InstalledJson::V2 { packages } => (packages, true),
        InstalledJson::V1(packages) => (packages, false),
    };

    let descriptors = packages
        .into_iter()
        .filter_map(|pkg| {
            let Some(name) = pkg.name else {
                tracing::debug!("skipping installed package without a name");
                return None;
            };
            let install_path = if v2 {
                pkg.install_path.map(|path| resolve_install_path(&path, dirs))
            } else {
                Some(normalize_path(&format!("{}/{}", dirs.vendor_dir(), name)))
            };
            Some(PackageDescriptor {
                name,
                kind: pkg
                    .kind
                    .unwrap_or_else(|| DEFAULT_PACKAGE_TYPE.to_string()),
                extra: pkg.extra,
                install_path,
            })
        })
        .collect();

    Ok(descriptors)
}

/// Composer records `install-path` relative to the target directory, or
/// absolute when no short relative path exists (another drive, or only `/`
/// in common).
fn resolve_install_path(path: &str, dirs: &AutoloadDirs) -> String {
    if is_absolute_path(path) {
        normalize_path(path)
    } else {
        normalize_path(&format!("{}/{}", dirs.target_dir(), path))
    }
}

/// Read the installed packages of a project.
///
/// A missing `installed.json` means nothing is installed yet.
pub fn read_installed(dirs: &AutoloadDirs) -> Result<Vec<PackageDescriptor>> {
    let path = dirs.target_file(INSTALLED_JSON);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no installed.json, assuming no dependencies");
        return Ok(Vec::new());
    }
    read_file(&path, dirs)
}

fn read_file(path: &Path, dirs: &AutoloadDirs) -> Result<Vec<PackageDescriptor>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_installed(&content, &path.display().to_string(), dirs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dirs() -> AutoloadDirs {
        AutoloadDirs::new("/project", "/project/vendor")
    }

    #[test]
    fn test_parse_composer2_layout() {
        let content = r#"{
            "packages": [
                {
                    "name": "acme/polyfill",
                    "type": "library",
                    "extra": { "preload-files": ["bootstrap.php"] },
                    "install-path": "../acme/polyfill"
                },
                {
                    "name": "acme/meta",
                    "type": "metapackage",
                    "install-path": null
                }
            ],
            "dev": true,
            "dev-package-names": []
        }"#;

        let packages = parse_installed(content, "installed.json", &dirs()).unwrap();

        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "acme/polyfill");
        assert_eq!(
            packages[0].install_path.as_deref(),
            Some("/project/vendor/acme/polyfill")
        );
        assert_eq!(
            packages[0].extra.get("preload-files"),
            Some(&json!(["bootstrap.php"]))
        );
        assert_eq!(packages[1].kind, "metapackage");
        assert_eq!(packages[1].install_path, None);
    }

    #[test]
    fn test_parse_composer1_layout() {
        let content = r#"[
            { "name": "acme/tools", "extra": [] }
        ]"#;

        let packages = parse_installed(content, "installed.json", &dirs()).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].kind, "library");
        assert!(packages[0].extra.is_empty());
        assert_eq!(
            packages[0].install_path.as_deref(),
            Some("/project/vendor/acme/tools")
        );
    }

    #[test]
    fn test_install_path_outside_vendor() {
        let content = r#"{ "packages": [
            {
                "name": "acme/plugin",
                "type": "wordpress-plugin",
                "install-path": "../../wp-content/plugins/plugin"
            }
        ] }"#;

        let packages = parse_installed(content, "installed.json", &dirs()).unwrap();

        assert_eq!(
            packages[0].install_path.as_deref(),
            Some("/project/wp-content/plugins/plugin")
        );
    }

    #[test]
    fn test_absolute_install_path_kept() {
        let dirs = AutoloadDirs::new("/home/dev/project", "/home/dev/project/vendor");
        let content = r#"{ "packages": [
            { "name": "acme/local", "install-path": "/opt/packages/local/" },
            { "name": "acme/other-drive", "install-path": "D:/packages/other" }
        ] }"#;

        let packages = parse_installed(content, "installed.json", &dirs).unwrap();

        assert_eq!(packages[0].install_path.as_deref(), Some("/opt/packages/local"));
        assert_eq!(packages[1].install_path.as_deref(), Some("D:/packages/other"));
    }

    #[test]
    fn test_nameless_entries_dropped() {
        let content = r#"{ "packages": [ { "type": "library" }, { "name": "a/b" } ] }"#;

        let packages = parse_installed(content, "installed.json", &dirs()).unwrap();

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "a/b");
        assert_eq!(packages[0].install_path, None);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_installed("{ \"packages\": [", "installed.json", &dirs()).unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}
