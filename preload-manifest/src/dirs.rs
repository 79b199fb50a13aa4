use std::path::{Path, PathBuf};

use preload_core::normalize_path;

use crate::{Error, Result};

/// Directory holding Composer's generated autoload files, relative to the vendor dir.
pub const TARGET_SUBDIR: &str = "composer";

/// The three directories every generated file is positioned against.
///
/// All values are normalized, absolute, forward-slash strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoloadDirs {
    base_dir: String,
    vendor_dir: String,
    target_dir: String,
}

impl AutoloadDirs {
    /// Build from already-resolved absolute directories.
    pub fn new(base_dir: impl AsRef<str>, vendor_dir: impl AsRef<str>) -> Self {
        let base_dir = normalize_path(base_dir.as_ref());
        let vendor_dir = normalize_path(vendor_dir.as_ref());
        let target_dir = normalize_path(&format!("{}/{}", vendor_dir, TARGET_SUBDIR));
        Self {
            base_dir,
            vendor_dir,
            target_dir,
        }
    }

    /// Resolve real directories on disk, following symlinks.
    ///
    /// A relative `vendor_dir` is taken relative to `base_dir`.
    pub fn resolve(base_dir: &Path, vendor_dir: &Path) -> Result<Self> {
        let base = canonical(base_dir)?;
        let vendor = if vendor_dir.is_absolute() {
            vendor_dir.to_path_buf()
        } else {
            base.join(vendor_dir)
        };
        let vendor = canonical(&vendor)?;

        Ok(Self::new(
            base.to_string_lossy(),
            vendor.to_string_lossy(),
        ))
    }

    /// The project root.
    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// The vendor directory.
    pub fn vendor_dir(&self) -> &str {
        &self.vendor_dir
    }

    /// The directory holding the generated autoload files.
    pub fn target_dir(&self) -> &str {
        &self.target_dir
    }

    /// Path of a file inside the target directory.
    pub fn target_file(&self, name: &str) -> PathBuf {
        Path::new(&self.target_dir).join(name)
    }

    /// Path of a file directly inside the vendor directory.
    pub fn vendor_file(&self, name: &str) -> PathBuf {
        Path::new(&self.vendor_dir).join(name)
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| Error::missing_dir(path, e))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_new_derives_target_dir() {
        let dirs = AutoloadDirs::new("/project/", "/project/vendor");
        assert_eq!(dirs.base_dir(), "/project");
        assert_eq!(dirs.vendor_dir(), "/project/vendor");
        assert_eq!(dirs.target_dir(), "/project/vendor/composer");
        assert_eq!(
            dirs.target_file("autoload_files.php"),
            PathBuf::from("/project/vendor/composer/autoload_files.php")
        );
    }

    #[test]
    fn test_resolve_relative_vendor_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("lib/vendor")).unwrap();

        let dirs = AutoloadDirs::resolve(temp.path(), Path::new("lib/vendor")).unwrap();

        let base = dunce::canonicalize(temp.path()).unwrap();
        let expected = normalize_path(&base.to_string_lossy());
        assert_eq!(dirs.base_dir(), expected);
        assert_eq!(dirs.vendor_dir(), format!("{}/lib/vendor", expected));
    }

    #[test]
    fn test_resolve_missing_vendor_dir() {
        let temp = TempDir::new().unwrap();

        let err = AutoloadDirs::resolve(temp.path(), Path::new("vendor")).unwrap_err();
        assert!(matches!(*err, Error::MissingDir { .. }));
    }
}
