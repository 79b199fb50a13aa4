//! `autoload_files.php`, the ordered list of files included on every request.

use std::path::{Path, PathBuf};

use preload_core::{
    GeneratedFile, find_shortest_path, is_absolute_path, normalize_path, quote_string,
};
use preload_manifest::AutoloadDirs;

use crate::{FileManifest, PathCodes, builder::CodeBuilder, paths::AUTOLOAD_FILES_PHP};

/// The `autoload_files.php` file.
pub struct AutoloadFilesPhp<'a> {
    files: &'a FileManifest,
    dirs: &'a AutoloadDirs,
    codes: &'a PathCodes,
}

impl<'a> AutoloadFilesPhp<'a> {
    pub fn new(files: &'a FileManifest, dirs: &'a AutoloadDirs, codes: &'a PathCodes) -> Self {
        Self { files, dirs, codes }
    }
}

impl GeneratedFile for AutoloadFilesPhp<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(AUTOLOAD_FILES_PHP)
    }

    fn render(&self) -> String {
        CodeBuilder::php()
            .line("<?php")
            .blank()
            .comment("autoload_files.php @generated by Composer")
            .blank()
            .line(&format!("$vendorDir = {};", self.codes.vendor_dir_code))
            .line(&format!("$baseDir = {};", self.codes.base_dir_code))
            .blank()
            .block_with_close("return array(", ");", |b| {
                b.each(self.files, |b, (identifier, path)| {
                    b.line(&format!(
                        "{} => {},",
                        quote_string(identifier),
                        path_code(self.dirs, path)
                    ))
                })
            })
            .build()
    }
}

/// PHP expression for `path`, relative to `$vendorDir` or `$baseDir` where possible.
///
/// Relative input is taken relative to the base directory. Paths that stay
/// absolute are written as literals; paths inside a `.phar` get the
/// `phar://` stream prefix.
pub fn path_code(dirs: &AutoloadDirs, path: &str) -> String {
    let path = if is_absolute_path(path) {
        normalize_path(path)
    } else {
        normalize_path(&format!("{}/{}", dirs.base_dir(), path))
    };

    let vendor = dirs.vendor_dir();
    let (prefix, rest) = if format!("{path}/").starts_with(&format!("{vendor}/")) {
        ("$vendorDir . ", path[vendor.len()..].to_string())
    } else {
        let relative = find_shortest_path(dirs.base_dir(), &path, true, false)
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|_| path.clone());
        if is_absolute_path(&relative) {
            ("", relative)
        } else {
            ("$baseDir . ", format!("/{relative}"))
        }
    };

    if rest.contains(".phar") {
        format!("'phar://' . {prefix}{}", quote_string(&rest))
    } else {
        format!("{prefix}{}", quote_string(&rest))
    }
}
