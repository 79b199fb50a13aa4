//! `autoload_static.php`, the class loader state baked into a class for opcache.

use std::path::{Path, PathBuf};

use preload_core::{GeneratedFile, find_shortest_path_code, quote_string};
use preload_manifest::AutoloadDirs;

use super::ClassLoaderTables;
use crate::{
    builder::CodeBuilder,
    paths::AUTOLOAD_STATIC_PHP,
    php::{PhpArray, PhpValue, strtr, var_export},
};

/// The `autoload_static.php` file.
pub struct AutoloadStaticPhp<'a> {
    suffix: &'a str,
    dirs: &'a AutoloadDirs,
    files: Option<&'a PhpArray>,
    tables: &'a ClassLoaderTables,
}

impl<'a> AutoloadStaticPhp<'a> {
    /// `files` is the evaluated `autoload_files.php`, `None` when there is none.
    pub fn new(
        suffix: &'a str,
        dirs: &'a AutoloadDirs,
        files: Option<&'a PhpArray>,
        tables: &'a ClassLoaderTables,
    ) -> Self {
        Self {
            suffix,
            dirs,
            files,
            tables,
        }
    }

    fn class_name(&self) -> String {
        format!("ComposerStaticInit{}", self.suffix)
    }

    /// Absolute path prefixes inside exported arrays and their `__DIR__` based
    /// replacements.
    fn replacements(&self) -> Vec<(String, String)> {
        let target = self.dirs.target_dir();
        let mut pairs = Vec::with_capacity(4);
        for dir in [self.dirs.vendor_dir(), self.dirs.base_dir()] {
            // both sides are absolute, so this cannot fail
            let Ok(code) = find_shortest_path_code(target, dir, true, true) else {
                continue;
            };
            let dir = dir.trim_end_matches(['/', '\\']);
            pairs.push((
                format!(" => {}", open_quoted(&format!("{dir}/"))),
                format!(" => {code} . '/"),
            ));
            pairs.push((
                format!(" => {}", open_quoted(&format!("phar://{dir}/"))),
                format!(" => 'phar://' . {code} . '/"),
            ));
        }
        pairs
    }

    fn export(&self, value: &PhpArray, replacements: &[(String, String)]) -> String {
        let exported = strtr(&var_export(&PhpValue::Array(value.clone())), replacements);
        exported
            .split('\n')
            .map(|line| {
                let body = line.trim_start_matches(' ');
                let depth = line.len() - body.len();
                format!("    {}{}", " ".repeat(depth * 2), body)
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim_start()
            .to_string()
    }
}

/// A quoted PHP string without its closing quote.
fn open_quoted(s: &str) -> String {
    let mut quoted = quote_string(s);
    quoted.pop();
    quoted
}

impl GeneratedFile for AutoloadStaticPhp<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(AUTOLOAD_STATIC_PHP)
    }

    fn render(&self) -> String {
        let class = self.class_name();
        let replacements = self.replacements();
        let tables = self.tables.properties();

        let properties: Vec<(&str, String)> = self
            .files
            .map(|files| ("files", self.export(files, &replacements)))
            .into_iter()
            .chain(
                tables
                    .iter()
                    .map(|(name, table)| (*name, self.export(table, &replacements))),
            )
            .collect();

        CodeBuilder::php()
            .line("<?php")
            .blank()
            .comment("autoload_static.php @generated by Composer")
            .blank()
            .line("namespace Composer\\Autoload;")
            .blank()
            .line(&format!("class {class}"))
            .block_with_close("{", "}", |b| {
                b.each(&properties, |b, (name, value)| {
                    b.line(&format!("public static ${name} = {value};")).blank()
                })
                .line("public static function getInitializer(ClassLoader $loader)")
                .block_with_close("{", "}", |b| {
                    b.block_with_close(
                        "return \\Closure::bind(function () use ($loader) {",
                        "}, null, ClassLoader::class);",
                        |b| {
                            b.each(&tables, |b, (name, _)| {
                                b.line(&format!("$loader->{name} = {class}::${name};"))
                            })
                            .blank()
                        },
                    )
                })
            })
            .build()
    }
}
