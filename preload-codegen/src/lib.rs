//! Preload file collection and Composer autoload file generation.
//!
//! [`collect`] gathers the `preload-files` declared by the root package and
//! its dependencies. [`add_preload_files`] merges them in front of Composer's
//! `autoload_files.php` and regenerates `autoload_static.php` through an
//! [`AutoloadTemplates`] implementation. [`Session`] makes sure that happens
//! once per host process.

pub mod builder;
mod collect;
mod emit;
pub mod files;
pub mod paths;
pub mod php;
mod session;
mod templates;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use collect::{
    PRELOAD_FILES_KEY, PreloadEntry, PreloadRegistry, collect, collect_from, file_identifier,
};
pub use emit::{
    DumpOutcome, Duplicate, FileManifest, ManifestOutcome, PathCodes, Preview, StaticOutcome,
    add_preload_files, extract_suffix, find_duplicates, merge, merge_and_write, preview,
    regenerate_static,
};
pub use session::{Dispatch, HostEvent, Session};
pub use templates::{AutoloadTemplates, ComposerTemplates};
