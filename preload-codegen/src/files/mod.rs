//! Generated file types, one per Composer autoload file this tool writes.

mod autoload_files;
mod autoload_static;
mod class_loader;

pub use autoload_files::{AutoloadFilesPhp, path_code};
pub use autoload_static::AutoloadStaticPhp;
pub use class_loader::{ClassLoaderTables, TemplateError};
