//! Core operations.
//!
//! This module contains the business logic for preload commands,
//! separated from CLI argument parsing and output rendering.

pub mod dump;
pub mod hook;
pub mod list;

use std::path::Path;

pub use dump::dump;
pub use hook::hook;
pub use list::list;

/// `path` relative to the project root when it lies inside it.
pub(crate) fn display_path(path: &Path, base_dir: &str) -> String {
    let path = preload_core::normalize_path(&path.to_string_lossy());
    match path.strip_prefix(&format!("{base_dir}/")) {
        Some(relative) => relative.to_string(),
        None => path,
    }
}
