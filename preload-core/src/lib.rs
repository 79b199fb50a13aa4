//! Core utilities and types for the preload autoload generator.
//!
//! This crate provides the pieces shared by every other crate in the
//! workspace: Composer-compatible path arithmetic, PHP string quoting,
//! and the write-if-modified file layer.

mod file;
mod paths;
mod php;

// File operations
pub use file::{File, GeneratedFile, WriteResult};
// Path arithmetic
pub use paths::{
    PathError, basename, dirname, find_shortest_path, find_shortest_path_code, is_absolute_path,
    normalize_path,
};
// PHP literals
pub use php::quote_string;

/// Insertion-ordered map used for every identifier-keyed listing.
///
/// Inserting a key that is already present replaces its value and keeps
/// the key at its original position.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V>;
