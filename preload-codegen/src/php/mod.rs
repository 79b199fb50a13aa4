//! PHP value model, `var_export` rendering, and the data-file reader.

mod reader;
mod value;

use std::path::Path;

use eyre::{Context, Result};
use preload_core::normalize_path;

pub use reader::{ReadError, evaluate};
pub use value::{PhpArray, PhpKey, PhpValue, push, strtr, var_export};

/// Read and evaluate a generated PHP data file, like PHP's `require`.
pub fn require(path: &Path) -> Result<PhpValue> {
    let source = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
    let file = normalize_path(&path.to_string_lossy());
    evaluate(&source, &file).wrap_err_with(|| format!("failed to evaluate '{}'", path.display()))
}

/// [`require`] for files that must return an array.
pub fn require_array(path: &Path) -> Result<PhpArray> {
    match require(path)? {
        PhpValue::Array(array) => Ok(array),
        other => Err(eyre::eyre!(
            "'{}' returned {} instead of an array",
            path.display(),
            other.type_name()
        )),
    }
}
