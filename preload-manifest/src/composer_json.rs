//! The root project's `composer.json`.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    Error, PackageDescriptor, Result,
    package::{DEFAULT_PACKAGE_TYPE, ROOT_FALLBACK_NAME, object_or_empty},
};

/// The parts of `composer.json` this tool reads.
#[derive(Debug, Default, Deserialize)]
pub struct ComposerJson {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "object_or_empty")]
    pub extra: Map<String, Value>,

    #[serde(default)]
    pub config: ComposerConfig,
}

/// The `config` section of `composer.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComposerConfig {
    pub vendor_dir: Option<String>,
}

impl ComposerJson {
    /// Read and parse a `composer.json` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse `composer.json` content, naming `filename` in diagnostics.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::parse(e, content, filename))
    }

    /// Descriptor of the root package.
    pub fn root_package(&self) -> PackageDescriptor {
        PackageDescriptor {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| ROOT_FALLBACK_NAME.to_string()),
            kind: self
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_PACKAGE_TYPE.to_string()),
            extra: self.extra.clone(),
            install_path: None,
        }
    }
}
