//! Package descriptors and the graph they come from.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Name Composer gives a root package that does not declare one.
pub const ROOT_FALLBACK_NAME: &str = "__root__";

/// Package type Composer assumes when none is declared.
pub const DEFAULT_PACKAGE_TYPE: &str = "library";

/// A package's identity and metadata.
///
/// A read-only snapshot for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    /// Package name, e.g. `vendor/package`.
    pub name: String,
    /// Composer package type (`library`, `metapackage`, ...).
    pub kind: String,
    /// Free-form `extra` configuration.
    pub extra: Map<String, Value>,
    /// Absolute, normalized install directory. `None` for the root package
    /// and for packages that are not installed on disk.
    pub install_path: Option<String>,
}

impl PackageDescriptor {
    /// Create a library package without extra configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DEFAULT_PACKAGE_TYPE.to_string(),
            extra: Map::new(),
            install_path: None,
        }
    }

    /// Set the package type.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set an `extra` configuration key.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Set the install directory.
    pub fn installed_at(mut self, path: impl AsRef<str>) -> Self {
        self.install_path = Some(preload_core::normalize_path(path.as_ref()));
        self
    }

    /// Whether this is a metapackage (compared case-insensitively).
    pub fn is_metapackage(&self) -> bool {
        self.kind.eq_ignore_ascii_case("metapackage")
    }
}

/// Source of the root package and the installed packages.
///
/// Implemented by [`crate::ComposerProject`] for real projects; tests can
/// implement it over plain vectors.
pub trait PackageGraph {
    /// The root project.
    fn root_package(&self) -> &PackageDescriptor;

    /// Every installed package, in enumeration order.
    fn installed_packages(&self) -> &[PackageDescriptor];
}

/// Deserialize an `extra`-style field, treating anything but an object as empty.
///
/// PHP encodes an empty associative array as `[]`, so a list shows up where
/// a map is expected.
pub(crate) fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let pkg = PackageDescriptor::new("acme/tools");
        assert_eq!(pkg.kind, "library");
        assert!(pkg.extra.is_empty());
        assert!(pkg.install_path.is_none());
    }

    #[test]
    fn test_installed_at_normalizes() {
        let pkg =
            PackageDescriptor::new("acme/tools").installed_at("/project/vendor/./acme/tools/");
        assert_eq!(pkg.install_path.as_deref(), Some("/project/vendor/acme/tools"));
    }

    #[test]
    fn test_metapackage_any_case() {
        assert!(PackageDescriptor::new("a/b").kind("metapackage").is_metapackage());
        assert!(PackageDescriptor::new("a/b").kind("MetaPackage").is_metapackage());
        assert!(!PackageDescriptor::new("a/b").kind("library").is_metapackage());
    }

    #[test]
    fn test_object_or_empty() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "object_or_empty")]
            extra: Map<String, Value>,
        }

        let holder: Holder = serde_json::from_value(json!({ "extra": [] })).unwrap();
        assert!(holder.extra.is_empty());

        let holder: Holder = serde_json::from_value(json!({ "extra": { "a": 1 } })).unwrap();
        assert_eq!(holder.extra.get("a"), Some(&json!(1)));

        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(holder.extra.is_empty());
    }
}
