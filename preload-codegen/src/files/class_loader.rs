//! The tables Composer's `ClassLoader` builds from the PSR-0, PSR-4 and
//! class-map files, in the shape `autoload_static.php` stores them.

use preload_core::OrderedMap;
use thiserror::Error;

use crate::php::{PhpArray, PhpKey, PhpValue, push};

/// Arrays grouped by the first character of their prefix.
type Grouped = OrderedMap<PhpKey, PhpArray>;

/// A PHP autoload file held data the class loader rejects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("a non-empty PSR-4 prefix must end with a namespace separator, got '{0}'")]
    InvalidPsr4Prefix(String),
}

/// Class loader state, ready to be exported property by property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassLoaderTables {
    prefix_lengths_psr4: Grouped,
    prefix_dirs_psr4: PhpArray,
    fallback_dirs_psr4: PhpArray,
    prefixes_psr0: Grouped,
    fallback_dirs_psr0: PhpArray,
    class_map: PhpArray,
}

impl ClassLoaderTables {
    /// Register every prefix of the namespace and PSR-4 maps and the class map.
    pub fn build(
        namespaces: &PhpArray,
        psr4: &PhpArray,
        class_map: &PhpArray,
    ) -> Result<Self, TemplateError> {
        let mut tables = Self::default();
        for (prefix, paths) in namespaces {
            tables.set(prefix, paths);
        }
        for (prefix, paths) in psr4 {
            tables.set_psr4(prefix, paths)?;
        }
        tables.class_map = class_map.clone();
        Ok(tables)
    }

    /// Non-empty tables by `ClassLoader` property name, in export order.
    pub fn properties(&self) -> Vec<(&'static str, PhpArray)> {
        [
            ("prefixLengthsPsr4", flatten(&self.prefix_lengths_psr4)),
            ("prefixDirsPsr4", self.prefix_dirs_psr4.clone()),
            ("fallbackDirsPsr4", self.fallback_dirs_psr4.clone()),
            ("prefixesPsr0", flatten(&self.prefixes_psr0)),
            ("fallbackDirsPsr0", self.fallback_dirs_psr0.clone()),
            ("classMap", self.class_map.clone()),
        ]
        .into_iter()
        .filter(|(_, table)| !table.is_empty())
        .collect()
    }

    fn set(&mut self, prefix: &PhpKey, paths: &PhpValue) {
        let Some(prefix) = non_empty_prefix(prefix) else {
            self.fallback_dirs_psr0 = to_list(paths);
            return;
        };
        let first = first_char_key(&prefix);
        self.prefixes_psr0
            .entry(first)
            .or_default()
            .insert(PhpKey::from_string(prefix), PhpValue::Array(to_list(paths)));
    }

    fn set_psr4(&mut self, prefix: &PhpKey, paths: &PhpValue) -> Result<(), TemplateError> {
        let Some(prefix) = non_empty_prefix(prefix) else {
            self.fallback_dirs_psr4 = to_list(paths);
            return Ok(());
        };
        if !prefix.ends_with('\\') {
            return Err(TemplateError::InvalidPsr4Prefix(prefix));
        }

        let length = i64::try_from(prefix.len()).unwrap_or(i64::MAX);
        let first = first_char_key(&prefix);
        self.prefix_lengths_psr4
            .entry(first)
            .or_default()
            .insert(PhpKey::from_string(prefix.clone()), PhpValue::Int(length));
        self.prefix_dirs_psr4.insert(
            PhpKey::from_string(prefix),
            PhpValue::Array(to_list(paths)),
        );
        Ok(())
    }
}

/// The prefix as a string, or `None` when PHP considers it falsy.
fn non_empty_prefix(prefix: &PhpKey) -> Option<String> {
    match prefix {
        PhpKey::Int(0) => None,
        PhpKey::Int(n) => Some(n.to_string()),
        PhpKey::Str(s) if s.is_empty() => None,
        PhpKey::Str(s) => Some(s.clone()),
    }
}

/// Group key of a prefix.
///
/// `ClassLoader` uses the first byte (`$prefix[0]`). That is the same for
/// ASCII prefixes; a non-ASCII prefix is grouped by its whole first character
/// instead, since a lone UTF-8 lead byte is not a valid key here. The loader
/// only uses the group to narrow its lookup, so both forms resolve classes.
fn first_char_key(prefix: &str) -> PhpKey {
    PhpKey::from_string(prefix.chars().next().map(String::from).unwrap_or_default())
}

fn flatten(groups: &Grouped) -> PhpArray {
    groups
        .iter()
        .map(|(key, group)| (key.clone(), PhpValue::Array(group.clone())))
        .collect()
}

/// PHP's `(array)` cast.
fn to_list(value: &PhpValue) -> PhpArray {
    match value {
        PhpValue::Array(array) => array.clone(),
        PhpValue::Null => PhpArray::new(),
        scalar => {
            let mut array = PhpArray::new();
            push(&mut array, scalar.clone());
            array
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(items: &[&str]) -> PhpArray {
        let mut array = PhpArray::new();
        for item in items {
            push(&mut array, PhpValue::from(*item));
        }
        array
    }

    fn list(items: &[&str]) -> PhpValue {
        PhpValue::Array(array(items))
    }

    fn map(entries: Vec<(&str, PhpValue)>) -> PhpArray {
        entries
            .into_iter()
            .map(|(k, v)| (PhpKey::from(k), v))
            .collect()
    }

    #[test]
    fn test_psr4_tables() {
        let psr4 = map(vec![
            ("App\\", list(&["/p/app"])),
            ("Acme\\Lib\\", list(&["/p/vendor/acme/lib/src", "/p/vendor/acme/lib/alt"])),
        ]);

        let tables = ClassLoaderTables::build(&PhpArray::new(), &psr4, &PhpArray::new()).unwrap();
        let props = tables.properties();

        assert_eq!(
            props.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            vec!["prefixLengthsPsr4", "prefixDirsPsr4"]
        );
        let lengths = &props[0].1;
        assert_eq!(lengths.len(), 1);
        let by_a = lengths[&PhpKey::from("A")].as_array().unwrap();
        assert_eq!(by_a[&PhpKey::from("App\\")], PhpValue::Int(4));
        assert_eq!(by_a[&PhpKey::from("Acme\\Lib\\")], PhpValue::Int(9));
        assert_eq!(props[1].1[&PhpKey::from("App\\")], list(&["/p/app"]));
    }

    #[test]
    fn test_fallback_dirs() {
        let namespaces = map(vec![("", PhpValue::from("/p/lib"))]);
        let psr4 = map(vec![("", list(&["/p/src"]))]);

        let tables = ClassLoaderTables::build(&namespaces, &psr4, &PhpArray::new()).unwrap();

        assert_eq!(
            tables.properties(),
            vec![
                ("fallbackDirsPsr4", array(&["/p/src"])),
                ("fallbackDirsPsr0", array(&["/p/lib"])),
            ]
        );
    }

    #[test]
    fn test_psr0_grouped_by_first_char() {
        let namespaces = map(vec![
            ("Twig_", list(&["/p/vendor/twig/lib"])),
            ("Tests", list(&["/p/tests"])),
        ]);

        let tables =
            ClassLoaderTables::build(&namespaces, &PhpArray::new(), &PhpArray::new()).unwrap();
        let props = tables.properties();

        assert_eq!(props.len(), 1);
        assert_eq!(props[0].0, "prefixesPsr0");
        let by_t = props[0].1[&PhpKey::from("T")].as_array().unwrap();
        assert_eq!(by_t.len(), 2);
    }

    #[test]
    fn test_group_key_of_non_ascii_prefix() {
        let psr4 = map(vec![("Ünicode\\", list(&["/p/u"])), ("Up\\", list(&["/p/up"]))]);

        let tables = ClassLoaderTables::build(&PhpArray::new(), &psr4, &PhpArray::new()).unwrap();
        let lengths = &tables.properties()[0].1;

        assert_eq!(
            lengths.keys().collect::<Vec<_>>(),
            vec![&PhpKey::from("Ü"), &PhpKey::from("U")]
        );
        let by_u_umlaut = lengths[&PhpKey::from("Ü")].as_array().unwrap();
        assert_eq!(by_u_umlaut[&PhpKey::from("Ünicode\\")], PhpValue::Int(9));
    }

    #[test]
    fn test_invalid_psr4_prefix() {
        let psr4 = map(vec![("App", list(&["/p/app"]))]);

        let err = ClassLoaderTables::build(&PhpArray::new(), &psr4, &PhpArray::new()).unwrap_err();
        assert_eq!(err, TemplateError::InvalidPsr4Prefix("App".into()));
    }

    #[test]
    fn test_empty_tables_are_omitted() {
        let tables =
            ClassLoaderTables::build(&PhpArray::new(), &PhpArray::new(), &PhpArray::new())
                .unwrap();
        assert!(tables.properties().is_empty());
    }
}
