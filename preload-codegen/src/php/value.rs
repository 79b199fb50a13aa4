//! Values of the PHP subset found in Composer's generated data files.

use std::fmt;

use preload_core::{OrderedMap, quote_string};

/// Ordered PHP array.
pub type PhpArray = OrderedMap<PhpKey, PhpValue>;

/// An array key. PHP stores canonical decimal strings as integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhpKey {
    Int(i64),
    Str(String),
}

impl PhpKey {
    /// Key for a string, applying PHP's integer-string coercion.
    pub fn from_string(s: impl Into<String>) -> Self {
        let s = s.into();
        match canonical_int(&s) {
            Some(n) => Self::Int(n),
            None => Self::Str(s),
        }
    }

    /// The key as PHP would print it when cast to string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for PhpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PhpKey {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse().ok()
}

/// A PHP value.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Array(PhpArray),
}

impl PhpValue {
    /// String conversion as done by PHP's `.` operator; `None` for arrays.
    pub fn to_php_string(&self) -> Option<String> {
        match self {
            Self::Null | Self::Bool(false) => Some(String::new()),
            Self::Bool(true) => Some("1".to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::Array(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&PhpArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Short name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
        }
    }
}

impl From<&str> for PhpValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for PhpValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for PhpValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<PhpArray> for PhpValue {
    fn from(a: PhpArray) -> Self {
        Self::Array(a)
    }
}

/// Append to an array with the next free integer key, like `$a[] = $v`.
pub fn push(array: &mut PhpArray, value: PhpValue) {
    let next = array
        .keys()
        .filter_map(|k| match k {
            PhpKey::Int(n) => Some(*n),
            PhpKey::Str(_) => None,
        })
        .max()
        .map_or(0, |n| n + 1);
    array.insert(PhpKey::Int(next), value);
}

/// Render a value like PHP's `var_export`.
pub fn var_export(value: &PhpValue) -> String {
    let mut out = String::new();
    export_into(value, 0, &mut out);
    out
}

fn export_into(value: &PhpValue, level: usize, out: &mut String) {
    match value {
        PhpValue::Null => out.push_str("NULL"),
        PhpValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        PhpValue::Int(n) => out.push_str(&n.to_string()),
        PhpValue::Str(s) => out.push_str(&quote_string(s)),
        PhpValue::Array(array) => {
            let pad = "  ".repeat(level + 1);
            out.push_str("array (\n");
            for (key, item) in array {
                out.push_str(&pad);
                match key {
                    PhpKey::Int(n) => out.push_str(&n.to_string()),
                    PhpKey::Str(s) => out.push_str(&quote_string(s)),
                }
                out.push_str(" => ");
                if matches!(item, PhpValue::Array(_)) {
                    out.push('\n');
                    out.push_str(&pad);
                }
                export_into(item, level + 1, out);
                out.push_str(",\n");
            }
            out.push_str(&"  ".repeat(level));
            out.push(')');
        }
    }
}

/// Replace substrings like PHP's array form of `strtr`.
///
/// At each position the longest matching key wins and replaced text is
/// never scanned again.
pub fn strtr(input: &str, pairs: &[(String, String)]) -> String {
    let mut pairs: Vec<&(String, String)> = pairs.iter().filter(|(k, _)| !k.is_empty()).collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    'scan: while !rest.is_empty() {
        for (from, to) in &pairs {
            if let Some(tail) = rest.strip_prefix(from.as_str()) {
                out.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}
