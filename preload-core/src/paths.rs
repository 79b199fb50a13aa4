//! Composer-compatible path arithmetic.
//!
//! Paths are handled as forward-slash strings rather than [`std::path::Path`]
//! values: the results end up embedded in generated PHP, so they must come
//! out identical on every platform.

use thiserror::Error;

use crate::quote_string;

/// Errors from path computations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("'{0}' is not an absolute path")]
    NotAbsolute(String),
}

/// Normalize a path: convert backslashes, collapse `.` and empty segments,
/// and resolve `..` where a parent is known.
///
/// Protocol (`phar://`) and drive (`c:`) prefixes are preserved, with the
/// drive letter upper-cased.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    let mut absolute = "";

    // UNC paths, e.g. //server/share
    if rest.starts_with("//") && rest.len() > 2 {
        absolute = "//";
        rest = &rest[2..];
    }

    let (prefix, tail) = split_prefix(rest);
    rest = tail;

    if let Some(tail) = rest.strip_prefix('/') {
        absolute = "/";
        rest = tail;
    }

    let mut parts: Vec<&str> = Vec::new();
    let mut up = false;
    for chunk in rest.split('/') {
        if chunk == ".." && (!absolute.is_empty() || up) {
            parts.pop();
            up = !(parts.is_empty() || parts.last() == Some(&".."));
        } else if chunk != "." && !chunk.is_empty() {
            parts.push(chunk);
            up = chunk != "..";
        }
    }

    format!("{}{}{}", upper_drive(prefix), absolute, parts.join("/"))
}

/// Split a leading `protocol:`, `protocol://`, `protocol://x:` or `x:` prefix.
fn split_prefix(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    let alnum = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();

    if alnum >= 2 && bytes.get(alnum) == Some(&b':') {
        let mut end = alnum + 1;
        if path[end..].starts_with("//") {
            end += 2;
            if is_drive(&bytes[end..]) {
                end += 2;
            }
        }
        return path.split_at(end);
    }

    if is_drive(bytes) {
        return path.split_at(2);
    }

    ("", path)
}

fn is_drive(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn upper_drive(prefix: &str) -> String {
    let len = prefix.len();
    let bare_drive = len == 2;
    let protocol_drive = len > 2 && prefix[..len - 2].ends_with("://");
    if (bare_drive || protocol_drive) && is_drive(&prefix.as_bytes()[len - 2..]) {
        let mut out = prefix[..len - 2].to_string();
        out.push_str(&prefix[len - 2..].to_ascii_uppercase());
        out
    } else {
        prefix.to_string()
    }
}

/// Check whether a path is absolute (`/x`, `c:...`, or `\\server`).
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/') || path.as_bytes().get(1) == Some(&b':') || path.starts_with("\\\\")
}

/// Parent directory with PHP `dirname` semantics.
pub fn dirname(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        None => ".".to_string(),
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches('/');
            if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            }
        }
    }
}

/// Last path component with PHP `basename` semantics.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

fn is_drive_root(path: &str) -> bool {
    let path = path.strip_suffix('/').unwrap_or(path);
    path.len() == 2 && is_drive(path.as_bytes())
}

/// Walk `to` upwards until it is a parent of (or equal to) `from`.
fn common_path(from: &str, to: &str) -> String {
    let from_dir = format!("{}/", from);
    let mut common = to.to_string();
    while !from_dir.starts_with(&format!("{}/", common))
        && common != "/"
        && common != "."
        && !is_drive_root(&common)
    {
        common = dirname(&common).replace('\\', "/");
    }
    common
}

fn ensure_absolute(from: &str, to: &str) -> Result<(), PathError> {
    for path in [from, to] {
        if !is_absolute_path(path) {
            return Err(PathError::NotAbsolute(path.to_string()));
        }
    }
    Ok(())
}

/// Shortest relative path from `from` to `to`.
///
/// With `directories`, `from` is treated as a directory rather than a file.
/// Unless `prefer_relative` is set, paths whose only common ancestor is `/`
/// and that would need more than one `../` are returned absolute.
pub fn find_shortest_path(
    from: &str,
    to: &str,
    directories: bool,
    prefer_relative: bool,
) -> Result<String, PathError> {
    ensure_absolute(from, to)?;

    let mut from = normalize_path(from);
    let to = normalize_path(to);

    if directories {
        from = format!("{}/dummy_file", from.trim_end_matches('/'));
    }

    if dirname(&from) == dirname(&to) {
        return Ok(format!("./{}", basename(&to)));
    }

    let common = common_path(&from, &to);

    // no commonality at all
    if !from.starts_with(&common) {
        return Ok(to);
    }

    let common = format!("{}/", common.trim_end_matches('/'));
    let depth = from
        .get(common.len()..)
        .unwrap_or("")
        .matches('/')
        .count();

    if !prefer_relative && common == "/" && depth > 1 {
        return Ok(to);
    }

    let result = format!(
        "{}{}",
        "../".repeat(depth),
        to.get(common.len()..).unwrap_or("")
    );
    if result.is_empty() {
        return Ok("./".to_string());
    }
    Ok(result)
}

/// PHP expression that evaluates to `to` when evaluated in a file living
/// in `from`.
///
/// The dynamic form nests `dirname(__DIR__)` calls; `static_code` produces
/// `__DIR__ . '/..'` instead, which is valid in constant expressions.
pub fn find_shortest_path_code(
    from: &str,
    to: &str,
    directories: bool,
    static_code: bool,
) -> Result<String, PathError> {
    ensure_absolute(from, to)?;

    let from = normalize_path(from);
    let to = normalize_path(to);

    if from == to {
        return Ok(if directories { "__DIR__" } else { "__FILE__" }.to_string());
    }

    let common = common_path(&from, &to);

    // no commonality at all
    if !from.starts_with(&common) {
        return Ok(quote_string(&to));
    }

    let common = format!("{}/", common.trim_end_matches('/'));
    if to.starts_with(&format!("{}/", from)) {
        return Ok(format!("__DIR__ . {}", quote_string(&to[from.len()..])));
    }

    let depth = from
        .get(common.len()..)
        .unwrap_or("")
        .matches('/')
        .count()
        + usize::from(directories);

    let common_code = if static_code {
        format!("__DIR__ . '{}'", "/..".repeat(depth))
    } else {
        format!("{}__DIR__{}", "dirname(".repeat(depth), ")".repeat(depth))
    };

    let rel_target = to.get(common.len()..).unwrap_or("");
    if rel_target.is_empty() {
        Ok(common_code)
    } else {
        Ok(format!(
            "{}.{}",
            common_code,
            quote_string(&format!("/{}", rel_target))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_segments() {
        assert_eq!(normalize_path("/foo/./bar//baz/"), "/foo/bar/baz");
        assert_eq!(normalize_path("/foo/bar/../baz"), "/foo/baz");
        assert_eq!(normalize_path("/project/"), "/project");
    }

    #[test]
    fn test_normalize_relative_parents() {
        assert_eq!(normalize_path("../foo"), "../foo");
        assert_eq!(normalize_path("foo/../../bar"), "../bar");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
    }

    #[test]
    fn test_normalize_absolute_cannot_escape_root() {
        assert_eq!(normalize_path("/../foo"), "/foo");
    }

    #[test]
    fn test_normalize_windows() {
        assert_eq!(normalize_path("c:\\project\\src\\..\\lib"), "C:/project/lib");
        assert_eq!(normalize_path("C:/"), "C:/");
        assert_eq!(normalize_path("\\\\server\\share\\x"), "//server/share/x");
    }

    #[test]
    fn test_normalize_protocol() {
        assert_eq!(
            normalize_path("phar:///project/app.phar/./src"),
            "phar:///project/app.phar/src"
        );
        assert_eq!(normalize_path("file://c:/x/../y"), "file://C:/y");
    }

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute_path("/foo"));
        assert!(is_absolute_path("C:/foo"));
        assert!(is_absolute_path("\\\\server\\share"));
        assert!(!is_absolute_path("foo/bar"));
        assert!(!is_absolute_path("./foo"));
    }

    #[test]
    fn test_dirname_and_basename() {
        assert_eq!(dirname("/a/b/c"), "/a/b");
        assert_eq!(dirname("/a"), "/");
        assert_eq!(dirname("/"), "/");
        assert_eq!(dirname("a"), ".");
        assert_eq!(basename("/a/b/c.php"), "c.php");
        assert_eq!(basename("/a/b/"), "b");
    }

    #[test]
    fn test_shortest_path() {
        let cases = [
            ("/foo/bar", "/foo/baz", false, "./baz"),
            ("/foo/bar", "/foo/baz", true, "../baz"),
            ("/foo/bar/", "/foo/bar", true, "./"),
            ("/foo/bar", "/foo/bar/baz/qux", true, "baz/qux"),
            ("/project", "/project/src/helpers.php", true, "src/helpers.php"),
            ("/project/sub", "/opt/lib/x.php", true, "/opt/lib/x.php"),
            ("/a", "/b", true, "../b"),
            ("C:/foo/bar", "C:/foo/baz", true, "../baz"),
        ];
        for (from, to, dirs, expected) in cases {
            assert_eq!(
                find_shortest_path(from, to, dirs, false).unwrap(),
                expected,
                "{} -> {}",
                from,
                to
            );
        }
    }

    #[test]
    fn test_shortest_path_prefer_relative() {
        assert_eq!(
            find_shortest_path("/project/sub", "/opt/lib/x.php", true, true).unwrap(),
            "../../opt/lib/x.php"
        );
    }

    #[test]
    fn test_shortest_path_code() {
        let cases = [
            ("/project/vendor/composer", "/project/vendor", "dirname(__DIR__)"),
            ("/project/vendor", "/project", "dirname(__DIR__)"),
            ("/project/vendor/composer", "/project", "dirname(dirname(__DIR__))"),
            ("/project/vendor", "/project/app", "dirname(__DIR__).'/app'"),
            ("/project", "/project/vendor", "__DIR__ . '/vendor'"),
            ("/project", "/project", "__DIR__"),
        ];
        for (from, to, expected) in cases {
            assert_eq!(
                find_shortest_path_code(from, to, true, false).unwrap(),
                expected,
                "{} -> {}",
                from,
                to
            );
        }
    }

    #[test]
    fn test_shortest_path_code_static() {
        assert_eq!(
            find_shortest_path_code("/project/vendor/composer", "/project/vendor", true, true)
                .unwrap(),
            "__DIR__ . '/..'"
        );
        assert_eq!(
            find_shortest_path_code("/project/vendor/composer", "/project", true, true).unwrap(),
            "__DIR__ . '/../..'"
        );
    }

    #[test]
    fn test_shortest_path_code_no_commonality() {
        assert_eq!(
            find_shortest_path_code("C:/project/vendor", "D:/lib", true, false).unwrap(),
            "'D:/lib'"
        );
    }

    #[test]
    fn test_shortest_path_code_requires_absolute() {
        assert_eq!(
            find_shortest_path_code("vendor", "/project", true, false),
            Err(PathError::NotAbsolute("vendor".to_string()))
        );
    }
}
