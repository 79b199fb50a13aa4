/// Quote a string the way PHP's `var_export` does.
///
/// Backslashes and single quotes are escaped; NUL bytes are spliced in
/// as a double-quoted `"\0"` segment.
pub fn quote_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
    let escaped = escaped.replace('\0', "' . \"\\0\" . '");
    format!("'{}'", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote_string("/src/helpers.php"), "'/src/helpers.php'");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote_string("App\\"), "'App\\\\'");
        assert_eq!(quote_string("it's"), "'it\\'s'");
    }

    #[test]
    fn test_quote_nul() {
        assert_eq!(quote_string("a\0b"), "'a' . \"\\0\" . 'b'");
    }
}
