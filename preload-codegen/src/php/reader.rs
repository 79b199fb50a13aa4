//! Evaluator for the PHP subset Composer writes into its generated data files.
//!
//! Supported: the `<?php` open tag, comments, `$var = expr;`, `return expr;`,
//! single- and double-quoted strings, integers, `true`/`false`/`null`,
//! `__DIR__`, `__FILE__`, variables, `dirname(expr[, levels])`, `.`
//! concatenation, and `array(...)` / `[...]` literals with optional keys.

use std::collections::HashMap;

use preload_core::dirname;
use thiserror::Error;

use super::value::{PhpArray, PhpKey, PhpValue, push};

/// A PHP data file could not be evaluated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("missing '<?php' open tag")]
    MissingOpenTag,

    #[error("unexpected {found} at byte {offset}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        offset: usize,
    },

    #[error("unterminated string starting at byte {0}")]
    UnterminatedString(usize),

    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("integer out of range at byte {0}")]
    IntegerOverflow(usize),

    #[error("undefined variable ${name} at byte {offset}")]
    UndefinedVariable { name: String, offset: usize },

    #[error("unsupported function '{name}' at byte {offset}")]
    UnsupportedFunction { name: String, offset: usize },

    #[error("cannot use {found} as {expected} at byte {offset}")]
    Type {
        found: &'static str,
        expected: &'static str,
        offset: usize,
    },

    #[error("file has no return statement")]
    MissingReturn,
}

/// Evaluate `source` as the PHP file at `file` and return what it returns.
///
/// `file` must be the normalized absolute path of the file, since it
/// determines `__FILE__` and `__DIR__`.
pub fn evaluate(source: &str, file: &str) -> Result<PhpValue, ReadError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        file: file.to_string(),
        dir: dirname(file),
        vars: HashMap::new(),
    };
    parser.file_body()
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    OpenTag,
    Str(String),
    Int(i64),
    Var(String),
    Ident(String),
    Sym(&'static str),
    Eof,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Self::OpenTag => "'<?php'".to_string(),
            Self::Str(_) => "string".to_string(),
            Self::Int(_) => "integer".to_string(),
            Self::Var(name) => format!("${name}"),
            Self::Ident(name) => format!("'{name}'"),
            Self::Sym(s) => format!("'{s}'"),
            Self::Eof => "end of file".to_string(),
        }
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

const SYMBOLS: [&str; 10] = ["=>", "(", ")", "[", "]", ",", ";", ".", "=", "-"];

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn tokenize(mut self) -> Result<Vec<(Tok, usize)>, ReadError> {
        let src = self.src.trim_start_matches('\u{feff}');
        self.pos = self.src.len() - src.len();
        if !self.rest().starts_with("<?php") {
            return Err(ReadError::MissingOpenTag);
        }
        let mut tokens = vec![(Tok::OpenTag, self.pos)];
        self.pos += "<?php".len();

        loop {
            self.skip_trivia()?;
            let start = self.pos;
            let Some(c) = self.rest().chars().next() else {
                tokens.push((Tok::Eof, start));
                return Ok(tokens);
            };

            let tok = match c {
                '\'' => Tok::Str(self.single_quoted()?),
                '"' => Tok::Str(self.double_quoted()?),
                '$' => {
                    self.pos += 1;
                    let name = self.word();
                    if name.is_empty() {
                        return Err(self.unexpected("variable name"));
                    }
                    Tok::Var(name.to_string())
                }
                '0'..='9' => {
                    let digits = self.take_while(|c| c.is_ascii_digit());
                    Tok::Int(
                        digits
                            .parse()
                            .map_err(|_| ReadError::IntegerOverflow(start))?,
                    )
                }
                c if c == '_' || c == '\\' || c.is_ascii_alphabetic() => {
                    let word =
                        self.take_while(|c| c == '_' || c == '\\' || c.is_ascii_alphanumeric());
                    Tok::Ident(word.trim_start_matches('\\').to_string())
                }
                _ => {
                    let Some(sym) = SYMBOLS.iter().find(|s| self.rest().starts_with(**s)) else {
                        return Err(self.unexpected("expression"));
                    };
                    self.pos += sym.len();
                    Tok::Sym(*sym)
                }
            };
            tokens.push((tok, start));
        }
    }

    fn unexpected(&self, expected: &'static str) -> ReadError {
        let found = self
            .rest()
            .chars()
            .next()
            .map_or_else(|| "end of file".to_string(), |c| format!("'{c}'"));
        ReadError::Unexpected {
            found,
            expected,
            offset: self.pos,
        }
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !f(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn word(&mut self) -> &'a str {
        self.take_while(|c| c == '_' || c.is_ascii_alphanumeric())
    }

    fn skip_trivia(&mut self) -> Result<(), ReadError> {
        loop {
            self.take_while(char::is_whitespace);
            let rest = self.rest();
            if rest.starts_with("//") || rest.starts_with('#') {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.pos += len;
            } else if rest.starts_with("/*") {
                let Some(end) = rest[2..].find("*/") else {
                    return Err(ReadError::UnterminatedComment(self.pos));
                };
                self.pos += end + 4;
            } else {
                return Ok(());
            }
        }
    }

    fn single_quoted(&mut self) -> Result<String, ReadError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '\'' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.clone().next() {
                    Some((_, next @ ('\\' | '\''))) => {
                        out.push(next);
                        chars.next();
                    }
                    _ => out.push('\\'),
                },
                c => out.push(c),
            }
        }
        Err(ReadError::UnterminatedString(start))
    }

    fn double_quoted(&mut self) -> Result<String, ReadError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '$' => {
                    return Err(ReadError::Unexpected {
                        found: "'$'".to_string(),
                        expected: "string without interpolation",
                        offset: self.pos + i,
                    });
                }
                '\\' => {
                    let escaped = match chars.clone().next() {
                        Some((_, 'n')) => Some('\n'),
                        Some((_, 't')) => Some('\t'),
                        Some((_, 'r')) => Some('\r'),
                        Some((_, '0')) => Some('\0'),
                        Some((_, '\\')) => Some('\\'),
                        Some((_, '"')) => Some('"'),
                        Some((_, '$')) => Some('$'),
                        _ => None,
                    };
                    match escaped {
                        Some(e) => {
                            out.push(e);
                            chars.next();
                        }
                        None => out.push('\\'),
                    }
                }
                c => out.push(c),
            }
        }
        Err(ReadError::UnterminatedString(start))
    }
}

static EOF: Tok = Tok::Eof;

struct Parser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
    file: String,
    dir: String,
    vars: HashMap<String, PhpValue>,
}

impl Parser {
    fn peek(&self) -> &Tok {
        self.tokens.get(self.pos).map_or(&EOF, |(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, o)| *o)
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &'static str) -> ReadError {
        ReadError::Unexpected {
            found: self.peek().describe(),
            expected,
            offset: self.offset(),
        }
    }

    fn eat(&mut self, sym: &str) -> bool {
        if matches!(self.peek(), Tok::Sym(s) if *s == sym) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, sym: &'static str) -> Result<(), ReadError> {
        if self.eat(sym) {
            Ok(())
        } else {
            Err(self.unexpected(sym))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Tok::Ident(w) if w.eq_ignore_ascii_case(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn file_body(&mut self) -> Result<PhpValue, ReadError> {
        self.bump();
        loop {
            match self.peek().clone() {
                Tok::Eof => return Err(ReadError::MissingReturn),
                Tok::Sym(";") => {
                    self.bump();
                }
                Tok::Var(name) => {
                    self.bump();
                    self.expect("=")?;
                    let value = self.expr()?;
                    self.expect(";")?;
                    self.vars.insert(name, value);
                }
                Tok::Ident(_) if self.eat_keyword("return") => {
                    return self.expr();
                }
                _ => return Err(self.unexpected("statement")),
            }
        }
    }

    fn expr(&mut self) -> Result<PhpValue, ReadError> {
        let mut value = self.term()?;
        while matches!(self.peek(), Tok::Sym(".")) {
            let offset = self.offset();
            self.bump();
            let rhs = self.term()?;
            let joined = concat(&value, &rhs, offset)?;
            value = PhpValue::Str(joined);
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<PhpValue, ReadError> {
        let offset = self.offset();
        match self.bump() {
            Tok::Str(s) => Ok(PhpValue::Str(s)),
            Tok::Int(n) => Ok(PhpValue::Int(n)),
            Tok::Sym("-") => match self.bump() {
                Tok::Int(n) => Ok(PhpValue::Int(-n)),
                _ => {
                    self.pos -= 1;
                    Err(self.unexpected("integer"))
                }
            },
            Tok::Sym("(") => {
                let value = self.expr()?;
                self.expect(")")?;
                Ok(value)
            }
            Tok::Sym("[") => self.array_body("]"),
            Tok::Var(name) => self
                .vars
                .get(&name)
                .cloned()
                .ok_or(ReadError::UndefinedVariable { name, offset }),
            Tok::Ident(word) => self.ident(&word, offset),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("expression"))
            }
        }
    }

    fn ident(&mut self, word: &str, offset: usize) -> Result<PhpValue, ReadError> {
        match word.to_ascii_lowercase().as_str() {
            "true" => Ok(PhpValue::Bool(true)),
            "false" => Ok(PhpValue::Bool(false)),
            "null" => Ok(PhpValue::Null),
            "__dir__" => Ok(PhpValue::Str(self.dir.clone())),
            "__file__" => Ok(PhpValue::Str(self.file.clone())),
            "array" => {
                self.expect("(")?;
                self.array_body(")")
            }
            "dirname" => {
                self.expect("(")?;
                let path = self.expr()?;
                let levels = if self.eat(",") {
                    let at = self.offset();
                    match self.expr()? {
                        PhpValue::Int(n) if n >= 1 => n,
                        other => {
                            return Err(ReadError::Type {
                                found: other.type_name(),
                                expected: "positive level count",
                                offset: at,
                            });
                        }
                    }
                } else {
                    1
                };
                self.expect(")")?;
                let Some(mut path) = path.to_php_string() else {
                    return Err(ReadError::Type {
                        found: "array",
                        expected: "path",
                        offset,
                    });
                };
                for _ in 0..levels {
                    path = dirname(&path);
                }
                Ok(PhpValue::Str(path))
            }
            _ => Err(ReadError::UnsupportedFunction {
                name: word.to_string(),
                offset,
            }),
        }
    }

    fn array_body(&mut self, close: &'static str) -> Result<PhpValue, ReadError> {
        let mut array = PhpArray::new();
        loop {
            if self.eat(close) {
                return Ok(PhpValue::Array(array));
            }
            let key_offset = self.offset();
            let first = self.expr()?;
            if self.eat("=>") {
                let value = self.expr()?;
                array.insert(to_key(first, key_offset)?, value);
            } else {
                push(&mut array, first);
            }
            if !self.eat(",") {
                self.expect(close)?;
                return Ok(PhpValue::Array(array));
            }
        }
    }
}

fn concat(lhs: &PhpValue, rhs: &PhpValue, offset: usize) -> Result<String, ReadError> {
    let as_string = |v: &PhpValue| {
        v.to_php_string().ok_or(ReadError::Type {
            found: "array",
            expected: "string",
            offset,
        })
    };
    Ok(as_string(lhs)? + &as_string(rhs)?)
}

fn to_key(value: PhpValue, offset: usize) -> Result<PhpKey, ReadError> {
    match value {
        PhpValue::Str(s) => Ok(PhpKey::from_string(s)),
        PhpValue::Int(n) => Ok(PhpKey::Int(n)),
        PhpValue::Bool(b) => Ok(PhpKey::Int(i64::from(b))),
        PhpValue::Null => Ok(PhpKey::Str(String::new())),
        PhpValue::Array(_) => Err(ReadError::Type {
            found: "array",
            expected: "array key",
            offset,
        }),
    }
}
