//! CSS component-value tokenizer
//!
//! Turns declaration values and at-rule preludes into a small tree of
//! `ComponentValue`s. Values are never interpreted: the tree only exists so
//! nested `calc()`/`var()` parentheses round-trip exactly and so preludes can
//! be compared after normalization.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One CSS component value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ComponentValue {
    /// Identifier (`auto`, `-webkit-box`, `--gap`)
    Ident(String),
    /// Number with its unit or `%`, exactly as written (`1.5em`, `-2`, `50%`)
    Number(String),
    /// Hash token without the `#` (`fff`)
    Hash(String),
    /// Quoted string, quotes and escapes included
    Str(String),
    /// Unquoted `url(...)` body
    Url(String),
    /// Function call with its arguments (`rgba(0,0,0,.5)`)
    Function {
        /// Function name, case preserved
        name: String,
        /// Argument tokens
        args: Vec<ComponentValue>,
    },
    /// Simple block opened by `(`, `[` or `{`
    Block {
        /// Opening character
        open: char,
        /// Tokens inside the block
        contents: Vec<ComponentValue>,
    },
    /// Any other single character (`,`, `/`, `!`, `:`)
    Delim(char),
    /// A run of whitespace or comments
    Whitespace,
}

/// Error type for tokenization failures
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenizeError {
    /// A closing bracket with no matching opener
    UnexpectedClose {
        /// Byte offset of the bracket
        offset: usize,
        /// The bracket
        ch: char,
    },
    /// An opening bracket that is never closed
    Unclosed {
        /// Byte offset of the bracket
        offset: usize,
        /// The bracket
        ch: char,
    },
    /// A string that hits a newline or the end of input before its quote
    UnterminatedString {
        /// Byte offset of the opening quote
        offset: usize,
    },
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::UnexpectedClose { ch, .. } => write!(f, "unexpected '{}'", ch),
            TokenizeError::Unclosed { ch, .. } => write!(f, "unclosed '{}'", ch),
            TokenizeError::UnterminatedString { .. } => write!(f, "unterminated string"),
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Tokenize a value or prelude.
///
/// # Example
/// ```
/// use stylefold::tokenizer::{tokenize, to_css};
///
/// let tokens = tokenize("calc(100% - var(--gap))").unwrap();
/// assert_eq!(to_css(&tokens), "calc(100% - var(--gap))");
/// ```
pub fn tokenize(input: &str) -> Result<Vec<ComponentValue>, TokenizeError> {
    let mut tokenizer = Tokenizer { input, pos: 0 };
    tokenizer.consume_list(None)
}

/// Render tokens back to text, collapsing whitespace runs to one space.
pub fn to_css(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    write_css(&mut out, values);
    out
}

/// Render tokens in canonical form for comparing preludes.
///
/// Whitespace is collapsed and trimmed inside blocks, `:` and `,` are
/// followed by exactly one space, and with `lowercase` identifiers, function
/// names and units are lowercased. Strings and `url()` bodies are kept.
pub fn to_canonical(values: &[ComponentValue], lowercase: bool) -> String {
    let mut out = String::new();
    write_canonical(&mut out, values, lowercase);
    out
}

/// Drop leading and trailing whitespace tokens.
pub fn trim(values: &[ComponentValue]) -> &[ComponentValue] {
    let start = values
        .iter()
        .position(|v| *v != ComponentValue::Whitespace)
        .unwrap_or(values.len());
    let end = values
        .iter()
        .rposition(|v| *v != ComponentValue::Whitespace)
        .map_or(start, |i| i + 1);
    &values[start..end]
}

fn write_css(out: &mut String, values: &[ComponentValue]) {
    for value in values {
        match value {
            ComponentValue::Ident(s) | ComponentValue::Number(s) | ComponentValue::Str(s) => {
                out.push_str(s)
            }
            ComponentValue::Hash(s) => {
                out.push('#');
                out.push_str(s);
            }
            ComponentValue::Url(s) => {
                out.push_str("url(");
                out.push_str(s);
                out.push(')');
            }
            ComponentValue::Function { name, args } => {
                out.push_str(name);
                out.push('(');
                write_css(out, args);
                out.push(')');
            }
            ComponentValue::Block { open, contents } => {
                out.push(*open);
                write_css(out, contents);
                out.push(closing_for(*open));
            }
            ComponentValue::Delim(c) => out.push(*c),
            ComponentValue::Whitespace => out.push(' '),
        }
    }
}

fn write_canonical(out: &mut String, values: &[ComponentValue], lowercase: bool) {
    let mut pending_space = false;
    for value in trim(values) {
        match value {
            ComponentValue::Whitespace => {
                pending_space = true;
                continue;
            }
            ComponentValue::Delim(c @ (':' | ',')) => {
                out.push(*c);
                pending_space = true;
                continue;
            }
            _ => {}
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match value {
            ComponentValue::Ident(s) | ComponentValue::Number(s) if lowercase => {
                out.push_str(&s.to_ascii_lowercase())
            }
            ComponentValue::Function { name, args } => {
                if lowercase {
                    out.push_str(&name.to_ascii_lowercase());
                } else {
                    out.push_str(name);
                }
                out.push('(');
                write_canonical(out, args, lowercase);
                out.push(')');
            }
            ComponentValue::Block { open, contents } => {
                out.push(*open);
                write_canonical(out, contents, lowercase);
                out.push(closing_for(*open));
            }
            other => write_css(out, core::slice::from_ref(other)),
        }
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl Tokenizer<'_> {
    fn consume_list(&mut self, closing: Option<(char, usize)>) -> Result<Vec<ComponentValue>, TokenizeError> {
        let mut values = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return match closing {
                    Some((ch, offset)) => Err(TokenizeError::Unclosed {
                        offset,
                        ch: opening_for(ch),
                    }),
                    None => Ok(values),
                };
            };

            if Some(c) == closing.map(|(ch, _)| ch) {
                self.bump();
                return Ok(values);
            }

            match c {
                c if c.is_whitespace() => {
                    self.skip_whitespace_and_comments();
                    push_whitespace(&mut values);
                }
                '/' if self.starts_with("/*") => {
                    self.skip_whitespace_and_comments();
                    push_whitespace(&mut values);
                }
                ')' | ']' | '}' => {
                    return Err(TokenizeError::UnexpectedClose {
                        offset: self.pos,
                        ch: c,
                    });
                }
                '(' | '[' | '{' => {
                    let offset = self.pos;
                    self.bump();
                    let contents = self.consume_list(Some((closing_for(c), offset)))?;
                    values.push(ComponentValue::Block { open: c, contents });
                }
                '"' | '\'' => values.push(ComponentValue::Str(self.consume_string()?)),
                '#' if self.peek_at(1).is_some_and(is_name_char) => {
                    self.bump();
                    values.push(ComponentValue::Hash(self.consume_name()));
                }
                _ if self.starts_number() => values.push(ComponentValue::Number(self.consume_number())),
                _ if self.starts_ident() => values.push(self.consume_ident_like()?),
                _ => {
                    self.bump();
                    values.push(ComponentValue::Delim(c));
                }
            }
        }
    }

    fn consume_ident_like(&mut self) -> Result<ComponentValue, TokenizeError> {
        let name = self.consume_name();
        if self.peek() != Some('(') {
            return Ok(ComponentValue::Ident(name));
        }
        let open = self.pos;
        self.bump();

        if name.eq_ignore_ascii_case("url") {
            let rest = &self.input[self.pos..];
            let first = rest.trim_start().chars().next();
            if !matches!(first, Some('"') | Some('\'')) {
                return match rest.find(')') {
                    Some(end) => {
                        let body = rest[..end].trim().into();
                        self.pos += end + 1;
                        Ok(ComponentValue::Url(body))
                    }
                    None => Err(TokenizeError::Unclosed {
                        offset: open,
                        ch: '(',
                    }),
                };
            }
        }

        let args = self.consume_list(Some((')', open)))?;
        Ok(ComponentValue::Function { name, args })
    }

    fn consume_string(&mut self) -> Result<String, TokenizeError> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\n' => break,
                c if c == quote => return Ok(self.input[start..self.pos].into()),
                _ => {}
            }
        }
        Err(TokenizeError::UnterminatedString { offset: start })
    }

    fn consume_number(&mut self) -> String {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        if self.peek() == Some('%') {
            self.bump();
        } else {
            while self.peek().is_some_and(is_name_char) {
                self.bump();
            }
        }
        self.input[start..self.pos].into()
    }

    fn consume_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                self.bump();
            } else if is_name_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.pos].into()
    }

    fn starts_number(&self) -> bool {
        let digit_at = |n| self.peek_at(n).is_some_and(|c: char| c.is_ascii_digit());
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => digit_at(1),
            Some('+') | Some('-') => digit_at(1) || (self.peek_at(1) == Some('.') && digit_at(2)),
            _ => false,
        }
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('-') => true,
                Some(c) => is_name_start(c) || c == '\\',
                None => false,
            },
            Some('\\') => self.peek_at(1).is_some(),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else if self.starts_with("/*") {
                match self.input[self.pos + 2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

fn push_whitespace(values: &mut Vec<ComponentValue>) {
    if values.last() != Some(&ComponentValue::Whitespace) {
        values.push(ComponentValue::Whitespace);
    }
}

fn opening_for(closing: char) -> char {
    match closing {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}
