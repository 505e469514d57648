//! Selector model: parsing, specificity and structural identity
//!
//! A selector is stored as a flat sequence of components, combinators
//! included, normalized while parsing (type and pseudo names lowercased,
//! attribute values unquoted, functional arguments whitespace-normalized).
//! Two selectors are the same selector exactly when their component
//! sequences are equal, and `structural_key` renders that identity as text.

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::{Position, SyntaxError, SyntaxErrorKind};
use crate::tokenizer::{is_name_char, is_name_start};

/// Rank given to pseudo-classes outside the link/action ordering.
pub const UNRANKED_PSEUDO: u8 = 5;

/// Pseudo-classes written with one colon that are really pseudo-elements.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Functional pseudo-classes whose argument is a selector list.
const SELECTOR_LIST_PSEUDOS: &[&str] = &[
    "is",
    "not",
    "where",
    "has",
    "matches",
    "-webkit-any",
    "-moz-any",
    "host",
    "host-context",
];

/// Functional pseudo-classes taking an `An+B` formula.
const NTH_PSEUDOS: &[&str] = &["nth-child", "nth-last-child", "nth-of-type", "nth-last-of-type"];

/// One complex selector (one entry of a comma-separated list)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Components in source order, combinators included
    pub components: Vec<Component>,
}

/// A selector component
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    /// `*`
    Universal,
    /// Element type, lowercased (`div`, `svg|circle`)
    Type(String),
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `[name]` or `[name op value flag]`
    Attribute {
        /// Attribute name, lowercased
        name: String,
        /// Operator and value, absent for presence tests
        matcher: Option<AttributeMatcher>,
    },
    /// `:name` or `:name(argument)`
    PseudoClass {
        /// Lowercased name
        name: String,
        /// Functional argument
        argument: Option<PseudoArgument>,
    },
    /// `::name`, also written `:before` for the legacy four
    PseudoElement {
        /// Lowercased name
        name: String,
        /// Functional argument, whitespace-collapsed
        argument: Option<String>,
    },
    /// Relationship between the compounds on either side
    Combinator(Combinator),
}

/// Combinators between compound selectors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

impl Combinator {
    fn symbol(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::NextSibling => "+",
            Combinator::SubsequentSibling => "~",
        }
    }
}

/// Attribute selector operators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `=`
    Equals,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttributeOperator {
    fn as_str(self) -> &'static str {
        match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// Value part of an attribute selector
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeMatcher {
    /// Comparison operator
    pub operator: AttributeOperator,
    /// Value without surrounding quotes; escapes kept as written
    pub value: String,
    /// `i` or `s` case flag
    pub case_flag: Option<char>,
}

/// Argument of a functional pseudo-class
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PseudoArgument {
    /// `:is()`, `:not()`, `:where()`, `:has()` and friends
    Selectors(Vec<Selector>),
    /// `:nth-child(2n+1 of .x)` and the other `An+B` pseudo-classes
    Nth {
        /// Formula with whitespace removed (`2n+1`, `odd`)
        formula: String,
        /// Optional `of S` filter
        of: Vec<Selector>,
    },
    /// Anything else (`:lang(en)`), whitespace-collapsed
    Raw(String),
}

/// CSS specificity as (ids, classes/attributes/pseudo-classes, types/pseudo-elements)
///
/// The derived `Ord` compares lexicographically, which is the cascade order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    fn add(&mut self, other: Specificity) {
        self.0 += other.0;
        self.1 += other.1;
        self.2 += other.2;
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

impl Selector {
    /// Create a selector from components
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Specificity of this selector
    pub fn specificity(&self) -> Specificity {
        specificity(self)
    }

    /// Canonical text, identical for structurally equal selectors
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        write_selector(&mut out, &self.components);
        out
    }

    /// Canonical text with every pseudo-class removed.
    ///
    /// Selectors that differ only in pseudo-classes share a base key.
    pub fn base_key(&self) -> String {
        let components: Vec<Component> = self
            .components
            .iter()
            .filter(|c| !matches!(c, Component::PseudoClass { .. }))
            .cloned()
            .collect();
        let mut out = String::new();
        write_selector(&mut out, &components);
        out
    }

    /// Highest `pseudo_order_rank` among this selector's pseudo-classes.
    pub fn max_pseudo_rank(&self) -> Option<u8> {
        self.components
            .iter()
            .filter_map(|c| match c {
                Component::PseudoClass { name, .. } => Some(pseudo_order_rank(name)),
                _ => None,
            })
            .max()
    }

    /// Check if the selector contains a combinator
    pub fn is_compound(&self) -> bool {
        !self
            .components
            .iter()
            .any(|c| matches!(c, Component::Combinator(_)))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Parse a comma-separated selector list.
///
/// Error positions are relative to `text`.
pub fn parse_selector_list(text: &str) -> Result<Vec<Selector>, SyntaxError> {
    parse_selector_list_offset(text)
        .map_err(|(offset, kind)| SyntaxError::new(Position::locate(text, offset), kind))
}

/// Parse a selector list, reporting failures as a byte offset into `text`.
pub(crate) fn parse_selector_list_offset(
    text: &str,
) -> Result<Vec<Selector>, (usize, SyntaxErrorKind)> {
    SelectorParser::new(text, 0).parse_list(false)
}

/// Specificity of a selector.
///
/// `:where()` adds nothing; `:is()`, `:not()` and `:has()` add their most
/// specific argument; `:nth-child(An+B of S)` adds one class plus `S`.
pub fn specificity(selector: &Selector) -> Specificity {
    let mut spec = Specificity::default();
    for component in &selector.components {
        match component {
            Component::Id(_) => spec.0 += 1,
            Component::Class(_) | Component::Attribute { .. } => spec.1 += 1,
            Component::PseudoClass { name, argument } => match argument {
                _ if name == "where" => {}
                Some(PseudoArgument::Selectors(list))
                    if matches!(
                        name.as_str(),
                        "is" | "not" | "has" | "matches" | "-webkit-any" | "-moz-any"
                    ) =>
                {
                    spec.add(max_specificity(list))
                }
                Some(PseudoArgument::Nth { of, .. }) => {
                    spec.1 += 1;
                    spec.add(max_specificity(of));
                }
                _ => spec.1 += 1,
            },
            Component::Type(name) => {
                if !name.ends_with("|*") {
                    spec.2 += 1;
                }
            }
            Component::PseudoElement { .. } => spec.2 += 1,
            Component::Universal | Component::Combinator(_) => {}
        }
    }
    spec
}

fn max_specificity(list: &[Selector]) -> Specificity {
    list.iter().map(specificity).max().unwrap_or_default()
}

/// Canonical map key for a selector, insensitive to whitespace and quoting.
pub fn structural_key(selector: &Selector) -> String {
    selector.to_css()
}

/// Rank of a pseudo-class in the safe `link < visited < hover < focus < active`
/// order. Every other pseudo-class ranks `UNRANKED_PSEUDO`, after all of them.
pub fn pseudo_order_rank(name: &str) -> u8 {
    match name.to_ascii_lowercase().as_str() {
        "link" => 0,
        "visited" => 1,
        "hover" => 2,
        "focus" => 3,
        "active" => 4,
        _ => UNRANKED_PSEUDO,
    }
}

fn write_selector(out: &mut String, components: &[Component]) {
    for (idx, component) in components.iter().enumerate() {
        match component {
            Component::Universal => out.push('*'),
            Component::Type(name) => out.push_str(name),
            Component::Class(name) => {
                out.push('.');
                out.push_str(name);
            }
            Component::Id(name) => {
                out.push('#');
                out.push_str(name);
            }
            Component::Attribute { name, matcher } => {
                out.push('[');
                out.push_str(name);
                if let Some(m) = matcher {
                    out.push_str(m.operator.as_str());
                    write_quoted(out, &m.value);
                    if let Some(flag) = m.case_flag {
                        out.push(' ');
                        out.push(flag);
                    }
                }
                out.push(']');
            }
            Component::PseudoClass { name, argument } => {
                out.push(':');
                out.push_str(name);
                if let Some(arg) = argument {
                    out.push('(');
                    write_argument(out, arg);
                    out.push(')');
                }
            }
            Component::PseudoElement { name, argument } => {
                out.push_str("::");
                out.push_str(name);
                if let Some(arg) = argument {
                    out.push('(');
                    out.push_str(arg);
                    out.push(')');
                }
            }
            Component::Combinator(Combinator::Descendant) => out.push(' '),
            Component::Combinator(c) => {
                if idx > 0 {
                    out.push(' ');
                }
                out.push_str(c.symbol());
                out.push(' ');
            }
        }
    }
}

fn write_argument(out: &mut String, arg: &PseudoArgument) {
    match arg {
        PseudoArgument::Selectors(list) => write_list(out, list),
        PseudoArgument::Nth { formula, of } => {
            out.push_str(formula);
            if !of.is_empty() {
                out.push_str(" of ");
                write_list(out, of);
            }
        }
        PseudoArgument::Raw(text) => out.push_str(text),
    }
}

fn write_list(out: &mut String, list: &[Selector]) {
    for (idx, selector) in list.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        write_selector(out, &selector.components);
    }
}

/// Double-quote an attribute value, escaping bare `"`.
fn write_quoted(out: &mut String, value: &str) {
    out.push('"');
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
}

type ParseResult<T> = Result<T, (usize, SyntaxErrorKind)>;

struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
    /// Offset of `input` inside the outermost selector text
    base: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        Self {
            input,
            pos: 0,
            base,
        }
    }

    fn parse_list(&mut self, relative: bool) -> ParseResult<Vec<Selector>> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_complex(relative)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                None => return Ok(selectors),
                Some(c) => return Err(self.unexpected(c)),
            }
        }
    }

    fn parse_complex(&mut self, relative: bool) -> ParseResult<Selector> {
        self.skip_whitespace();
        let mut components = Vec::new();

        if matches!(self.peek(), None | Some(',')) {
            return Err(self.error(SyntaxErrorKind::EmptySelector));
        }

        if let Some(combinator) = self.peek_combinator() {
            if !relative {
                return Err(self.error(SyntaxErrorKind::InvalidSelector(
                    "selector starts with a combinator".into(),
                )));
            }
            self.bump();
            components.push(Component::Combinator(combinator));
            self.skip_whitespace();
        }

        loop {
            self.parse_compound(&mut components)?;
            let had_whitespace = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) => {
                    if let Some(combinator) = self.peek_combinator() {
                        self.bump();
                        self.skip_whitespace();
                        components.push(Component::Combinator(combinator));
                        if matches!(self.peek(), None | Some(',')) {
                            return Err(self.error(SyntaxErrorKind::InvalidSelector(
                                "combinator without a following selector".into(),
                            )));
                        }
                    } else if had_whitespace && self.starts_compound() {
                        components.push(Component::Combinator(Combinator::Descendant));
                    } else {
                        let c = self.peek().unwrap_or(' ');
                        return Err(self.unexpected(c));
                    }
                }
            }
        }

        Ok(Selector::new(components))
    }

    fn parse_compound(&mut self, components: &mut Vec<Component>) -> ParseResult<()> {
        let before = components.len();
        while let Some(c) = self.peek() {
            match c {
                '*' => {
                    self.bump();
                    if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
                        self.bump();
                        let local = self.consume_local_name()?;
                        components.push(Component::Type(format!("*|{}", local)));
                    } else {
                        components.push(Component::Universal);
                    }
                }
                '|' => {
                    self.bump();
                    let local = self.consume_local_name()?;
                    components.push(Component::Type(format!("|{}", local)));
                }
                '.' => {
                    self.bump();
                    let name = self.consume_ident();
                    if name.is_empty() {
                        return Err(self.error(SyntaxErrorKind::InvalidSelector(
                            "expected a class name after '.'".into(),
                        )));
                    }
                    components.push(Component::Class(name));
                }
                '#' => {
                    self.bump();
                    let name = self.consume_name();
                    if name.is_empty() {
                        return Err(self.error(SyntaxErrorKind::InvalidSelector(
                            "expected an id after '#'".into(),
                        )));
                    }
                    components.push(Component::Id(name));
                }
                '[' => components.push(self.parse_attribute()?),
                ':' => components.push(self.parse_pseudo()?),
                _ if self.starts_ident() => {
                    let name = self.consume_ident().to_ascii_lowercase();
                    if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
                        self.bump();
                        let local = self.consume_local_name()?;
                        components.push(Component::Type(format!("{}|{}", name, local)));
                    } else {
                        components.push(Component::Type(name));
                    }
                }
                _ => break,
            }
        }

        if components.len() == before {
            let c = self.peek().unwrap_or(' ');
            return Err(self.unexpected(c));
        }
        Ok(())
    }

    fn parse_attribute(&mut self) -> ParseResult<Component> {
        let open = self.pos;
        self.bump();
        self.skip_whitespace();

        let mut name = self.consume_ident().to_ascii_lowercase();
        if self.peek() == Some('|') && self.peek_at(1) != Some('=') {
            self.bump();
            name = format!("{}|{}", name, self.consume_ident().to_ascii_lowercase());
        }
        if name.is_empty() {
            return Err(self.attribute_error(open, "expected an attribute name"));
        }
        self.skip_whitespace();

        let operator = match (self.peek(), self.peek_at(1)) {
            (Some(']'), _) => {
                self.bump();
                return Ok(Component::Attribute {
                    name,
                    matcher: None,
                });
            }
            (Some('='), _) => AttributeOperator::Equals,
            (Some('~'), Some('=')) => AttributeOperator::Includes,
            (Some('|'), Some('=')) => AttributeOperator::DashMatch,
            (Some('^'), Some('=')) => AttributeOperator::Prefix,
            (Some('$'), Some('=')) => AttributeOperator::Suffix,
            (Some('*'), Some('=')) => AttributeOperator::Substring,
            _ => return Err(self.attribute_error(open, "expected an attribute operator")),
        };
        self.pos += operator.as_str().len();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.consume_quoted(quote)?,
            _ => self.consume_name(),
        };
        if value.is_empty() && self.peek() != Some('"') {
            return Err(self.attribute_error(open, "expected an attribute value"));
        }
        self.skip_whitespace();

        let case_flag = match self.peek() {
            Some(c @ ('i' | 'I' | 's' | 'S')) => {
                self.bump();
                self.skip_whitespace();
                Some(c.to_ascii_lowercase())
            }
            _ => None,
        };

        if self.peek() != Some(']') {
            return Err(self.attribute_error(open, "expected ']'"));
        }
        self.bump();

        Ok(Component::Attribute {
            name,
            matcher: Some(AttributeMatcher {
                operator,
                value,
                case_flag,
            }),
        })
    }

    fn parse_pseudo(&mut self) -> ParseResult<Component> {
        self.bump();
        let element = if self.peek() == Some(':') {
            self.bump();
            true
        } else {
            false
        };

        let name = self.consume_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error(SyntaxErrorKind::InvalidSelector(
                "expected a pseudo-class name after ':'".into(),
            )));
        }

        let argument = if self.peek() == Some('(') {
            let open = self.pos;
            let close = self.find_close_paren(open).ok_or((
                self.base + open,
                SyntaxErrorKind::UnbalancedSelector('('),
            ))?;
            self.pos = close + 1;
            Some((open + 1, &self.input[open + 1..close]))
        } else {
            None
        };

        if element || (argument.is_none() && LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str())) {
            return Ok(Component::PseudoElement {
                name,
                argument: argument.map(|(_, inner)| collapse_whitespace(inner)),
            });
        }

        let argument = match argument {
            Some((start, inner)) => Some(self.parse_argument(&name, inner, start)?),
            None => None,
        };
        Ok(Component::PseudoClass { name, argument })
    }

    fn parse_argument(&self, name: &str, inner: &str, start: usize) -> ParseResult<PseudoArgument> {
        let base = self.base + start;
        if SELECTOR_LIST_PSEUDOS.contains(&name) {
            let list = SelectorParser::new(inner, base).parse_list(name == "has")?;
            return Ok(PseudoArgument::Selectors(list));
        }
        if NTH_PSEUDOS.contains(&name) {
            let (formula, of) = match find_of_keyword(inner) {
                Some(idx) => {
                    let list = SelectorParser::new(&inner[idx + 2..], base + idx + 2)
                        .parse_list(false)?;
                    (&inner[..idx], list)
                }
                None => (inner, Vec::new()),
            };
            let formula: String = formula
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            if formula.is_empty() {
                return Err((
                    base,
                    SyntaxErrorKind::InvalidSelector(format!("empty :{}() formula", name)),
                ));
            }
            return Ok(PseudoArgument::Nth { formula, of });
        }
        Ok(PseudoArgument::Raw(collapse_whitespace(inner)))
    }

    fn consume_quoted(&mut self, quote: char) -> ParseResult<String> {
        let start = self.pos;
        self.bump();
        let inner_start = self.pos;
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return Ok(self.input[inner_start..self.pos - 1].to_string());
            }
        }
        Err((
            self.base + start,
            SyntaxErrorKind::InvalidSelector("unterminated string".into()),
        ))
    }

    fn consume_local_name(&mut self) -> ParseResult<String> {
        if self.peek() == Some('*') {
            self.bump();
            return Ok("*".into());
        }
        let name = self.consume_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error(SyntaxErrorKind::InvalidSelector(
                "expected an element name after '|'".into(),
            )));
        }
        Ok(name)
    }

    fn consume_ident(&mut self) -> String {
        if self.starts_ident() {
            self.consume_name()
        } else {
            String::new()
        }
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
        self.input[start..self.pos].to_string()
    }

    fn find_close_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (idx, c) in self.input[open..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match (quote, c) {
                (_, '\\') => escaped = true,
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + idx);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('-') | Some('\\') => true,
                Some(c) => is_name_start(c),
                None => false,
            },
            Some('\\') => self.peek_at(1).is_some(),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn starts_compound(&self) -> bool {
        matches!(self.peek(), Some('*' | '|' | '.' | '#' | '[' | ':')) || self.starts_ident()
    }

    fn peek_combinator(&self) -> Option<Combinator> {
        match self.peek() {
            Some('>') => Some(Combinator::Child),
            Some('+') => Some(Combinator::NextSibling),
            Some('~') => Some(Combinator::SubsequentSibling),
            _ => None,
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
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

    fn error(&self, kind: SyntaxErrorKind) -> (usize, SyntaxErrorKind) {
        (self.base + self.pos, kind)
    }

    fn attribute_error(&self, open: usize, msg: &str) -> (usize, SyntaxErrorKind) {
        if self.peek().is_none() {
            (self.base + open, SyntaxErrorKind::UnbalancedSelector('['))
        } else {
            self.error(SyntaxErrorKind::InvalidSelector(msg.into()))
        }
    }

    fn unexpected(&self, c: char) -> (usize, SyntaxErrorKind) {
        match c {
            ')' | ']' | '(' => self.error(SyntaxErrorKind::UnbalancedSelector(c)),
            _ => self.error(SyntaxErrorKind::InvalidSelector(format!("unexpected '{}'", c))),
        }
    }
}

/// Byte index of a standalone `of` keyword in an `An+B of S` argument.
fn find_of_keyword(inner: &str) -> Option<usize> {
    let bytes = inner.as_bytes();
    (1..bytes.len().saturating_sub(2)).find(|&i| {
        bytes[i - 1].is_ascii_whitespace()
            && bytes[i].eq_ignore_ascii_case(&b'o')
            && bytes[i + 1].eq_ignore_ascii_case(&b'f')
            && bytes[i + 2].is_ascii_whitespace()
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
