//! Stylesheet parser
//!
//! Turns raw CSS text into a [`Stylesheet`] tree. Structure errors (unclosed
//! blocks, bad selectors, unusable at-rule preludes) abort with a
//! [`SyntaxError`]; declarations the parser cannot interpret are kept
//! verbatim and reported as warnings.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::{DeclarationWarning, Position, SyntaxError, SyntaxErrorKind, WarningKind};
use crate::pipeline::CompileLimits;
use crate::report::{ChangeEvent, ChangeReport};
use crate::selector::parse_selector_list_offset;
use crate::stylesheet::{
    AtRule, AtRuleKind, Block, Comment, Declaration, Keyframe, Node, Rule, Stylesheet,
};
use crate::tokenizer::{self, is_name_char, ComponentValue};

/// At-rules whose block holds nested rules rather than declarations.
const RULE_BLOCK_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "document",
    "-moz-document",
    "scope",
    "starting-style",
];

/// Parse a CSS stylesheet string into a `Stylesheet`
///
/// Warnings are discarded; use [`parse_stylesheet_with_report`] to keep them.
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, SyntaxError> {
    let mut report = ChangeReport::new();
    parse_stylesheet_with_report(css, &CompileLimits::default(), &mut report)
}

/// Parse a CSS stylesheet, recording parsed rules, dropped empty declarations
/// and warnings into `report`.
pub fn parse_stylesheet_with_report(
    css: &str,
    limits: &CompileLimits,
    report: &mut ChangeReport,
) -> Result<Stylesheet, SyntaxError> {
    let mut parser = Parser {
        css,
        lines: LineIndex::new(css),
        pos: 0,
        next_index: 0,
        max_nesting: limits.max_nesting,
        report,
    };
    let nodes = parser.parse_node_list(0, None)?;
    log::debug!(
        "[parse] {} top-level nodes, {} source nodes, {} bytes",
        nodes.len(),
        parser.next_index,
        css.len()
    );
    Ok(Stylesheet { nodes })
}

/// Classify an at-keyword (already lowercased).
pub fn at_rule_kind(name: &str) -> AtRuleKind {
    if name == "media" {
        AtRuleKind::Media
    } else if name == "keyframes" || (name.starts_with('-') && name.ends_with("-keyframes")) {
        AtRuleKind::Keyframes
    } else {
        AtRuleKind::Other
    }
}

/// Line start offsets for cheap offset -> line/column lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = Vec::with_capacity(source.len() / 32 + 1);
        starts.push(0);
        starts.extend(source.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { starts }
    }

    fn locate(&self, source: &str, offset: usize) -> Position {
        let offset = offset.min(source.len());
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count())
            + 1;
        Position {
            offset,
            line,
            column,
        }
    }
}

/// Text between the current position and a `{`, `;` or `}`.
struct Prelude {
    /// Offset of the first non-whitespace byte
    start: usize,
    /// Text with comments blanked out
    text: String,
    /// Character that ended the prelude, `None` at end of input
    terminator: Option<char>,
}

struct Parser<'a, 'r> {
    css: &'a str,
    lines: LineIndex,
    pos: usize,
    next_index: usize,
    max_nesting: usize,
    report: &'r mut ChangeReport,
}

impl Parser<'_, '_> {
    fn parse_node_list(
        &mut self,
        depth: usize,
        open: Option<usize>,
    ) -> Result<Vec<Node>, SyntaxError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace_and_cdo();
            let Some(c) = self.peek() else {
                return match open {
                    Some(brace) => Err(self.error(brace, SyntaxErrorKind::UnterminatedBlock)),
                    None => Ok(nodes),
                };
            };
            match c {
                '}' => {
                    if open.is_none() {
                        return Err(self.error(self.pos, SyntaxErrorKind::UnexpectedCloseBrace));
                    }
                    self.pos += 1;
                    return Ok(nodes);
                }
                ';' => self.pos += 1,
                '/' if self.starts_with("/*") => nodes.push(Node::Comment(self.parse_comment()?)),
                '@' => nodes.push(Node::AtRule(self.parse_at_rule(depth)?)),
                _ => nodes.push(Node::Rule(self.parse_rule()?)),
            }
        }
    }

    fn parse_comment(&mut self) -> Result<Comment, SyntaxError> {
        let start = self.pos;
        let end = self.comment_end(start)?;
        let comment = Comment {
            text: self.css[start + 2..end - 2].to_string(),
            source_index: self.take_index(),
            position: self.position(start),
        };
        self.pos = end;
        Ok(comment)
    }

    fn parse_rule(&mut self) -> Result<Rule, SyntaxError> {
        let prelude = self.scan_prelude()?;
        if prelude.terminator != Some('{') {
            return Err(self.error(prelude.start, SyntaxErrorKind::MissingBlock));
        }

        let selector_base = prelude.start - (prelude.text.len() - prelude.text.trim_start().len());
        let selectors = parse_selector_list_offset(&prelude.text)
            .map_err(|(offset, kind)| self.error(selector_base + offset, kind))?;
        let source_index = self.take_index();

        let brace = self.pos;
        self.pos += 1;
        let declarations = self.parse_declaration_block(brace)?;
        self.report.record(ChangeEvent::RuleParsed);

        Ok(Rule {
            selectors,
            declarations,
            source_index,
            position: self.position(prelude.start),
        })
    }

    fn parse_at_rule(&mut self, depth: usize) -> Result<AtRule, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let name_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.peek() {
                    self.pos += escaped.len_utf8();
                }
            } else if is_name_char(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let name = self.css[name_start..self.pos].to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error(
                start,
                SyntaxErrorKind::InvalidAtRulePrelude {
                    name,
                    reason: "missing at-keyword name".into(),
                },
            ));
        }

        let kind = at_rule_kind(&name);
        let prelude = self.scan_prelude()?;
        let prelude_text = self.normalize_prelude(kind, &name, &prelude.text, start)?;
        let source_index = self.take_index();
        let position = self.position(start);

        let block = match prelude.terminator {
            Some('{') => {
                let brace = self.pos;
                self.pos += 1;
                Some(self.parse_at_rule_block(kind, &name, depth, brace, start)?)
            }
            _ if kind != AtRuleKind::Other => {
                return Err(self.error(start, SyntaxErrorKind::MissingBlock));
            }
            Some(';') => {
                self.pos += 1;
                None
            }
            _ => None,
        };

        Ok(AtRule {
            kind,
            name,
            prelude: prelude_text,
            block,
            source_index,
            first_source_index: source_index,
            position,
        })
    }

    fn parse_at_rule_block(
        &mut self,
        kind: AtRuleKind,
        name: &str,
        depth: usize,
        brace: usize,
        start: usize,
    ) -> Result<Block, SyntaxError> {
        match kind {
            AtRuleKind::Keyframes => Ok(Block::Keyframes(self.parse_keyframes_body(brace)?)),
            _ if kind == AtRuleKind::Media || RULE_BLOCK_AT_RULES.contains(&name) => {
                if depth + 1 > self.max_nesting {
                    return Err(self.error(
                        start,
                        SyntaxErrorKind::NestingTooDeep {
                            limit: self.max_nesting,
                        },
                    ));
                }
                Ok(Block::Rules(self.parse_node_list(depth + 1, Some(brace))?))
            }
            _ => Ok(Block::Declarations(self.parse_declaration_block(brace)?)),
        }
    }

    fn normalize_prelude(
        &self,
        kind: AtRuleKind,
        name: &str,
        text: &str,
        start: usize,
    ) -> Result<String, SyntaxError> {
        let invalid = |reason: String| {
            self.error(
                start,
                SyntaxErrorKind::InvalidAtRulePrelude {
                    name: name.to_string(),
                    reason,
                },
            )
        };

        match kind {
            AtRuleKind::Media => {
                let tokens = tokenizer::tokenize(text).map_err(|e| invalid(e.to_string()))?;
                let condition = tokenizer::to_canonical(&tokens, true);
                if condition.is_empty() {
                    return Err(invalid("missing media condition".into()));
                }
                Ok(condition)
            }
            AtRuleKind::Keyframes => {
                let tokens = tokenizer::tokenize(text).map_err(|e| invalid(e.to_string()))?;
                match tokenizer::trim(&tokens) {
                    [ComponentValue::Ident(ident)] => Ok(ident.clone()),
                    [ComponentValue::Str(quoted)] if quoted.len() >= 2 => {
                        Ok(keyframes_name_from_string(quoted))
                    }
                    [] => Err(invalid("missing animation name".into())),
                    _ => Err(invalid("expected a single animation name".into())),
                }
            }
            AtRuleKind::Other => Ok(match tokenizer::tokenize(text) {
                Ok(tokens) => tokenizer::to_css(tokenizer::trim(&tokens)),
                Err(_) => text.split_whitespace().collect::<Vec<_>>().join(" "),
            }),
        }
    }

    fn parse_keyframes_body(&mut self, brace: usize) -> Result<Vec<Keyframe>, SyntaxError> {
        let mut frames = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            match self.peek() {
                None => return Err(self.error(brace, SyntaxErrorKind::UnterminatedBlock)),
                Some('}') => {
                    self.pos += 1;
                    return Ok(frames);
                }
                Some(';') => self.pos += 1,
                Some(_) => {
                    let prelude = self.scan_prelude()?;
                    if prelude.terminator != Some('{') {
                        return Err(self.error(prelude.start, SyntaxErrorKind::MissingBlock));
                    }
                    let selectors: Vec<String> = prelude
                        .text
                        .split(',')
                        .map(|s| s.trim().to_ascii_lowercase())
                        .collect();
                    if selectors.iter().any(String::is_empty) {
                        return Err(self.error(prelude.start, SyntaxErrorKind::EmptySelector));
                    }
                    let frame_brace = self.pos;
                    self.pos += 1;
                    let declarations = self.parse_declaration_block(frame_brace)?;
                    frames.push(Keyframe {
                        selectors,
                        declarations,
                    });
                }
            }
        }
    }

    /// Parse declarations up to and including the `}` matching `brace`.
    fn parse_declaration_block(&mut self, brace: usize) -> Result<Vec<Declaration>, SyntaxError> {
        let mut declarations = Vec::new();
        let mut segment = Segment::new(self.pos);
        let mut closers: Vec<char> = Vec::new();

        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(brace, SyntaxErrorKind::UnterminatedBlock));
            };
            match c {
                '"' | '\'' => {
                    if !self.skip_string(c) {
                        segment.malformed = true;
                    }
                    continue;
                }
                '/' if self.starts_with("/*") => {
                    let end = self.comment_end(self.pos)?;
                    segment.comments.push((self.pos, end));
                    self.pos = end;
                    continue;
                }
                '(' => closers.push(')'),
                '[' => closers.push(']'),
                '{' => {
                    if !closers.contains(&'}') {
                        segment.nested = true;
                    }
                    closers.push('}');
                }
                ')' | ']' => {
                    if closers.last() == Some(&c) {
                        closers.pop();
                    } else {
                        segment.malformed = true;
                    }
                }
                ';' if closers.is_empty() => {
                    self.finish_segment(segment, self.pos, &mut declarations);
                    segment = Segment::new(self.pos + 1);
                }
                '}' if !closers.contains(&'}') => {
                    segment.malformed |= !closers.is_empty();
                    self.finish_segment(segment, self.pos, &mut declarations);
                    self.pos += 1;
                    return Ok(declarations);
                }
                '}' => {
                    while let Some(top) = closers.pop() {
                        if top == '}' {
                            break;
                        }
                        segment.malformed = true;
                    }
                    if !closers.contains(&'}') {
                        self.finish_segment(segment, self.pos + 1, &mut declarations);
                        segment = Segment::new(self.pos + 1);
                    }
                }
                _ => {}
            }
            self.pos += c.len_utf8();
        }
    }

    fn finish_segment(&mut self, segment: Segment, end: usize, out: &mut Vec<Declaration>) {
        let text = segment.clean_text(&self.css[segment.start..end], segment.start);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let offset = segment.start + (text.len() - text.trim_start().len());

        if segment.nested {
            self.keep_verbatim(offset, WarningKind::NestedBlockKept, trimmed, out);
            return;
        }

        let Some(colon) = trimmed.find(':') else {
            self.keep_verbatim(offset, WarningKind::MalformedDeclaration, trimmed, out);
            return;
        };
        let property = trimmed[..colon].trim();
        if !is_property_name(property) {
            self.keep_verbatim(offset, WarningKind::MalformedDeclaration, trimmed, out);
            return;
        }
        if segment.malformed {
            self.keep_verbatim(offset, WarningKind::MalformedValue, trimmed, out);
            return;
        }

        let tokens = match tokenizer::tokenize(&trimmed[colon + 1..]) {
            Ok(tokens) => tokens,
            Err(_) => {
                self.keep_verbatim(offset, WarningKind::MalformedValue, trimmed, out);
                return;
            }
        };
        let (value, important) = split_important(&tokens);
        let property = if property.starts_with("--") {
            property.to_string()
        } else {
            property.to_ascii_lowercase()
        };

        if value.is_empty() && !property.starts_with("--") {
            log::debug!("[parse] dropping empty declaration `{}`", trimmed);
            self.report.record(ChangeEvent::EmptyDeclarationRemoved);
            return;
        }
        out.push(Declaration::new(property, value.to_vec(), important));
    }

    fn keep_verbatim(
        &mut self,
        offset: usize,
        kind: WarningKind,
        text: &str,
        out: &mut Vec<Declaration>,
    ) {
        let warning = DeclarationWarning {
            position: self.position(offset),
            kind,
            text: text.to_string(),
        };
        self.report.record(ChangeEvent::Warning(warning));
        out.push(Declaration::verbatim(text));
    }

    fn scan_prelude(&mut self) -> Result<Prelude, SyntaxError> {
        let scan_start = self.pos;
        let mut text = String::new();
        // `(`/`[` depth; `;` only ends a prelude outside them.
        let mut depth = 0usize;
        let terminator = loop {
            let Some(c) = self.peek() else {
                break None;
            };
            match c {
                '{' | '}' => break Some(c),
                ';' if depth == 0 => break Some(c),
                '(' | '[' => {
                    depth += 1;
                    text.push(c);
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    text.push(c);
                }
                '"' | '\'' => {
                    let from = self.pos;
                    self.skip_string(c);
                    text.push_str(&self.css[from..self.pos]);
                    continue;
                }
                '/' if self.starts_with("/*") => {
                    let end = self.comment_end(self.pos)?;
                    text.extend(core::iter::repeat(' ').take(end - self.pos));
                    self.pos = end;
                    continue;
                }
                _ => text.push(c),
            }
            self.pos += c.len_utf8();
        };
        let leading = text.len() - text.trim_start().len();
        Ok(Prelude {
            start: scan_start + leading,
            text,
            terminator,
        })
    }

    /// Skip a quoted string. Returns `false` if it was cut short by a
    /// newline or the end of input.
    fn skip_string(&mut self, quote: char) -> bool {
        self.pos += quote.len_utf8();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        self.pos += next.len_utf8();
                    }
                    continue;
                }
                '\n' => return false,
                c if c == quote => {
                    self.pos += 1;
                    return true;
                }
                _ => {}
            }
            self.pos += c.len_utf8();
        }
        false
    }

    /// Offset just past the `*/` closing the comment at `start`.
    fn comment_end(&self, start: usize) -> Result<usize, SyntaxError> {
        match self.css[start + 2..].find("*/") {
            Some(end) => Ok(start + 2 + end + 2),
            None => Err(self.error(start, SyntaxErrorKind::UnterminatedComment)),
        }
    }

    fn skip_whitespace_and_cdo(&mut self) {
        loop {
            if let Some(c) = self.peek().filter(|c| c.is_whitespace() || *c == '\u{feff}') {
                self.pos += c.len_utf8();
            } else if self.starts_with("<!--") {
                self.pos += 4;
            } else if self.starts_with("-->") {
                self.pos += 3;
            } else {
                break;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), SyntaxError> {
        loop {
            if let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
                self.pos += c.len_utf8();
            } else if self.starts_with("/*") {
                self.pos = self.comment_end(self.pos)?;
            } else {
                return Ok(());
            }
        }
    }

    fn take_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    fn position(&self, offset: usize) -> Position {
        self.lines.locate(self.css, offset)
    }

    fn error(&self, offset: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.position(offset), kind)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.css[self.pos..].starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.css[self.pos..].chars().next()
    }
}

/// One `;`-separated slice of a declaration block while it is being scanned.
struct Segment {
    start: usize,
    nested: bool,
    malformed: bool,
    /// Absolute `(start, end)` ranges of comments inside the segment
    comments: Vec<(usize, usize)>,
}

impl Segment {
    fn new(start: usize) -> Self {
        Self {
            start,
            nested: false,
            malformed: false,
            comments: Vec::new(),
        }
    }

    /// Segment text with each comment replaced by one space.
    fn clean_text(&self, raw: &str, base: usize) -> String {
        if self.comments.is_empty() {
            return raw.to_string();
        }
        let mut out = String::with_capacity(raw.len());
        let mut cursor = 0;
        for &(start, end) in &self.comments {
            out.push_str(&raw[cursor..start - base]);
            out.push(' ');
            cursor = end - base;
        }
        out.push_str(&raw[cursor..]);
        out
    }
}

/// Split a trailing `!important` off a value.
fn split_important(tokens: &[ComponentValue]) -> (&[ComponentValue], bool) {
    let trimmed = tokenizer::trim(tokens);
    if let Some((ComponentValue::Ident(last), rest)) = trimmed.split_last() {
        if last.eq_ignore_ascii_case("important") {
            if let Some((ComponentValue::Delim('!'), value)) = tokenizer::trim(rest).split_last()
            {
                return (tokenizer::trim(value), true);
            }
        }
    }
    (trimmed, false)
}

/// Keyword values a `@keyframes` name may only use in quoted form.
const RESERVED_KEYFRAMES_NAMES: &[&str] = &[
    "none",
    "initial",
    "inherit",
    "unset",
    "default",
    "revert",
    "revert-layer",
];

/// Prelude for a quoted `@keyframes` name.
///
/// Names that are plain identifiers lose their quotes so `"spin"` and `spin`
/// share one key; anything else stays a double-quoted string.
fn keyframes_name_from_string(quoted: &str) -> String {
    let quote = quoted.chars().next().unwrap_or('"');
    let inner = &quoted[1..quoted.len() - 1];
    let is_ident = matches!(
        tokenizer::tokenize(inner).as_deref(),
        Ok([ComponentValue::Ident(ident)]) if ident == inner
    );
    if is_ident && !RESERVED_KEYFRAMES_NAMES.contains(&inner.to_ascii_lowercase().as_str()) {
        inner.to_string()
    } else if quote == '"' || inner.contains('"') {
        quoted.to_string()
    } else {
        alloc::format!("\"{}\"", inner)
    }
}

fn is_property_name(name: &str) -> bool {
    let body = name.trim_start_matches('-');
    if name.starts_with("--") {
        return name.len() > 2 && name[2..].chars().all(|c| is_name_char(c) || c == '\\');
    }
    body.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())
        && body.chars().all(is_name_char)
        && name.len() - body.len() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

    fn parse(css: &str) -> Stylesheet {
        parse_stylesheet(css).unwrap()
    }

    fn parse_with_report(css: &str) -> (Stylesheet, ChangeReport) {
        let mut report = ChangeReport::new();
        let sheet =
            parse_stylesheet_with_report(css, &CompileLimits::default(), &mut report).unwrap();
        (sheet, report)
    }

    fn parse_err(css: &str) -> SyntaxError {
        parse_stylesheet(css).unwrap_err()
    }

    fn first_rule(sheet: &Stylesheet) -> &Rule {
        sheet.rules().next().unwrap()
    }

    #[test]
    fn test_parse_empty_stylesheet() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\t ").is_empty());
    }

    #[test]
    fn test_parse_simple_rule() {
        let sheet = parse("p { color: red; margin: 0 auto }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.selector_text(), "p");
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].property, "color");
        assert_eq!(rule.declarations[1].value_text(), "0 auto");
    }

    #[test]
    fn test_selector_list_is_split() {
        let sheet = parse("h1,\nh2 , .title{font-weight:bold}");
        let selectors: Vec<String> = first_rule(&sheet)
            .selectors
            .iter()
            .map(Selector::to_css)
            .collect();
        assert_eq!(selectors, vec!["h1", "h2", ".title"]);
    }

    #[test]
    fn test_property_lowercased_value_case_kept() {
        let sheet = parse("a { COLOR: #FFaa00; Font-Family: \"Open Sans\" }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations[0].property, "color");
        assert_eq!(rule.declarations[0].value_text(), "#FFaa00");
        assert_eq!(rule.declarations[1].value_text(), "\"Open Sans\"");
    }

    #[test]
    fn test_custom_property_case_kept() {
        let sheet = parse(":root { --Main-Color: Teal; --empty:; }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations[0].property, "--Main-Color");
        assert_eq!(rule.declarations[1].property, "--empty");
        assert!(rule.declarations[1].value.is_empty());
    }

    #[test]
    fn test_important_flag() {
        let sheet = parse(".a { color: red !important; margin: 0 ! IMPORTANT; }");
        let rule = first_rule(&sheet);
        assert!(rule.declarations[0].important);
        assert_eq!(rule.declarations[0].value_text(), "red");
        assert!(rule.declarations[1].important);
        assert_eq!(rule.declarations[1].value_text(), "0");
    }

    #[test]
    fn test_empty_declaration_dropped_and_counted() {
        let (sheet, report) = parse_with_report(".a { color: ; margin: 0 }");
        assert_eq!(first_rule(&sheet).declarations.len(), 1);
        assert_eq!(report.empty_declarations_removed, 1);
        assert_eq!(report.rules_parsed, 1);
    }

    #[test]
    fn test_nested_functions_in_values() {
        let sheet = parse(".a { width: calc(100% - var(--gap, calc(2 * 4px))); }");
        assert_eq!(
            first_rule(&sheet).declarations[0].value_text(),
            "calc(100% - var(--gap, calc(2 * 4px)))"
        );
    }

    #[test]
    fn test_semicolons_in_strings_and_urls() {
        let sheet = parse(".a { content: \"a;b}\"; background: url(\"x;y.png\") }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].value_text(), "\"a;b}\"");
    }

    #[test]
    fn test_comments_become_nodes_or_whitespace() {
        let sheet = parse("/* top */\na /* in prelude */ { color: /* in value */ red; }");
        assert!(matches!(sheet.nodes[0], Node::Comment(ref c) if c.text == " top "));
        let rule = first_rule(&sheet);
        assert_eq!(rule.selector_text(), "a");
        assert_eq!(rule.declarations[0].value_text(), "red");
    }

    #[test]
    fn test_source_index_is_preorder() {
        let sheet = parse(".a{x:1} @media print { .b{y:2} } .c{z:3}");
        let indices: Vec<usize> = sheet.nodes.iter().map(Node::source_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        let Node::AtRule(media) = &sheet.nodes[1] else {
            panic!("expected @media");
        };
        let Some(Block::Rules(inner)) = &media.block else {
            panic!("expected rule block");
        };
        assert_eq!(inner[0].source_index(), 2);
    }

    #[test]
    fn test_media_prelude_normalized() {
        let sheet = parse("@MEDIA screen   and ( MAX-WIDTH :768px ) { a { x: 1 } }");
        let media = sheet.at_rules().next().unwrap();
        assert_eq!(media.kind, AtRuleKind::Media);
        assert_eq!(media.name, "media");
        assert_eq!(media.prelude, "screen and (max-width: 768px)");
    }

    #[test]
    fn test_keyframes_parsed() {
        let sheet = parse("@-webkit-keyframes \"spin\" { from { x: 0 } 50%, TO { x: 1 } }");
        let kf = sheet.at_rules().next().unwrap();
        assert_eq!(kf.kind, AtRuleKind::Keyframes);
        assert_eq!(kf.prelude, "spin");
        let Some(Block::Keyframes(frames)) = &kf.block else {
            panic!("expected keyframes block");
        };
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].selectors, vec!["50%", "to"]);
    }

    #[test]
    fn test_statement_at_rules() {
        let sheet = parse("@charset \"utf-8\";\n@import url(a.css) screen;\n@layer base, theme;");
        let names: Vec<&str> = sheet.at_rules().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["charset", "import", "layer"]);
        assert!(sheet.at_rules().all(AtRule::is_statement));
        assert_eq!(sheet.at_rules().nth(1).unwrap().prelude, "url(a.css) screen");
    }

    #[test]
    fn test_font_face_holds_declarations() {
        let sheet = parse("@font-face { font-family: X; src: url(x.woff2) format(\"woff2\"); }");
        let at = sheet.at_rules().next().unwrap();
        assert!(matches!(&at.block, Some(Block::Declarations(d)) if d.len() == 2));
    }

    #[test]
    fn test_supports_holds_rules() {
        let sheet = parse("@supports (display: grid) { .g { display: grid } }");
        let at = sheet.at_rules().next().unwrap();
        assert_eq!(at.prelude, "(display: grid)");
        assert!(matches!(&at.block, Some(Block::Rules(r)) if r.len() == 1));
    }

    #[test]
    fn test_malformed_declaration_kept_verbatim() {
        let (sheet, report) = parse_with_report(".a { color red; margin: 0 }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations[0].verbatim.as_deref(), Some("color red"));
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.warnings()[0].kind, WarningKind::MalformedDeclaration);
    }

    #[test]
    fn test_unbalanced_value_kept_verbatim() {
        let (sheet, report) = parse_with_report(".a { margin: 0; width: calc(1px + 2px; color: red }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].property, "margin");
        assert_eq!(
            rule.declarations[1].verbatim.as_deref(),
            Some("width: calc(1px + 2px; color: red")
        );
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.warnings()[0].kind, WarningKind::MalformedValue);
    }

    #[test]
    fn test_semicolon_inside_unquoted_url() {
        let (sheet, report) = parse_with_report(
            ".a { background: url(data:image/png;base64,AAAA) no-repeat; color: red }",
        );
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(rule.declarations[0].property, "background");
        assert_eq!(
            rule.declarations[0].value_text(),
            "url(data:image/png;base64,AAAA) no-repeat"
        );
        assert_eq!(rule.declarations[1].property, "color");
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_semicolon_inside_function_and_prelude() {
        let sheet = parse(".a { x: foo(a; b) } @import url(a;b.css) screen;");
        assert_eq!(first_rule(&sheet).declarations[0].value_text(), "foo(a; b)");
        assert_eq!(sheet.at_rules().next().unwrap().prelude, "url(a;b.css) screen");
    }

    #[test]
    fn test_non_ascii_at_keyword() {
        let sheet = parse("@über { a: b }\n.a { x: 1 }");
        let at = sheet.at_rules().next().unwrap();
        assert_eq!(at.name, "über");
        assert_eq!(at.kind, AtRuleKind::Other);
        assert_eq!(sheet.rules().count(), 1);

        let sheet = parse("@x\\é y { a: b }");
        assert_eq!(sheet.at_rules().next().unwrap().name, "x\\é");
    }

    #[test]
    fn test_quoted_keyframes_name_kept_quoted() {
        let sheet = parse("@keyframes \"foo bar\" { to { x: 1 } }");
        assert_eq!(sheet.at_rules().next().unwrap().prelude, "\"foo bar\"");
        let sheet = parse("@keyframes 'foo bar' { to { x: 1 } }");
        assert_eq!(sheet.at_rules().next().unwrap().prelude, "\"foo bar\"");
        let sheet = parse("@keyframes \"none\" { to { x: 1 } }");
        assert_eq!(sheet.at_rules().next().unwrap().prelude, "\"none\"");
    }

    #[test]
    fn test_nested_block_kept_verbatim() {
        let (sheet, report) = parse_with_report(".a { color: red; &:hover { color: blue } }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.declarations.len(), 2);
        assert_eq!(
            rule.declarations[1].verbatim.as_deref(),
            Some("&:hover { color: blue }")
        );
        assert_eq!(report.warnings()[0].kind, WarningKind::NestedBlockKept);
    }

    #[test]
    fn test_warning_position() {
        let (_, report) = parse_with_report(".a {\n  color: red;\n  oops\n}");
        let pos = report.warnings()[0].position;
        assert_eq!((pos.line, pos.column), (3, 3));
    }

    #[test]
    fn test_unclosed_block_reports_line() {
        let err = parse_err(".a { color: red }\n.b {\n  color: blue;\n");
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedBlock);
        assert_eq!(err.position.line, 2);
    }

    #[test]
    fn test_unclosed_media_block() {
        let err = parse_err("@media print {\n  .a { x: 1 }\n");
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedBlock);
        assert_eq!(err.position.line, 1);
    }

    #[test]
    fn test_stray_close_brace() {
        let err = parse_err(".a { x: 1 }\n}");
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedCloseBrace);
        assert_eq!((err.position.line, err.position.column), (2, 1));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse_err(".a { x: 1 }\n/* never closed");
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedComment);
        assert_eq!(err.position.line, 2);
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(parse_err("color: red;").kind, SyntaxErrorKind::MissingBlock);
        assert_eq!(parse_err(".a").kind, SyntaxErrorKind::MissingBlock);
    }

    #[test]
    fn test_bad_selector_position() {
        let err = parse_err(".ok { x: 1 }\n  .a,, .b { x: 1 }");
        assert_eq!(err.kind, SyntaxErrorKind::EmptySelector);
        assert_eq!((err.position.line, err.position.column), (2, 6));
    }

    #[test]
    fn test_invalid_keyframes_prelude() {
        let err = parse_err("@keyframes { from { x: 0 } }");
        assert!(matches!(err.kind, SyntaxErrorKind::InvalidAtRulePrelude { .. }));
        let err = parse_err("@keyframes a b { from { x: 0 } }");
        assert!(matches!(err.kind, SyntaxErrorKind::InvalidAtRulePrelude { .. }));
    }

    #[test]
    fn test_invalid_media_prelude() {
        let err = parse_err("@media (max-width: 10px { a { x: 1 } }");
        assert!(matches!(err.kind, SyntaxErrorKind::InvalidAtRulePrelude { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let css = "@media a { @media b { @media c { .x { y: 1 } } } }";
        let mut report = ChangeReport::new();
        let limits = CompileLimits::default().with_max_nesting(2);
        let err = parse_stylesheet_with_report(css, &limits, &mut report).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep { limit: 2 });
        assert!(parse_stylesheet(css).is_ok());
    }

    #[test]
    fn test_cdo_cdc_and_bom_skipped() {
        let sheet = parse("\u{feff}<!-- .a { x: 1 } -->");
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_at_rule_kind() {
        assert_eq!(at_rule_kind("media"), AtRuleKind::Media);
        assert_eq!(at_rule_kind("-moz-keyframes"), AtRuleKind::Keyframes);
        assert_eq!(at_rule_kind("font-face"), AtRuleKind::Other);
    }

    #[test]
    fn test_is_property_name() {
        assert!(is_property_name("color"));
        assert!(is_property_name("-webkit-transition"));
        assert!(is_property_name("--x"));
        assert!(!is_property_name("*zoom"));
        assert!(!is_property_name("col or"));
        assert!(!is_property_name(""));
    }
}
