//! Error and warning types for stylefold
//!
//! `SyntaxError` is the only failure that aborts a compile. Everything the
//! engine can keep but not interpret is reported as a `DeclarationWarning`
//! and carried in the `ChangeReport`.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Location of a construct in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Compute the line/column of `offset` within `source`.
    ///
    /// Offsets past the end clamp to the end of the input.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut line_start = 0;
        for (idx, byte) in source.as_bytes()[..offset].iter().enumerate() {
            if *byte == b'\n' {
                line += 1;
                line_start = idx + 1;
            }
        }
        let column = source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count())
            + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reason a stylesheet could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxErrorKind {
    /// A `{` was never closed.
    UnterminatedBlock,
    /// A `/*` comment was never closed.
    UnterminatedComment,
    /// A `}` with no matching `{`.
    UnexpectedCloseBrace,
    /// A selector or at-rule prelude not followed by a block.
    MissingBlock,
    /// A selector list with an empty entry (`a,,b`, trailing comma, bare `{`).
    EmptySelector,
    /// An unbalanced bracket or parenthesis in a selector.
    UnbalancedSelector(char),
    /// Any other malformed selector syntax.
    InvalidSelector(String),
    /// An at-rule prelude the consolidator cannot work with.
    InvalidAtRulePrelude {
        /// At-keyword, without the `@`.
        name: String,
        /// What is wrong with the prelude.
        reason: String,
    },
    /// Nested at-rule blocks exceeded `CompileLimits::max_nesting`.
    NestingTooDeep {
        /// Configured limit.
        limit: usize,
    },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnterminatedBlock => write!(f, "unterminated block, missing '}}'"),
            SyntaxErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            SyntaxErrorKind::UnexpectedCloseBrace => write!(f, "unexpected '}}'"),
            SyntaxErrorKind::MissingBlock => write!(f, "expected '{{' after prelude"),
            SyntaxErrorKind::EmptySelector => write!(f, "empty selector"),
            SyntaxErrorKind::UnbalancedSelector(c) => {
                write!(f, "unbalanced '{}' in selector", c)
            }
            SyntaxErrorKind::InvalidSelector(msg) => write!(f, "invalid selector: {}", msg),
            SyntaxErrorKind::InvalidAtRulePrelude { name, reason } => {
                write!(f, "invalid @{} prelude: {}", name, reason)
            }
            SyntaxErrorKind::NestingTooDeep { limit } => {
                write!(f, "blocks nested deeper than {} levels", limit)
            }
        }
    }
}

/// Fatal parse failure with the position it was detected at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    /// Where the problem starts.
    pub position: Position,
    /// What went wrong.
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    /// Create an error at an already-located position.
    pub fn new(position: Position, kind: SyntaxErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create an error at a byte offset of `source`.
    pub fn at(source: &str, offset: usize, kind: SyntaxErrorKind) -> Self {
        Self::new(Position::locate(source, offset), kind)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

impl std::error::Error for SyntaxError {}

/// Category of a non-fatal warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WarningKind {
    /// Declaration without a colon, or with an invalid property name.
    MalformedDeclaration,
    /// Value with unbalanced brackets or an unterminated string.
    MalformedValue,
    /// A nested `{}` block inside a declaration list.
    NestedBlockKept,
    /// Media condition whose breakpoint is not a plain number.
    UnsortableCondition,
}

impl WarningKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            WarningKind::MalformedDeclaration => "MALFORMED_DECLARATION",
            WarningKind::MalformedValue => "MALFORMED_VALUE",
            WarningKind::NestedBlockKept => "NESTED_BLOCK_KEPT",
            WarningKind::UnsortableCondition => "UNSORTABLE_CONDITION",
        }
    }
}

/// Content the engine kept verbatim because it could not interpret it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationWarning {
    /// Where the offending text starts.
    pub position: Position,
    /// Warning category.
    pub kind: WarningKind,
    /// The offending text, trimmed.
    pub text: String,
}

impl fmt::Display for DeclarationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::MalformedDeclaration => "malformed declaration kept verbatim",
            WarningKind::MalformedValue => "unparsable value kept verbatim",
            WarningKind::NestedBlockKept => "nested block kept verbatim",
            WarningKind::UnsortableCondition => "breakpoint not numeric, ordered by appearance",
        };
        write!(f, "{}: {}: `{}`", self.position, what, self.text)
    }
}
