//! Compile entry point and its options.
//!
//! `compile` runs the stages strictly in order: parse, consolidate (which
//! merges rules scope by scope), organize, serialize. It never touches the
//! filesystem.

extern crate alloc;

use alloc::string::String;

use crate::consolidate::consolidate;
use crate::error::SyntaxError;
use crate::organize::{organize, SortMode};
use crate::parser::parse_stylesheet_with_report;
use crate::report::ChangeReport;
use crate::serialize::serialize;

/// Default cap on nested at-rule blocks.
pub const DEFAULT_MAX_NESTING: usize = 32;

/// Resource limits applied while parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileLimits {
    /// Maximum depth of nested rule-holding at-rule blocks.
    pub max_nesting: usize,
}

impl Default for CompileLimits {
    fn default() -> Self {
        Self {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl CompileLimits {
    /// Set the maximum nesting depth (at least 1).
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting.max(1);
        self
    }
}

/// Options for a compile run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Sort component rules and `@media` interiors by selector.
    pub alphabetical: bool,
    /// Skip the pseudo-class safety check when sorting.
    ///
    /// Only meaningful together with `alphabetical`.
    pub unsafe_sort: bool,
    /// Parser limits.
    pub limits: CompileLimits,
}

impl CompileOptions {
    /// Default options: source order, default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable alphabetical sorting.
    pub fn with_alphabetical(mut self, alphabetical: bool) -> Self {
        self.alphabetical = alphabetical;
        self
    }

    /// Enable or disable unsafe (unchecked) sorting.
    pub fn with_unsafe_sort(mut self, unsafe_sort: bool) -> Self {
        self.unsafe_sort = unsafe_sort;
        self
    }

    /// Set explicit parser limits.
    pub fn with_limits(mut self, limits: CompileLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sort mode implied by the two flags.
    pub fn sort_mode(&self) -> SortMode {
        match (self.alphabetical, self.unsafe_sort) {
            (false, _) => SortMode::Source,
            (true, false) => SortMode::Safe,
            (true, true) => SortMode::Unsafe,
        }
    }
}

/// Result of a successful compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOutput {
    /// Transformed stylesheet text.
    pub css: String,
    /// What the run changed.
    pub report: ChangeReport,
}

/// Compile a stylesheet.
///
/// Either the whole stylesheet parses and an output is produced, or the
/// first `SyntaxError` is returned and nothing else.
///
/// # Example
/// ```
/// use stylefold::{compile, CompileOptions};
///
/// let out = compile(".a{color:red} .a{margin:0}", &CompileOptions::default()).unwrap();
/// assert!(out.css.contains(".a {\n    color: red;\n    margin: 0;\n}"));
/// assert_eq!(out.report.rules_merged, 1);
/// ```
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput, SyntaxError> {
    let mut report = ChangeReport::new();
    report.bytes_before = source.len();

    let stylesheet = parse_stylesheet_with_report(source, &options.limits, &mut report)?;
    let nodes = consolidate(stylesheet.nodes, &mut report);
    let sections = organize(nodes, options.sort_mode(), &mut report);
    let css = serialize(&sections);

    report.bytes_after = css.len();
    log::debug!(
        "[compile] {} -> {} bytes, {} rules merged, {} warnings",
        report.bytes_before,
        report.bytes_after,
        report.rules_merged,
        report.warning_count()
    );
    Ok(CompileOutput { css, report })
}
