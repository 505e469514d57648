//! Statistics collector for a compile run.
//!
//! Pipeline stages never touch shared state: they receive a `&mut
//! ChangeReport` and `record` events into it. The finished report is returned
//! to the caller together with the output text.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use crate::error::DeclarationWarning;

/// Something a pipeline stage did to the stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChangeEvent {
    /// A qualified rule was parsed.
    RuleParsed,
    /// A single selector entered the merge engine.
    SelectorSeen,
    /// A selector matched an existing merge group.
    SelectorDeduplicated,
    /// A merge group absorbed two or more source rules.
    RulesMerged,
    /// A declaration replaced an earlier one for the same property.
    DeclarationOverridden,
    /// A plain declaration lost to an earlier `!important` one.
    ImportantKept,
    /// A rule with no declarations was dropped.
    EmptyRuleRemoved,
    /// A declaration with an empty value was dropped.
    EmptyDeclarationRemoved,
    /// An ordinary comment was dropped.
    CommentRemoved,
    /// An `@media` block was folded into an earlier one with the same condition.
    MediaQueryMerged,
    /// An `@keyframes` block was superseded by a later one with the same name.
    KeyframesRemoved,
    /// An at-rule the consolidator does not merge was passed through.
    AtRulePreserved,
    /// Content was kept verbatim because it could not be interpreted.
    Warning(DeclarationWarning),
}

/// Accumulated counts for one compile run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// Qualified rules found by the parser, nested ones included.
    pub rules_parsed: usize,
    /// Single selectors fed to the merge engine.
    pub selectors_seen: usize,
    /// Merge groups built from two or more source rules.
    pub rules_merged: usize,
    /// Selectors that landed in an existing merge group.
    pub selectors_deduplicated: usize,
    /// Declarations replaced by a later one.
    pub declarations_overridden: usize,
    /// Plain declarations that lost to an earlier `!important`.
    pub important_kept: usize,
    /// Rules dropped because they had no declarations.
    pub empty_rules_removed: usize,
    /// Declarations dropped because their value was empty.
    pub empty_declarations_removed: usize,
    /// Ordinary comments dropped.
    pub comments_removed: usize,
    /// `@media` blocks folded into another block.
    pub media_queries_merged: usize,
    /// `@keyframes` blocks superseded by a later block.
    pub keyframes_removed: usize,
    /// At-rules passed through untouched.
    pub at_rules_preserved: usize,
    /// Size of the input in bytes.
    pub bytes_before: usize,
    /// Size of the output in bytes.
    pub bytes_after: usize,
    warnings: Vec<DeclarationWarning>,
}

impl ChangeReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event.
    pub fn record(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::RuleParsed => self.rules_parsed += 1,
            ChangeEvent::SelectorSeen => self.selectors_seen += 1,
            ChangeEvent::SelectorDeduplicated => self.selectors_deduplicated += 1,
            ChangeEvent::RulesMerged => self.rules_merged += 1,
            ChangeEvent::DeclarationOverridden => self.declarations_overridden += 1,
            ChangeEvent::ImportantKept => self.important_kept += 1,
            ChangeEvent::EmptyRuleRemoved => self.empty_rules_removed += 1,
            ChangeEvent::EmptyDeclarationRemoved => self.empty_declarations_removed += 1,
            ChangeEvent::CommentRemoved => self.comments_removed += 1,
            ChangeEvent::MediaQueryMerged => self.media_queries_merged += 1,
            ChangeEvent::KeyframesRemoved => self.keyframes_removed += 1,
            ChangeEvent::AtRulePreserved => self.at_rules_preserved += 1,
            ChangeEvent::Warning(warning) => {
                log::warn!("[report] {}", warning);
                self.warnings.push(warning);
            }
        }
    }

    /// Warnings in the order they were raised.
    pub fn warnings(&self) -> &[DeclarationWarning] {
        &self.warnings
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Bytes removed by the compile; zero if the output grew.
    pub fn bytes_saved(&self) -> usize {
        self.bytes_before.saturating_sub(self.bytes_after)
    }

    /// Size reduction as a percentage of the input.
    pub fn reduction_percent(&self) -> f64 {
        if self.bytes_before == 0 {
            return 0.0;
        }
        (self.bytes_before as f64 - self.bytes_after as f64) * 100.0 / self.bytes_before as f64
    }

    /// Fold counts from a report built separately (for instance per block).
    pub fn merge(&mut self, other: ChangeReport) {
        self.rules_parsed += other.rules_parsed;
        self.selectors_seen += other.selectors_seen;
        self.rules_merged += other.rules_merged;
        self.selectors_deduplicated += other.selectors_deduplicated;
        self.declarations_overridden += other.declarations_overridden;
        self.important_kept += other.important_kept;
        self.empty_rules_removed += other.empty_rules_removed;
        self.empty_declarations_removed += other.empty_declarations_removed;
        self.comments_removed += other.comments_removed;
        self.media_queries_merged += other.media_queries_merged;
        self.keyframes_removed += other.keyframes_removed;
        self.at_rules_preserved += other.at_rules_preserved;
        self.bytes_before += other.bytes_before;
        self.bytes_after += other.bytes_after;
        self.warnings.extend(other.warnings);
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size:          {} bytes", self.bytes_before)?;
        writeln!(f, "Final size:             {} bytes", self.bytes_after)?;
        writeln!(
            f,
            "Reduction:              {} bytes ({:.1}%)",
            self.bytes_saved(),
            self.reduction_percent()
        )?;
        writeln!(f, "Rules parsed:           {}", self.rules_parsed)?;
        writeln!(f, "Selectors seen:         {}", self.selectors_seen)?;
        writeln!(f, "Rules merged:           {}", self.rules_merged)?;
        writeln!(f, "Selectors deduplicated: {}", self.selectors_deduplicated)?;
        writeln!(f, "Declarations replaced:  {}", self.declarations_overridden)?;
        writeln!(f, "!important kept:        {}", self.important_kept)?;
        writeln!(f, "Empty rules removed:    {}", self.empty_rules_removed)?;
        writeln!(f, "Media queries merged:   {}", self.media_queries_merged)?;
        writeln!(f, "Keyframes removed:      {}", self.keyframes_removed)?;
        writeln!(f, "At-rules preserved:     {}", self.at_rules_preserved)?;
        write!(f, "Warnings:               {}", self.warning_count())
    }
}
