//! stylefold -- Cascade-safe CSS rule merging and reorganization
//!
//! Parses a stylesheet into a tree, merges rules that share a selector,
//! consolidates repeated `@media` and `@keyframes` blocks, and writes the
//! result back out grouped into sections (custom properties, reset/base,
//! components, media queries, other at-rules).
//!
//! # Features
//!
//! - `cli` -- builds the `stylefold` command-line binary
//!
//! # Pipeline
//!
//! [`compile`] runs every stage in order and returns the output text plus a
//! [`ChangeReport`]. Each stage is also public on its own:
//! [`parse_stylesheet`] -> [`consolidate`] (which drives [`merge`]) ->
//! [`organize`] -> [`serialize`].
//!
//! Values are never interpreted: declarations keep their token sequence
//! and original case, only property names are normalized.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![deny(clippy::large_enum_variant, clippy::large_stack_arrays, clippy::redundant_clone)]
#![warn(
    clippy::box_collection,
    clippy::needless_collect,
    clippy::map_clone,
    clippy::implicit_clone,
    clippy::inefficient_to_string
)]

extern crate alloc;

pub mod consolidate;
pub mod error;
pub mod merge;
pub mod organize;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod selector;
pub mod serialize;
pub mod stylesheet;
pub mod tokenizer;

// Re-export key types for convenience
pub use consolidate::consolidate;
pub use error::{DeclarationWarning, Position, SyntaxError, SyntaxErrorKind, WarningKind};
pub use merge::{coalesce_adjacent, merge, Scope};
pub use organize::{organize, Section, SectionLabel, SortMode};
pub use parser::{parse_stylesheet, parse_stylesheet_with_report};
pub use pipeline::{compile, CompileLimits, CompileOptions, CompileOutput};
pub use report::{ChangeEvent, ChangeReport};
pub use selector::{
    parse_selector_list, pseudo_order_rank, specificity, structural_key, Selector, Specificity,
};
pub use serialize::serialize;
pub use stylesheet::{AtRule, AtRuleKind, Block, Declaration, Keyframe, Node, Rule, Stylesheet};
pub use tokenizer::{ComponentValue, TokenizeError};
