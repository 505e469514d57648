//! Parsed stylesheet tree
//!
//! A `Stylesheet` owns an ordered list of `Node`s. Every node records the
//! `source_index` it was parsed at (document pre-order across the whole
//! file), so later stages can compare positions of nodes that started out in
//! different containers.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Position;
use crate::selector::Selector;
use crate::tokenizer::{self, ComponentValue};

/// A parsed stylesheet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    /// Create an empty stylesheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the stylesheet has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over top-level qualified rules
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            _ => None,
        })
    }

    /// Iterate over top-level at-rules
    pub fn at_rules(&self) -> impl Iterator<Item = &AtRule> {
        self.nodes.iter().filter_map(|node| match node {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        })
    }
}

/// A node of the stylesheet tree
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Qualified (style) rule
    Rule(Rule),
    /// At-rule, with or without a block
    AtRule(AtRule),
    /// Top-level or block-level comment
    Comment(Comment),
}

impl Node {
    /// Position of this node in the original document order
    pub fn source_index(&self) -> usize {
        match self {
            Node::Rule(rule) => rule.source_index,
            Node::AtRule(at_rule) => at_rule.source_index,
            Node::Comment(comment) => comment.source_index,
        }
    }
}

/// A style rule: selectors plus declarations
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Comma-separated selector list, in source order
    pub selectors: Vec<Selector>,
    /// Declarations, in source order
    pub declarations: Vec<Declaration>,
    /// Document-order index used for deterministic ordering
    pub source_index: usize,
    /// Where the rule's prelude starts
    pub position: Position,
}

impl Rule {
    /// Check if the rule has no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Selector list rendered as `a, b`
    pub fn selector_text(&self) -> String {
        let parts: Vec<String> = self.selectors.iter().map(Selector::to_css).collect();
        parts.join(", ")
    }
}

/// At-rule categories the consolidator distinguishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtRuleKind {
    /// `@media`
    Media,
    /// `@keyframes`, including vendor-prefixed forms
    Keyframes,
    /// Everything else; passed through untouched
    Other,
}

/// An at-rule
#[derive(Clone, Debug, PartialEq)]
pub struct AtRule {
    /// Category
    pub kind: AtRuleKind,
    /// At-keyword without `@`, lowercased (`media`, `-webkit-keyframes`)
    pub name: String,
    /// Normalized prelude: canonical condition for `@media`, the animation
    /// name for `@keyframes`, whitespace-collapsed text otherwise
    pub prelude: String,
    /// Block contents, `None` for statements such as `@import ...;`
    pub block: Option<Block>,
    /// Document-order index used for deterministic ordering
    pub source_index: usize,
    /// Index of the first block folded into this one; equals
    /// `source_index` unless several blocks were consolidated
    pub first_source_index: usize,
    /// Where the `@` is
    pub position: Position,
}

impl AtRule {
    /// Check if this is a statement at-rule (no block)
    pub fn is_statement(&self) -> bool {
        self.block.is_none()
    }

    /// Check if CSS requires this at-rule before any other rule
    pub fn must_lead(&self) -> bool {
        self.is_statement() && matches!(self.name.as_str(), "charset" | "import" | "namespace")
    }
}

/// Contents of an at-rule block
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Nested rules and at-rules (`@media`, `@supports`, ...)
    Rules(Vec<Node>),
    /// Keyframe blocks (`@keyframes`)
    Keyframes(Vec<Keyframe>),
    /// Plain declarations (`@font-face`, `@page`, ...)
    Declarations(Vec<Declaration>),
}

/// One keyframe block such as `from { ... }` or `50%, 75% { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Keyframe selectors, lowercased (`from`, `50%`)
    pub selectors: Vec<String>,
    /// Declarations, in source order
    pub declarations: Vec<Declaration>,
}

/// A comment node
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    /// Comment text between `/*` and `*/`
    pub text: String,
    /// Document-order index
    pub source_index: usize,
    /// Where the `/*` is
    pub position: Position,
}

impl Comment {
    /// `/*! ... */` comments are kept in the output
    pub fn is_preserved(&self) -> bool {
        self.text.starts_with('!')
    }
}

/// A CSS declaration (property-value pair)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    /// Property name; lowercased unless it is a custom property
    pub property: String,
    /// Value tokens without `!important`, never interpreted
    pub value: Vec<ComponentValue>,
    /// Whether the declaration carried `!important`
    pub important: bool,
    /// Source text kept as-is when the declaration could not be parsed
    pub verbatim: Option<String>,
}

impl Declaration {
    /// Create a declaration from already-tokenized parts.
    pub fn new(property: impl Into<String>, value: Vec<ComponentValue>, important: bool) -> Self {
        Self {
            property: property.into(),
            value,
            important,
            verbatim: None,
        }
    }

    /// Create a declaration that is rendered exactly as `text`.
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self {
            property: String::new(),
            value: Vec::new(),
            important: false,
            verbatim: Some(text.into()),
        }
    }

    /// Key under which declarations replace each other when merging.
    ///
    /// Verbatim declarations are keyed by their full text so they are never
    /// replaced by a parsed declaration for the same property.
    pub fn merge_key(&self) -> &str {
        self.verbatim.as_deref().unwrap_or(&self.property)
    }

    /// Check for a `--*` custom property
    pub fn is_custom_property(&self) -> bool {
        self.verbatim.is_none() && self.property.starts_with("--")
    }

    /// Value rendered back to text
    pub fn value_text(&self) -> String {
        tokenizer::to_css(&self.value)
    }
}
