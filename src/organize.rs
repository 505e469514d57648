//! Sectioning and ordering of consolidated nodes.
//!
//! Sections come out in a fixed order: preserved comments, leading
//! statement at-rules, custom properties, reset/base rules, components,
//! media queries, other at-rules. Rules never move between sections, and
//! only `Components` and the interiors of `@media` blocks are ever sorted.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::error::{DeclarationWarning, WarningKind};
use crate::merge::coalesce_adjacent;
use crate::report::{ChangeEvent, ChangeReport};
use crate::selector::{Component, Selector};
use crate::stylesheet::{AtRule, AtRuleKind, Block, Node, Rule};

/// Element types treated as reset/base selectors.
const BASE_TYPES: &[&str] = &["html", "body"];

/// How rules inside a sortable run are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Keep merged source order.
    #[default]
    Source,
    /// Alphabetical, except where it would reorder `:link`/`:visited`/
    /// `:hover`/`:focus`/`:active` variants of one selector.
    Safe,
    /// Alphabetical with no pseudo-class check.
    Unsafe,
}

/// Section a node is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionLabel {
    /// `/*! ... */` comments
    Preserved,
    /// `@charset`, `@import`, `@namespace`
    Imports,
    /// `:root` and custom-property-only rules
    CustomProperties,
    /// `*`, `html`, `body` and bare pseudo-element rules
    Base,
    /// Every other rule
    Components,
    /// Consolidated `@media` blocks
    MediaQueries,
    /// Every other at-rule
    AtRules,
}

impl SectionLabel {
    /// Header text, `None` for sections rendered without a header.
    pub fn title(self) -> Option<&'static str> {
        match self {
            SectionLabel::Preserved => None,
            SectionLabel::Imports => Some("Imports"),
            SectionLabel::CustomProperties => Some("Custom Properties"),
            SectionLabel::Base => Some("Reset & Base"),
            SectionLabel::Components => Some("Components"),
            SectionLabel::MediaQueries => Some("Media Queries"),
            SectionLabel::AtRules => Some("At-Rules"),
        }
    }
}

/// A labelled run of output nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Which section this is
    pub label: SectionLabel,
    /// Nodes in output order
    pub nodes: Vec<Node>,
}

/// Bucket consolidated nodes into sections and order them.
///
/// Only non-empty sections are returned.
pub fn organize(nodes: Vec<Node>, mode: SortMode, report: &mut ChangeReport) -> Vec<Section> {
    let mut preserved = Vec::new();
    let mut imports = Vec::new();
    let mut custom = Vec::new();
    let mut base = Vec::new();
    let mut components = Vec::new();
    let mut media = Vec::new();
    let mut at_rules = Vec::new();

    for node in nodes {
        match node {
            Node::Comment(_) => preserved.push(node),
            Node::AtRule(at_rule) if at_rule.must_lead() => imports.push(at_rule),
            Node::AtRule(at_rule) if at_rule.kind == AtRuleKind::Media => media.push(at_rule),
            Node::AtRule(_) => at_rules.push(node),
            Node::Rule(rule) => {
                if is_custom_property_rule(&rule) {
                    custom.push(rule);
                } else if is_base_rule(&rule) {
                    base.push(rule);
                } else {
                    components.push(rule);
                }
            }
        }
    }

    imports.sort_by_key(|at_rule| (leading_rank(&at_rule.name), at_rule.source_index));
    let media = order_media(media, report);

    let sections = [
        (SectionLabel::Preserved, preserved),
        (SectionLabel::Imports, imports.into_iter().map(Node::AtRule).collect()),
        (SectionLabel::CustomProperties, rule_nodes(coalesce_adjacent(custom))),
        (SectionLabel::Base, rule_nodes(coalesce_adjacent(base))),
        (SectionLabel::Components, rule_nodes(arrange_rules(components, mode))),
        (
            SectionLabel::MediaQueries,
            media
                .into_iter()
                .map(|at_rule| Node::AtRule(arrange_block(at_rule, mode)))
                .collect(),
        ),
        (SectionLabel::AtRules, at_rules),
    ];

    let sections: Vec<Section> = sections
        .into_iter()
        .filter(|(_, nodes)| !nodes.is_empty())
        .map(|(label, nodes)| Section { label, nodes })
        .collect();
    log::debug!(
        "[organize] {} sections, sort mode {:?}",
        sections.len(),
        mode
    );
    sections
}

fn rule_nodes(rules: Vec<Rule>) -> Vec<Node> {
    rules.into_iter().map(Node::Rule).collect()
}

fn leading_rank(name: &str) -> u8 {
    match name {
        "charset" => 0,
        "import" => 1,
        _ => 2,
    }
}

/// `:root`, or a rule declaring nothing but custom properties.
pub fn is_custom_property_rule(rule: &Rule) -> bool {
    let is_root = |s: &Selector| {
        matches!(
            s.components.as_slice(),
            [Component::PseudoClass { name, argument: None }] if name == "root"
        )
    };
    (rule.selectors.len() == 1 && is_root(&rule.selectors[0]))
        || (!rule.declarations.is_empty()
            && rule.declarations.iter().all(|d| d.is_custom_property()))
}

/// Every selector is `*`, `html` or `body`, optionally followed by
/// pseudo-elements, or is a bare pseudo-element such as `::selection`.
pub fn is_base_rule(rule: &Rule) -> bool {
    rule.selectors.iter().all(|selector| {
        let (head, rest) = match selector.components.split_first() {
            Some(parts) => parts,
            None => return false,
        };
        let head_ok = match head {
            Component::Universal => true,
            Component::Type(name) => BASE_TYPES.contains(&name.as_str()),
            Component::PseudoElement { .. } => true,
            _ => false,
        };
        head_ok
            && rest
                .iter()
                .all(|c| matches!(c, Component::PseudoElement { .. }))
    })
}

/// Order rules of one run according to `mode`.
pub fn sort_rules(rules: Vec<Rule>, mode: SortMode) -> Vec<Rule> {
    match mode {
        SortMode::Source => rules,
        SortMode::Unsafe => {
            let mut keyed: Vec<(String, Rule)> =
                rules.into_iter().map(|r| (sort_key(&r), r)).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed.into_iter().map(|(_, r)| r).collect()
        }
        SortMode::Safe => safe_sort(rules),
    }
}

/// Lowercased first selector of a unit.
fn sort_key(rule: &Rule) -> String {
    rule.selectors
        .first()
        .map(|s| s.to_css().to_lowercase())
        .unwrap_or_default()
}

/// Coalesce neighbours, sort, then coalesce the neighbours the sort created.
fn arrange_rules(rules: Vec<Rule>, mode: SortMode) -> Vec<Rule> {
    let rules = coalesce_adjacent(rules);
    match mode {
        SortMode::Source => rules,
        _ => coalesce_adjacent(sort_rules(rules, mode)),
    }
}

/// Pseudo-ranked selectors of a sort unit as `(base key, rank)`, one entry
/// per base key carrying the highest rank seen for it.
fn unit_ranks(rule: &Rule) -> Vec<(String, u8)> {
    let mut ranks: Vec<(String, u8)> = Vec::new();
    for selector in &rule.selectors {
        let Some(rank) = selector.max_pseudo_rank() else {
            continue;
        };
        let base = selector.base_key();
        match ranks.iter_mut().find(|(key, _)| *key == base) {
            Some(entry) => entry.1 = entry.1.max(rank),
            None => ranks.push((base, rank)),
        }
    }
    ranks
}

/// Alphabetical order, except for units in a base-key group whose pseudo
/// ranks the sort would break. Those units are pinned: they fill the slots
/// the sort gave them, in source order.
///
/// A comma unit joins the group of every base key it carries, so pinning it
/// can reorder another group; the check repeats until nothing new is pinned.
fn safe_sort(rules: Vec<Rule>) -> Vec<Rule> {
    let keys: Vec<String> = rules.iter().map(sort_key).collect();
    let mut order: Vec<usize> = (0..rules.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    // Members of each base-key group as `(unit, rank)`, in source order.
    let mut groups: IndexMap<String, Vec<(usize, u8)>> = IndexMap::new();
    for (idx, rule) in rules.iter().enumerate() {
        for (base, rank) in unit_ranks(rule) {
            groups.entry(base).or_default().push((idx, rank));
        }
    }
    groups.retain(|_, members| members.len() > 1);

    let mut pinned = alloc::vec![false; rules.len()];
    let mut result = order.clone();
    loop {
        let mut slot_of = alloc::vec![0; rules.len()];
        for (slot, &idx) in result.iter().enumerate() {
            slot_of[idx] = slot;
        }

        let mut newly_pinned = false;
        for (base, members) in &groups {
            if members.iter().all(|&(idx, _)| pinned[idx]) {
                continue;
            }
            let mut placed = members.clone();
            placed.sort_by_key(|&(idx, _)| slot_of[idx]);
            let keeps_rank_order = placed
                .windows(2)
                .all(|pair| (pair[0].1, pair[0].0) < (pair[1].1, pair[1].0));
            if keeps_rank_order {
                continue;
            }
            log::debug!(
                "[organize] keeping source order of `{}` pseudo-class variants",
                base
            );
            for &(idx, _) in members {
                newly_pinned |= !pinned[idx];
                pinned[idx] = true;
            }
        }
        if !newly_pinned {
            break;
        }

        let slots: Vec<usize> = (0..order.len()).filter(|&slot| pinned[order[slot]]).collect();
        let mut originals: Vec<usize> = slots.iter().map(|&slot| order[slot]).collect();
        originals.sort_unstable();
        result = order.clone();
        for (&slot, idx) in slots.iter().zip(originals) {
            result[slot] = idx;
        }
    }

    let mut taken: Vec<Option<Rule>> = rules.into_iter().map(Some).collect();
    result
        .into_iter()
        .filter_map(|idx| taken[idx].take())
        .collect()
}

/// Coalesce and sort every run of rules inside an at-rule block.
fn arrange_block(mut at_rule: AtRule, mode: SortMode) -> AtRule {
    if let Some(Block::Rules(nodes)) = at_rule.block.take() {
        at_rule.block = Some(Block::Rules(arrange_nodes(nodes, mode)));
    }
    at_rule
}

fn arrange_nodes(nodes: Vec<Node>, mode: SortMode) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut run = Vec::new();
    for node in nodes {
        match node {
            Node::Rule(rule) => run.push(rule),
            other => {
                flush_run(&mut run, &mut out, mode);
                match other {
                    Node::AtRule(at_rule) if at_rule.kind == AtRuleKind::Media => {
                        out.push(Node::AtRule(arrange_block(at_rule, mode)))
                    }
                    other => out.push(other),
                }
            }
        }
    }
    flush_run(&mut run, &mut out, mode);
    out
}

fn flush_run(run: &mut Vec<Rule>, out: &mut Vec<Node>, mode: SortMode) {
    if run.is_empty() {
        return;
    }
    let rules = arrange_rules(core::mem::take(run), mode);
    out.extend(rules.into_iter().map(Node::Rule));
}

/// Breakpoint class used to order `@media` blocks.
#[derive(Clone, Copy, Debug, PartialEq)]
enum MediaOrder {
    MinWidth(f64),
    MaxWidth(f64),
    Unordered,
    Print,
}

impl MediaOrder {
    fn sort_key(self) -> (u8, f64) {
        match self {
            MediaOrder::MinWidth(px) => (0, px),
            MediaOrder::MaxWidth(px) => (1, -px),
            MediaOrder::Unordered => (2, 0.0),
            MediaOrder::Print => (3, 0.0),
        }
    }
}

/// Breakpoint order; ties (and conditions without a breakpoint) keep the
/// order in which each condition first appeared.
fn order_media(media: Vec<AtRule>, report: &mut ChangeReport) -> Vec<AtRule> {
    let mut keyed: Vec<((u8, f64), AtRule)> = media
        .into_iter()
        .map(|at_rule| {
            let order = classify_media(&at_rule, report);
            (order.sort_key(), at_rule)
        })
        .collect();
    keyed.sort_by(|(a, first), (b, second)| {
        a.0.cmp(&b.0)
            .then(a.1.total_cmp(&b.1))
            .then(first.first_source_index.cmp(&second.first_source_index))
    });
    keyed.into_iter().map(|(_, at_rule)| at_rule).collect()
}

fn classify_media(at_rule: &AtRule, report: &mut ChangeReport) -> MediaOrder {
    let condition = at_rule.prelude.as_str();
    let is_print = condition
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .any(|word| word == "print");
    if is_print {
        return MediaOrder::Print;
    }

    let min = condition.find("min-width");
    let max = condition.find("max-width");
    let (feature_at, is_min) = match (min, max) {
        (Some(a), Some(b)) => (a.min(b), a < b),
        (Some(a), None) => (a, true),
        (None, Some(b)) => (b, false),
        (None, None) => return MediaOrder::Unordered,
    };

    let rest = &condition[feature_at + "min-width".len()..];
    let value = rest
        .trim_start()
        .strip_prefix(':')
        .map(|v| v.split(')').next().unwrap_or_default().trim());
    match value.and_then(breakpoint_px) {
        Some(px) if is_min => MediaOrder::MinWidth(px),
        Some(px) => MediaOrder::MaxWidth(px),
        None => {
            report.record(ChangeEvent::Warning(DeclarationWarning {
                position: at_rule.position,
                kind: WarningKind::UnsortableCondition,
                text: String::from(condition),
            }));
            MediaOrder::Unordered
        }
    }
}

/// Read a breakpoint as pixels (`em`/`rem` at 16px).
fn breakpoint_px(value: &str) -> Option<f64> {
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.parse().ok()?;
    match unit {
        "px" => Some(number),
        "em" | "rem" => Some(number * 16.0),
        "" if number == 0.0 => Some(0.0),
        _ => None,
    }
}
