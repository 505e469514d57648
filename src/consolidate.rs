//! At-rule consolidation
//!
//! Works one scope (top level or one `@media` body) at a time:
//! rules go through the merge engine, `@keyframes` are deduplicated by name
//! with the last block winning, `@media` blocks with the same normalized
//! condition are concatenated and consolidated recursively. Every other
//! at-rule is passed through as-is.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::error::Position;
use crate::merge::{merge, Scope};
use crate::report::{ChangeEvent, ChangeReport};
use crate::stylesheet::{AtRule, AtRuleKind, Block, Node};

/// `@media` blocks sharing one condition, in source order.
struct MediaGroup {
    name: String,
    body: Vec<Node>,
    blocks: usize,
    first_source_index: usize,
    source_index: usize,
    position: Position,
}

/// Consolidate a top-level node list.
pub fn consolidate(nodes: Vec<Node>, report: &mut ChangeReport) -> Vec<Node> {
    consolidate_scope(nodes, &Scope::Top, report)
}

fn consolidate_scope(nodes: Vec<Node>, scope: &Scope<'_>, report: &mut ChangeReport) -> Vec<Node> {
    let mut rules = Vec::new();
    let mut out = Vec::with_capacity(nodes.len());
    let mut keyframes: IndexMap<(String, String), AtRule> = IndexMap::new();
    let mut media: IndexMap<String, MediaGroup> = IndexMap::new();

    for node in nodes {
        match node {
            Node::Rule(rule) => rules.push(rule),
            Node::Comment(comment) if comment.is_preserved() => out.push(Node::Comment(comment)),
            Node::Comment(_) => report.record(ChangeEvent::CommentRemoved),
            Node::AtRule(at_rule) => match at_rule.kind {
                AtRuleKind::Keyframes => {
                    let key = (at_rule.name.clone(), at_rule.prelude.clone());
                    if let Some(previous) = keyframes.insert(key, at_rule) {
                        log::debug!(
                            "[consolidate] {}: @{} {} superseded by a later block",
                            scope,
                            previous.name,
                            previous.prelude
                        );
                        report.record(ChangeEvent::KeyframesRemoved);
                    }
                }
                AtRuleKind::Media => absorb_media(&mut media, at_rule),
                AtRuleKind::Other => {
                    report.record(ChangeEvent::AtRulePreserved);
                    out.push(Node::AtRule(at_rule));
                }
            },
        }
    }

    out.extend(merge(rules, scope, report).into_iter().map(Node::Rule));
    out.extend(keyframes.into_values().map(Node::AtRule));

    for (condition, group) in media {
        for _ in 1..group.blocks {
            report.record(ChangeEvent::MediaQueryMerged);
        }
        if group.blocks > 1 {
            log::debug!(
                "[consolidate] {}: {} blocks for @media {} merged",
                scope,
                group.blocks,
                condition
            );
        }

        let identity = format!("@media {}", condition);
        let body = consolidate_scope(group.body, &Scope::AtRule(&identity), report);
        if body.is_empty() {
            log::debug!("[consolidate] {}: dropping empty {}", scope, identity);
            continue;
        }
        out.push(Node::AtRule(AtRule {
            kind: AtRuleKind::Media,
            name: group.name,
            prelude: condition,
            block: Some(Block::Rules(body)),
            source_index: group.source_index,
            first_source_index: group.first_source_index,
            position: group.position,
        }));
    }

    out.sort_by_key(Node::source_index);
    out
}

fn absorb_media(media: &mut IndexMap<String, MediaGroup>, at_rule: AtRule) {
    let body = match at_rule.block {
        Some(Block::Rules(nodes)) => nodes,
        _ => Vec::new(),
    };
    let group = media
        .entry(at_rule.prelude)
        .or_insert_with(|| MediaGroup {
            name: at_rule.name,
            body: Vec::new(),
            blocks: 0,
            first_source_index: at_rule.first_source_index,
            source_index: at_rule.source_index,
            position: at_rule.position,
        });
    group.body.extend(body);
    group.blocks += 1;
    group.source_index = at_rule.source_index;
    group.position = at_rule.position;
}
