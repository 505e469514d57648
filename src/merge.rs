//! Rule merge engine
//!
//! Rules are split into one entry per selector and grouped by structural
//! key. Each group accumulates declarations with last-wins semantics, except
//! that a plain declaration never replaces an `!important` one. A group is
//! emitted at the position of the last rule that contributed to it.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::Position;
use crate::report::{ChangeEvent, ChangeReport};
use crate::selector::{structural_key, Selector};
use crate::stylesheet::{Declaration, Rule};

/// Cascade scope a merge pass runs in.
///
/// Rules are only ever merged with rules of the same scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Top level of the stylesheet
    Top,
    /// Inside an at-rule block, identified by its keyword and prelude
    AtRule(&'a str),
}

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Top => f.write_str("top"),
            Scope::AtRule(identity) => f.write_str(identity),
        }
    }
}

/// Accumulated state for one selector during a merge pass.
struct MergeGroup {
    selector: Selector,
    declarations: IndexMap<String, Declaration>,
    /// `(source_index, selector position)` of the latest contribution
    order: (usize, usize),
    position: Position,
    /// Distinct source rules folded into this group
    contributors: usize,
}

impl MergeGroup {
    fn new(selector: Selector, rule: &Rule, selector_pos: usize) -> Self {
        Self {
            selector,
            declarations: IndexMap::new(),
            order: (rule.source_index, selector_pos),
            position: rule.position,
            contributors: 1,
        }
    }

    /// Fold one declaration into the group.
    fn absorb(&mut self, declaration: &Declaration, report: &mut ChangeReport) {
        let key = declaration.merge_key();
        match self.declarations.get(key).map(|d| d.important) {
            Some(true) if !declaration.important => {
                report.record(ChangeEvent::ImportantKept);
            }
            Some(_) => {
                // Re-insert at the end so later-wins order holds against
                // shorthands declared in between.
                self.declarations.shift_remove(key);
                self.declarations.insert(key.into(), declaration.clone());
                report.record(ChangeEvent::DeclarationOverridden);
            }
            None => {
                self.declarations.insert(key.into(), declaration.clone());
            }
        }
    }

    fn into_rule(self) -> Rule {
        Rule {
            selectors: alloc::vec![self.selector],
            declarations: self.declarations.into_values().collect(),
            source_index: self.order.0,
            position: self.position,
        }
    }
}

/// Merge rules that share a selector.
///
/// Returns one single-selector rule per distinct selector, ordered by the
/// source index of each selector's last contributing rule. Rules without
/// declarations are dropped.
pub fn merge(rules: Vec<Rule>, scope: &Scope<'_>, report: &mut ChangeReport) -> Vec<Rule> {
    let input = rules.len();
    let mut groups: IndexMap<String, MergeGroup> = IndexMap::new();

    for mut rule in rules {
        if rule.is_empty() {
            log::debug!("[merge] {}: dropping empty rule `{}`", scope, rule.selector_text());
            report.record(ChangeEvent::EmptyRuleRemoved);
            continue;
        }

        let selectors = core::mem::take(&mut rule.selectors);
        for (selector_pos, selector) in selectors.into_iter().enumerate() {
            report.record(ChangeEvent::SelectorSeen);
            match groups.entry(structural_key(&selector)) {
                Entry::Occupied(mut entry) => {
                    report.record(ChangeEvent::SelectorDeduplicated);
                    let group = entry.get_mut();
                    if group.order.0 != rule.source_index {
                        group.contributors += 1;
                    }
                    group.order = (rule.source_index, selector_pos);
                    group.position = rule.position;
                    for declaration in &rule.declarations {
                        group.absorb(declaration, report);
                    }
                }
                Entry::Vacant(entry) => {
                    let group = entry.insert(MergeGroup::new(selector, &rule, selector_pos));
                    for declaration in &rule.declarations {
                        group.absorb(declaration, report);
                    }
                }
            }
        }
    }

    let mut groups: Vec<MergeGroup> = groups.into_values().collect();
    for group in groups.iter().filter(|g| g.contributors > 1) {
        log::debug!(
            "[merge] {}: `{}` merged from {} rules",
            scope,
            group.selector,
            group.contributors
        );
        report.record(ChangeEvent::RulesMerged);
    }
    groups.sort_by_key(|g| g.order);

    let merged: Vec<Rule> = groups.into_iter().map(MergeGroup::into_rule).collect();
    log::debug!("[merge] {}: {} rules in, {} selectors out", scope, input, merged.len());
    merged
}

/// Join consecutive rules with identical declarations into one rule with a
/// combined selector list.
///
/// Only neighbours are joined; moving a rule past another could change
/// which declaration wins.
pub fn coalesce_adjacent(rules: Vec<Rule>) -> Vec<Rule> {
    let mut out: Vec<Rule> = Vec::with_capacity(rules.len());
    for rule in rules {
        if let Some(prev) = out.last_mut() {
            if prev.declarations == rule.declarations {
                for selector in rule.selectors {
                    if !prev.selectors.contains(&selector) {
                        prev.selectors.push(selector);
                    }
                }
                continue;
            }
        }
        out.push(rule);
    }
    out
}
