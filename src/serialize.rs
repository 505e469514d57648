//! Render organized sections back to CSS text.
//!
//! Output format: one header comment per section, one declaration per line
//! indented by four spaces per level, selector lists one selector per line,
//! and a blank line between sibling blocks.

extern crate alloc;

use alloc::string::String;

use crate::organize::Section;
use crate::stylesheet::{AtRule, Block, Declaration, Keyframe, Node, Rule};

const INDENT: &str = "    ";

/// Render sections to text. Empty input renders to an empty string.
pub fn serialize(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        if !out.is_empty() {
            out.push('\n');
        }
        if let Some(title) = section.label.title() {
            out.push_str("/* ===== ");
            out.push_str(title);
            out.push_str(" ===== */\n");
        }
        write_nodes(&mut out, &section.nodes, 0);
    }
    out
}

/// Render a node list at the given nesting depth.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for (idx, node) in nodes.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        match node {
            Node::Rule(rule) => write_rule(out, rule, depth),
            Node::AtRule(at_rule) => write_at_rule(out, at_rule, depth),
            Node::Comment(comment) => {
                indent(out, depth);
                out.push_str("/*");
                out.push_str(&comment.text);
                out.push_str("*/\n");
            }
        }
    }
}

fn write_rule(out: &mut String, rule: &Rule, depth: usize) {
    for (idx, selector) in rule.selectors.iter().enumerate() {
        if idx > 0 {
            out.push_str(",\n");
        }
        indent(out, depth);
        out.push_str(&selector.to_css());
    }
    out.push_str(" {\n");
    write_declarations(out, &rule.declarations, depth + 1);
    indent(out, depth);
    out.push_str("}\n");
}

fn write_at_rule(out: &mut String, at_rule: &AtRule, depth: usize) {
    indent(out, depth);
    out.push('@');
    out.push_str(&at_rule.name);
    if !at_rule.prelude.is_empty() {
        out.push(' ');
        out.push_str(&at_rule.prelude);
    }

    let Some(block) = &at_rule.block else {
        out.push_str(";\n");
        return;
    };
    out.push_str(" {\n");
    match block {
        Block::Rules(nodes) => write_nodes(out, nodes, depth + 1),
        Block::Keyframes(frames) => {
            for frame in frames {
                write_keyframe(out, frame, depth + 1);
            }
        }
        Block::Declarations(declarations) => write_declarations(out, declarations, depth + 1),
    }
    indent(out, depth);
    out.push_str("}\n");
}

fn write_keyframe(out: &mut String, frame: &Keyframe, depth: usize) {
    indent(out, depth);
    out.push_str(&frame.selectors.join(", "));
    out.push_str(" {\n");
    write_declarations(out, &frame.declarations, depth + 1);
    indent(out, depth);
    out.push_str("}\n");
}

fn write_declarations(out: &mut String, declarations: &[Declaration], depth: usize) {
    for declaration in declarations {
        indent(out, depth);
        write_declaration(out, declaration);
        out.push('\n');
    }
}

fn write_declaration(out: &mut String, declaration: &Declaration) {
    if let Some(text) = &declaration.verbatim {
        out.push_str(text);
        if !text.ends_with(|c: char| c == '}' || c == ';') {
            out.push(';');
        }
        return;
    }
    out.push_str(&declaration.property);
    out.push(':');
    if !declaration.value.is_empty() {
        out.push(' ');
        out.push_str(&declaration.value_text());
    }
    if declaration.important {
        out.push_str(" !important");
    }
    out.push(';');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
