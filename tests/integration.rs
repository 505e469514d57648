//! Integration tests for stylefold
//!
//! End-to-end `compile` properties: idempotence, declaration conservation,
//! `!important` precedence, merge positioning, at-rule consolidation, safe
//! sorting and syntax errors. `tests/fixtures/site.css` is a small but
//! realistic stylesheet exercising all of them at once.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use stylefold::parser::parse_stylesheet;
use stylefold::{
    compile, Block, CompileOptions, CompileOutput, Node, SyntaxErrorKind, WarningKind,
};

const SITE_CSS: &str = include_str!("fixtures/site.css");

fn compile_with(css: &str, options: CompileOptions) -> CompileOutput {
    compile(css, &options).unwrap()
}

fn compile_default(css: &str) -> CompileOutput {
    compile_with(css, CompileOptions::default())
}

fn all_modes() -> Vec<CompileOptions> {
    vec![
        CompileOptions::new(),
        CompileOptions::new().with_alphabetical(true),
        CompileOptions::new()
            .with_alphabetical(true)
            .with_unsafe_sort(true),
    ]
}

/// `(scope, selector, property)` for every parsed declaration.
fn declaration_set(css: &str) -> BTreeSet<(String, String, String)> {
    fn walk(nodes: &[Node], scope: &str, out: &mut BTreeSet<(String, String, String)>) {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    for selector in &rule.selectors {
                        for decl in &rule.declarations {
                            out.insert((
                                scope.to_string(),
                                selector.to_css(),
                                decl.merge_key().to_string(),
                            ));
                        }
                    }
                }
                Node::AtRule(at_rule) => {
                    if let Some(Block::Rules(inner)) = &at_rule.block {
                        let scope = format!("{} @{} {}", scope, at_rule.name, at_rule.prelude);
                        walk(inner, &scope, out);
                    }
                }
                Node::Comment(_) => {}
            }
        }
    }
    let sheet = parse_stylesheet(css).unwrap();
    let mut out = BTreeSet::new();
    walk(&sheet.nodes, "", &mut out);
    out
}

fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{}` not found in:\n{}", needle, haystack))
}

// -- Pipeline properties -------------------------------------------------------

#[test]
fn test_idempotence_on_fixture() {
    for options in all_modes() {
        let once = compile_with(SITE_CSS, options).css;
        let twice = compile_with(&once, options).css;
        assert_eq!(once, twice, "second pass changed output for {:?}", options);
    }
}

#[test]
fn test_idempotence_on_small_inputs() {
    let inputs = [
        ".b{x:1} .a{x:1} .c{y:2}",
        ".a,.b{x:1} .a{y:2} .b{x:1}",
        "@media print{.b{x:1}} .a{x:1} @media print{.a{x:1}}",
        ".a{color red;width:calc(1px + 2px;&:hover{x:1}}",
        ".z{x:1} .a:hover{x:2} .a:link{x:3} .a{x:4}",
        "@supports (display:grid){.g{display:grid}} @page :first{margin:1in}",
        ":root{--Brand:Teal;--empty:;} html{x:1}",
    ];
    for css in inputs {
        for options in all_modes() {
            let once = compile_with(css, options).css;
            let twice = compile_with(&once, options).css;
            assert_eq!(once, twice, "not idempotent for {:?} with {:?}", css, options);
        }
    }
}

#[test]
fn test_second_pass_finds_nothing_to_merge() {
    let once = compile_default(SITE_CSS).css;
    let report = compile_default(&once).report;
    assert_eq!(report.rules_merged, 0);
    assert_eq!(report.selectors_deduplicated, 0);
    assert_eq!(report.media_queries_merged, 0);
    assert_eq!(report.keyframes_removed, 0);
}

#[test]
fn test_declaration_conservation() {
    let input = declaration_set(SITE_CSS);
    for options in all_modes() {
        let output = declaration_set(&compile_with(SITE_CSS, options).css);
        assert_eq!(input, output, "declarations lost or invented with {:?}", options);
    }
}

#[test]
fn test_important_precedence() {
    let out = compile_default(".a{color:red} .a{color:blue!important} .a{color:green}");
    assert!(out.css.contains(".a {\n    color: blue !important;\n}"), "{}", out.css);
    assert!(!out.css.contains("green"));
    assert_eq!(out.report.important_kept, 1);
}

#[test]
fn test_last_wins_position() {
    let out = compile_default(".btn{x:1} .a{a:1} .b{b:1} .c{c:1} .d{d:1} .btn{y:2}");
    assert!(out.css.contains(".btn {\n    x: 1;\n    y: 2;\n}"), "{}", out.css);
    assert!(position_of(&out.css, ".d {") < position_of(&out.css, ".btn {"));
    assert_eq!(out.report.rules_merged, 1);
}

#[test]
fn test_keyframes_last_wins() {
    let out = compile_default(
        "@keyframes fadeIn{from{opacity:0}} .a{x:1} @keyframes fadeIn{to{opacity:1}}",
    );
    assert_eq!(out.css.matches("@keyframes fadeIn").count(), 1);
    assert!(out.css.contains("to {\n        opacity: 1;\n    }"));
    assert!(!out.css.contains("from"));
    assert_eq!(out.report.keyframes_removed, 1);
}

#[test]
fn test_media_consolidation() {
    let out = compile_default("@media (max-width: 768px){.a{x:1}} @media (max-width: 768px){.b{y:2}}");
    assert_eq!(
        out.css,
        "/* ===== Media Queries ===== */\n\
         @media (max-width: 768px) {\n    .a {\n        x: 1;\n    }\n\n    .b {\n        y: 2;\n    }\n}\n"
    );
    assert_eq!(out.report.media_queries_merged, 1);
}

#[test]
fn test_safe_sort_keeps_link_before_hover() {
    let css = ".a:hover{x:1} .a:link{x:2} .a:visited{x:3}";
    let ordered = ".a:link{x:2} .a:visited{x:3} .a:hover{x:1}";
    let safe = CompileOptions::new().with_alphabetical(true);

    let out = compile_with(ordered, safe).css;
    assert!(position_of(&out, ".a:link") < position_of(&out, ".a:hover"));

    // A source that already has hover first is never "fixed" by sorting either.
    let out = compile_with(css, safe).css;
    assert!(position_of(&out, ".a:hover") < position_of(&out, ".a:link"));
}

#[test]
fn test_unsafe_sort_is_pure_lexicographic() {
    let options = CompileOptions::new()
        .with_alphabetical(true)
        .with_unsafe_sort(true);
    let out = compile_with(".a:link{x:2} .a:hover{x:1}", options).css;
    assert!(position_of(&out, ".a:hover") < position_of(&out, ".a:link"));
}

#[test]
fn test_unbalanced_brace_reports_line() {
    let css = ".a { color: red; }\n\n.b {\n    color: blue;\n";
    let err = compile(css, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnterminatedBlock);
    assert_eq!(err.position.line, 3);
    assert!(err.to_string().starts_with("3:4: "), "{}", err);
}

#[test]
fn test_bad_selector_is_fatal() {
    let err = compile(".ok{x:1}\n.a[href{x:1}", &CompileOptions::default()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnbalancedSelector('['));
    assert_eq!(err.position.line, 2);
}

#[test]
fn test_empty_input() {
    let out = compile_default("");
    assert_eq!(out.css, "");
    let out = compile_default("/* only a comment */");
    assert_eq!(out.css, "");
    assert_eq!(out.report.comments_removed, 1);
}

// -- Fixture -------------------------------------------------------------------

#[test]
fn test_fixture_sections_in_order() {
    let css = compile_default(SITE_CSS).css;
    assert!(css.starts_with("/*! Site theme v2 | MIT License */\n\n/* ===== Imports ===== */\n@charset \"utf-8\";\n"));
    let headers = [
        "/* ===== Imports ===== */",
        "/* ===== Custom Properties ===== */",
        "/* ===== Reset & Base ===== */",
        "/* ===== Components ===== */",
        "/* ===== Media Queries ===== */",
        "/* ===== At-Rules ===== */",
    ];
    let positions: Vec<usize> = headers.iter().map(|h| position_of(&css, h)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", css);
}

#[test]
fn test_fixture_merges() {
    let css = compile_default(SITE_CSS).css;
    assert!(css.contains(
        ".btn {\n    display: inline-flex;\n    padding: calc(var(--gap) / 2) var(--gap);\n    border: 1px solid transparent;\n    border-radius: 6px;\n}"
    ), "{}", css);
    assert!(css.contains(".alert {\n    color: #B3261E !important;\n    padding: 8px 12px;\n}"));
    assert!(css.contains("    .nav,\n    .footer {\n        display: none;\n    }"));
    assert!(!css.contains(".empty-rule"));
}

#[test]
fn test_fixture_media_order() {
    let css = compile_default(SITE_CSS).css;
    let order = [
        "@media (min-width: 768px)",
        "@media (min-width: 1200px)",
        "@media (max-width: 768px)",
        "@media print",
    ];
    let positions: Vec<usize> = order.iter().map(|m| position_of(&css, m)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", css);
    assert_eq!(css.matches("@media (max-width: 768px)").count(), 1);
}

#[test]
fn test_fixture_report() {
    let report = compile_default(SITE_CSS).report;
    assert_eq!(report.keyframes_removed, 1);
    assert_eq!(report.media_queries_merged, 1);
    assert_eq!(report.empty_rules_removed, 1);
    assert_eq!(report.comments_removed, 2);
    assert_eq!(report.rules_merged, 3);
    assert_eq!(report.at_rules_preserved, 3);
    assert_eq!(report.warning_count(), 0);
    assert!(report.bytes_after > 0);
    assert_eq!(report.bytes_before, SITE_CSS.len());
}

#[test]
fn test_fixture_safe_sort_keeps_link_order() {
    let css = compile_with(SITE_CSS, CompileOptions::new().with_alphabetical(true)).css;
    let links = ["a:link", "a:visited", "a:hover", "a:focus", "a:active"];
    let positions: Vec<usize> = links.iter().map(|l| position_of(&css, l)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", css);
    assert!(position_of(&css, ".alert {") < position_of(&css, ".btn {"));
    assert!(position_of(&css, ".btn {") < position_of(&css, ".card {"));
}

#[test]
fn test_warnings_collected_not_fatal() {
    let out = compile_default(".a { color red; width: calc(1px; margin: 0 }");
    let kinds: Vec<WarningKind> = out.report.warnings().iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::MalformedDeclaration, WarningKind::MalformedValue]);
    assert!(out.css.contains("    color red;\n"));
    // The unclosed paren runs to the end of the block.
    assert!(out.css.contains("    width: calc(1px; margin: 0;\n"));
}
