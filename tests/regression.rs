//! Regression tests for cascade safety
//!
//! Each test pins down one way a merge or reorder could silently change
//! which declaration wins in a browser.

#![allow(clippy::unwrap_used)]

use stylefold::{compile, CompileOptions, CompileOutput};

fn run(css: &str) -> CompileOutput {
    compile(css, &CompileOptions::default()).unwrap()
}

fn run_sorted(css: &str) -> CompileOutput {
    compile(css, &CompileOptions::new().with_alphabetical(true)).unwrap()
}

// -- Scopes --------------------------------------------------------------------

#[test]
fn important_is_not_downgraded_by_media_rule() {
    let css = run(".a { color: red !important; } @media print { .a { color: blue; } }").css;
    assert!(css.contains(".a {\n    color: red !important;\n}"), "{}", css);
    assert!(css.contains("@media print {\n    .a {\n        color: blue;\n    }\n}"));
}

#[test]
fn rules_never_merge_across_scopes() {
    let css = run(".a { x: 1; } @media print { .a { y: 2; } } .a { z: 3; }").css;
    assert!(css.contains(".a {\n    x: 1;\n    z: 3;\n}"), "{}", css);
    assert!(css.contains("    .a {\n        y: 2;\n    }"));
    assert_eq!(css.matches("y: 2").count(), 1);
}

#[test]
fn different_media_conditions_stay_apart() {
    let out = run("@media (max-width: 600px) { .a { x: 1; } } @media (max-width: 601px) { .a { x: 2; } }");
    assert_eq!(out.report.media_queries_merged, 0);
    assert_eq!(out.css.matches("@media").count(), 2);
}

#[test]
fn media_conditions_merge_regardless_of_spacing_and_case() {
    let out = run("@media SCREEN and (min-width:500px) { .a { x: 1; } } @media screen and ( min-width: 500px ) { .b { y: 1; } }");
    assert_eq!(out.report.media_queries_merged, 1);
    assert!(out.css.contains("@media screen and (min-width: 500px) {"), "{}", out.css);
}

#[test]
fn vendor_keyframes_are_distinct() {
    let out = run("@-webkit-keyframes spin { to { x: 1; } } @keyframes spin { to { x: 1; } }");
    assert_eq!(out.report.keyframes_removed, 0);
    assert!(out.css.contains("@-webkit-keyframes spin {"));
    assert!(out.css.contains("@keyframes spin {"));
}

#[test]
fn keyframes_inside_media_are_scoped() {
    let out = run("@keyframes a { to { x: 1; } } @media print { @keyframes a { to { x: 2; } } }");
    assert_eq!(out.report.keyframes_removed, 0);
    assert!(out.css.contains("x: 1;"));
    assert!(out.css.contains("x: 2;"));
}

// -- Values --------------------------------------------------------------------

#[test]
fn value_case_is_preserved() {
    let css = run(".a { color: #FFaa00; font-family: \"Open Sans\", Arial; }").css;
    assert!(css.contains("color: #FFaa00;"));
    assert!(css.contains("font-family: \"Open Sans\", Arial;"));
}

#[test]
fn nested_calc_and_var_round_trip() {
    let value = "calc(100% - var(--gap, calc(2 * 4px)))";
    let css = run(&format!(".a {{ width: {}; }}", value)).css;
    assert!(css.contains(&format!("width: {};", value)), "{}", css);
}

#[test]
fn custom_property_names_keep_case() {
    let css = run(":root { --Brand-Color: Teal; --brand-color: red; }").css;
    assert!(css.contains("--Brand-Color: Teal;"));
    assert!(css.contains("--brand-color: red;"));
}

#[test]
fn property_names_are_lowercased_and_merged() {
    let out = run(".a { COLOR: red; } .a { color: blue; }");
    assert!(out.css.contains(".a {\n    color: blue;\n}"), "{}", out.css);
    assert_eq!(out.report.declarations_overridden, 1);
}

#[test]
fn verbatim_declarations_survive_merge_and_recompile() {
    let once = run(".a { color red; } .a { margin: 0; &:hover { x: 1 } }").css;
    assert!(once.contains("    color red;\n"), "{}", once);
    assert!(once.contains("    &:hover { x: 1 }\n"));
    assert!(once.contains("    margin: 0;\n"));
    assert_eq!(run(&once).css, once);
}

#[test]
fn important_plain_pair_in_one_rule() {
    let css = run(".a { color: red !important; color: blue; }").css;
    assert!(css.contains("color: red !important;"));
    assert!(!css.contains("blue"));
}

// -- At-rules ------------------------------------------------------------------

#[test]
fn unknown_at_rules_pass_through() {
    let out = run("@page :first { margin: 1in; } @font-feature-values Font One { @styleset { nice: 12; } }");
    assert!(out.css.contains("@page :first {\n    margin: 1in;\n}"), "{}", out.css);
    assert!(out.css.contains("@font-feature-values Font One {"));
    assert_eq!(out.report.at_rules_preserved, 2);
}

#[test]
fn statement_at_rules_lead_the_output() {
    let css = run(".a { x: 1; } @import url(b.css); @charset \"utf-8\";").css;
    let charset = css.find("@charset").unwrap();
    let import = css.find("@import").unwrap();
    let rule = css.find(".a {").unwrap();
    assert!(charset < import && import < rule, "{}", css);
}

#[test]
fn license_comment_is_kept() {
    let out = run("/*! keep me */ /* drop me */ .a { x: 1; }");
    assert!(out.css.starts_with("/*! keep me */\n"));
    assert!(!out.css.contains("drop me"));
    assert_eq!(out.report.comments_removed, 1);
}

// -- Sorting -------------------------------------------------------------------

#[test]
fn sorting_does_not_reorder_link_states() {
    let css = run_sorted(".a:active { x: 5; } .b { y: 1; } .a:link { x: 1; }").css;
    assert!(css.find(".a:active").unwrap() < css.find(".a:link").unwrap(), "{}", css);
}

#[test]
fn sorting_inside_media_keeps_link_states() {
    let css = run_sorted("@media print { .z { x: 0; } .a:hover { x: 2; } .a:link { x: 1; } }").css;
    assert!(css.find(".a:hover").unwrap() < css.find(".a:link").unwrap(), "{}", css);
    assert!(css.find(".a:link").unwrap() < css.find(".z").unwrap());
}

#[test]
fn sorting_is_stable_across_runs() {
    let input = ".c { x: 1; } .b { x: 1; } .a:hover { y: 1; } .a { z: 1; }";
    let once = run_sorted(input).css;
    assert_eq!(run_sorted(&once).css, once);
}

#[test]
fn sorting_checks_every_selector_of_a_comma_list() {
    let css = run_sorted(".a:link { x: 1; } .b:link { x: 2; } .b:hover, .a:hover { x: 3; }").css;
    let link_b = css.find(".b:link").unwrap();
    let hover_b = css.find(".b:hover").unwrap();
    assert!(link_b < hover_b, "{}", css);
    assert!(css.find(".a:link").unwrap() < hover_b, "{}", css);
}

#[test]
fn unordered_media_keep_first_appearance() {
    let css = run(
        "@media (prefers-color-scheme: dark) { .a { x: 1; } }\n\
         @media (hover: hover) { .b { x: 1; } }\n\
         @media (prefers-color-scheme: dark) { .c { x: 1; } }",
    )
    .css;
    let dark = css.find("@media (prefers-color-scheme: dark)").unwrap();
    let hover = css.find("@media (hover: hover)").unwrap();
    assert!(dark < hover, "{}", css);
}

// -- Awkward input -------------------------------------------------------------

#[test]
fn semicolon_inside_unquoted_url_stays_in_the_value() {
    let out = run(".a { background: url(data:image/png;base64,AAAA) no-repeat; color: red; }");
    assert!(
        out.css.contains("    background: url(data:image/png;base64,AAAA) no-repeat;\n"),
        "{}",
        out.css
    );
    assert!(out.report.warnings().is_empty());
    assert_eq!(run(&out.css).css, out.css);
}

#[test]
fn non_ascii_at_keyword_passes_through() {
    let out = run("@über { a: b; }\n.a { x: 1; }");
    assert!(out.css.contains("@über"), "{}", out.css);
    assert!(out.css.contains(".a {"));
}

#[test]
fn quoted_keyframes_name_keeps_its_quotes() {
    let out = run("@keyframes \"foo bar\" { to { opacity: 1; } }\n.a { animation-name: \"foo bar\"; }");
    assert!(out.css.contains("@keyframes \"foo bar\""), "{}", out.css);
    assert_eq!(run(&out.css).css, out.css);
}
