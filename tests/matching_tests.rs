//! Converted patterns compiled with fancy-regex must match what Vim matches.

use pretty_assertions::assert_eq;
use vim_regex::ConversionOptions;

mod support;
use support::harness::{compile, compile_with, is_match};

#[test]
fn negated_collection_never_matches_line_break() {
    let regex = compile("[^abc]");
    assert!(is_match(&regex, "d"));
    assert!(!is_match(&regex, "\n"));
    assert!(!is_match(&regex, "\r"));
    assert!(!is_match(&regex, "abc"));
}

#[test]
fn collection_with_line_break() {
    let regex = compile(r"^\_[^a]$");
    assert!(is_match(&regex, "\n"));
    assert!(is_match(&regex, "b"));
    assert!(!is_match(&regex, "a"));
}

#[test]
fn optional_sequence() {
    let regex = compile(r"^fu\%[nction]$");
    for text in ["fu", "fun", "func", "function"] {
        assert!(is_match(&regex, text), "{text}");
    }
    for text in ["f", "funt", "functions"] {
        assert!(!is_match(&regex, text), "{text}");
    }
}

#[test]
fn logical_and_requires_every_operand() {
    let regex = compile(r".*bar\&.*foo");
    assert!(is_match(&regex, "foobar"));
    assert!(is_match(&regex, "barfoo"));
    assert!(!is_match(&regex, "foo"));
    assert!(!is_match(&regex, "bar"));
}

#[test]
fn back_reference() {
    let regex = compile(r"\(a\+\)b\1");
    assert!(is_match(&regex, "aabaa"));
    assert!(!is_match(&regex, "abc"));
}

#[test]
fn back_reference_with_named_groups() {
    let regex = compile(r"foo\zs\(bar\)\1");
    assert!(is_match(&regex, "foobarbar"));
    assert!(!is_match(&regex, "foobar"));

    let regex = compile(r"\z(a\)\(b\)\1");
    assert!(is_match(&regex, "abb"));
    assert!(!is_match(&regex, "aba"));
}

#[test]
fn anchors_around_line_breaks() {
    assert!(is_match(&compile(r"foo$\nbar"), "foo\nbar"));
    assert!(is_match(&compile(r"foo\n^bar"), "foo\nbar"));
    assert!(!is_match(&compile(r"foo$\nbar"), "foobar"));
}

#[test]
fn star_after_leading_caret() {
    let regex = compile("^*a");
    assert!(is_match(&regex, "*a"));
    assert!(!is_match(&regex, "a"));
    assert!(!is_match(&regex, "aaa"));
}

#[test]
fn double_dash_range_in_collection() {
    let regex = compile("^[+--]$");
    assert!(is_match(&regex, ","));
    assert!(is_match(&regex, "+"));
    assert!(is_match(&regex, "-"));
    assert!(!is_match(&regex, "a"));
}

#[test]
fn case_folding() {
    let regex = compile(r"\cFOO");
    assert!(is_match(&regex, "foo"));

    let folding = ConversionOptions::builder().ignore_case(true).build();
    let regex = compile_with(r"\CFOO", &folding);
    assert!(!is_match(&regex, "foo"));
    assert!(is_match(&regex, "FOO"));
}

#[test]
fn word_boundaries() {
    let regex = compile(r"\<foo\>");
    assert!(is_match(&regex, "a foo b"));
    assert!(!is_match(&regex, "food"));
    assert!(!is_match(&regex, "afoo"));
}

#[test]
fn match_start_marker_is_a_named_group() {
    let regex = compile(r"foo\zsbar");
    let caps = regex.captures("xfoobar").unwrap().unwrap();
    assert_eq!(caps.name("zs").map(|m| m.start()), Some(4));
}

#[test]
fn lazy_quantifier() {
    let regex = compile(r"a.\{-}b");
    let found = regex.find("axbxb").unwrap().unwrap();
    assert_eq!(found.as_str(), "axb");
}

#[test]
fn multiline_anchors() {
    let text = "foo\nbar\nbaz";
    assert!(!is_match(&compile("^bar$"), text));
    let regex = compile_with("^bar$", ConversionOptions::default_multiline());
    assert!(is_match(&regex, text));
}

#[test]
fn lookbehind_with_group() {
    let regex = compile(r"\(foo\)\@<=bar");
    assert!(is_match(&regex, "foobar"));
    assert!(!is_match(&regex, "fobar"));
}

#[test]
fn nomagic_dot_is_literal() {
    let regex = compile(r"\Va.b");
    assert!(is_match(&regex, "a.b"));
    assert!(!is_match(&regex, "axb"));
}

#[test]
fn collection_classes() {
    let regex = compile(r"^[[:upper:][:digit:]]\+$");
    assert!(is_match(&regex, "AB12"));
    assert!(!is_match(&regex, "ab"));
}
