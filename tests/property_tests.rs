use proptest::prelude::*;
use vim_regex::{ConversionOptions, VimRegexConverter};

mod support;
use support::harness::{ALL_MAGICNESS, options};

// Atoms that consume input, so any quantifier may follow them
fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]",
        Just(".".to_string()),
        Just(r"\d".to_string()),
        Just(r"\w".to_string()),
        Just(r"\_s".to_string()),
        Just(r"\S".to_string()),
        Just("[abc]".to_string()),
        Just("[^x]".to_string()),
        Just("[[:alpha:]]".to_string()),
        Just(r"\%[ab]".to_string()),
        Just(r"\%x41".to_string()),
        Just(r"\(ab\)".to_string()),
        Just(r"\%(a\|b\)".to_string()),
        Just(r"\n".to_string()),
        Just(r"\(ab\)\1".to_string()),
        Just(r"\z(a\)".to_string()),
    ]
}

// Zero-width items and anchors next to line breaks; never quantified
fn marker_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(r"\zs".to_string()),
        Just(r"\ze".to_string()),
        Just(r"\n^".to_string()),
        Just(r"$\n".to_string()),
        Just(r"\<".to_string()),
    ]
}

fn piece_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (atom_strategy(), quantifier_strategy())
            .prop_map(|(atom, quantifier)| format!("{atom}{quantifier}")),
        1 => marker_strategy(),
    ]
}

fn quantifier_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("*"),
        Just(r"\+"),
        Just(r"\="),
        Just(r"\{2,3}"),
        Just(r"\{-}"),
        Just(r"\{,4}"),
    ]
}

fn branch_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(piece_strategy(), 1..6).prop_map(|pieces| pieces.concat())
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(branch_strategy(), 1..4),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(branches, caret, dollar)| {
            let mut pattern = branches.join(r"\|");
            if caret {
                pattern.insert(0, '^');
            }
            if dollar {
                pattern.push('$');
            }
            pattern
        })
}

proptest! {
    #[test]
    fn conversion_is_deterministic(pattern in pattern_strategy()) {
        let options = ConversionOptions::default();
        let first = VimRegexConverter::convert(&pattern, &options).unwrap();
        let second = VimRegexConverter::convert(&pattern, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn generated_patterns_compile(pattern in pattern_strategy()) {
        let converter = VimRegexConverter::new(&pattern, &ConversionOptions::default()).unwrap();
        prop_assert!(
            converter.to_regex().is_ok(),
            "{} -> {}",
            pattern,
            converter.converted_regex()
        );
    }

    #[test]
    fn alphanumeric_text_is_unchanged(text in "[a-zA-Z0-9]{1,40}") {
        for magicness in ALL_MAGICNESS {
            let converted = VimRegexConverter::convert(&text, &options(magicness)).unwrap();
            prop_assert_eq!(&converted, &text);
        }
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,64}") {
        for magicness in ALL_MAGICNESS {
            let _ = VimRegexConverter::new(&input, &options(magicness));
        }
    }

    #[test]
    fn case_marker_wraps_output(pattern in pattern_strategy()) {
        let marked = format!(r"{pattern}\c");
        let converted = VimRegexConverter::convert(&marked, &ConversionOptions::default()).unwrap();
        prop_assert!(converted.starts_with("(?i:"));
        prop_assert!(converted.ends_with(')'));
    }
}
