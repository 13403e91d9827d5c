use fancy_regex::Regex;
use vim_regex::{ConversionOptions, Magicness, VimRegexConverter};

pub const ALL_MAGICNESS: [Magicness; 4] = [
    Magicness::VeryMagic,
    Magicness::Magic,
    Magicness::NonMagic,
    Magicness::VeryNonMagic,
];

pub fn options(magicness: Magicness) -> ConversionOptions {
    ConversionOptions::builder().magicness(magicness).build()
}

/// Converts with default options, panicking on failure.
pub fn convert(pattern: &str) -> String {
    convert_with(pattern, &ConversionOptions::default())
}

pub fn convert_with(pattern: &str, options: &ConversionOptions) -> String {
    match VimRegexConverter::convert(pattern, options) {
        Ok(converted) => converted,
        Err(err) => panic!("converting {pattern:?} failed: {err:?}"),
    }
}

/// Converts and compiles with default options.
pub fn compile(pattern: &str) -> Regex {
    compile_with(pattern, &ConversionOptions::default())
}

pub fn compile_with(pattern: &str, options: &ConversionOptions) -> Regex {
    let converter = VimRegexConverter::new(pattern, options).unwrap();
    match converter.to_regex() {
        Ok(regex) => regex,
        Err(err) => panic!(
            "{pattern:?} converted to {:?} which does not compile: {err}",
            converter.converted_regex()
        ),
    }
}

pub fn is_match(regex: &Regex, text: &str) -> bool {
    regex.is_match(text).unwrap()
}

/// Splits `(?:a|b|c)` into its branches.
pub fn branches(group: &str) -> Vec<&str> {
    let inner = group
        .strip_prefix("(?:")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_else(|| panic!("{group:?} is not a non-capturing group"));
    inner.split('|').collect()
}
