use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScanError;

static VIM_QUANTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\\?\{(?P<lazy>-)?(?P<min>[0-9]*)(?P<comma>,)?(?P<max>[0-9]*)\\?\}$")
        .expect("quantifier pattern must compile")
});

/// Converts Vim's brace quantifier (`\{n,m}` and friends) to native syntax.
///
/// | Vim         | Native     |
/// |-------------|------------|
/// | `\{}`       | `*`        |
/// | `\{3}`      | `{3}`      |
/// | `\{3,}`     | `{3,}`     |
/// | `\{,5}`     | `{0,5}`    |
/// | `\{2,5}`    | `{2,5}`    |
/// | `\{-2,5}`   | `{2,5}?`   |
///
/// The leading backslash and the backslash before the closing brace are
/// both optional, so the very-magic `{2,5}` form is accepted as well.
pub fn convert_quantifier(vim_quantifier: &str) -> Result<String, ScanError> {
    let Some(m) = VIM_QUANTIFIER.captures(vim_quantifier) else {
        return Err(ScanError::MalformedQuantifier {
            quantifier: vim_quantifier.to_string(),
        });
    };

    let min = m.name("min").map_or("", |g| g.as_str());
    let max = m.name("max").map_or("", |g| g.as_str());

    let mut native = if m.name("comma").is_none() {
        // Without a comma the digits, if any, are all in `min`.
        if min.is_empty() {
            "*".to_string()
        } else {
            format!("{{{min}}}")
        }
    } else {
        let min = if min.is_empty() { "0" } else { min };
        match (min.parse::<u64>(), max.parse::<u64>()) {
            // Vim accepts the bounds in either order.
            (Ok(lo), Ok(hi)) if lo > hi => format!("{{{hi},{lo}}}"),
            _ => format!("{{{min},{max}}}"),
        }
    };

    if m.name("lazy").is_some() {
        native.push('?');
    }
    Ok(native)
}
