//! Character classes: Vim's `\s`, `\d`, `\i`, ... and the `[:name:]` items
//! allowed inside collections.

use std::borrow::Cow;

use crate::error::ScanError;
use crate::options::ConversionOptions;

/// Converts `\x` (or `\_x` when `include_newline` is set) where `x` is one of
/// `iIkKfFpPsSdDxXoOwWhHaAlLuU`.
///
/// Upper-case forms of the plain classes are complements that still refuse
/// to match a line break, as in Vim. Upper-case forms of `\i`, `\k`, `\f` and
/// `\p` mean "the same class without digits".
pub fn character_class(
    class: char,
    include_newline: bool,
    options: &ConversionOptions,
) -> Result<String, ScanError> {
    let (body, fancy): (Cow<'_, str>, bool) = match class.to_ascii_lowercase() {
        's' => (r" \t".into(), false),
        'd' => ("0-9".into(), false),
        'x' => ("0-9A-Fa-f".into(), false),
        'o' => ("0-7".into(), false),
        'w' => ("0-9A-Za-z_".into(), false),
        'h' => ("A-Za-z_".into(), false),
        'a' => ("A-Za-z".into(), false),
        'l' => ("a-z".into(), false),
        'u' => ("A-Z".into(), false),
        'i' | 'k' | 'f' | 'p' => (fancy_class(class, options).into(), true),
        _ => return Err(ScanError::UnknownCharacterClass { class }),
    };

    let body = if class.is_ascii_uppercase() && !fancy {
        format!(r"^\r\n{body}")
    } else {
        body.into_owned()
    };

    if include_newline {
        Ok(format!("(?:[{body}]|{})", options.new_line))
    } else {
        Ok(format!("[{body}]"))
    }
}

fn fancy_class(class: char, options: &ConversionOptions) -> String {
    let base = match class.to_ascii_lowercase() {
        'i' => &options.ident_chars,
        'k' => &options.keyword_chars,
        'f' => &options.file_name_chars,
        _ => &options.printable_chars,
    };
    if class.is_ascii_lowercase() {
        format!("{base}0-9")
    } else {
        base.clone()
    }
}

/// Body for a `[:name:]` item inside a collection, or `None` if Vim does not
/// know the name.
pub fn collection_class(
    name: &str,
    ignore_case: bool,
    options: &ConversionOptions,
) -> Option<String> {
    let body = match name {
        "alnum" => "0-9A-Za-z",
        "alpha" => "A-Za-z",
        "blank" => r" \t",
        "cntrl" => r"\x7F\x00-\x1F\x80-\x9F",
        "digit" => "0-9",
        "graph" => r"\x21-\x7E\x80-\xFF",
        "lower" if ignore_case => "A-Za-z",
        "lower" => "a-z",
        "print" => r"\x20-\x7E\x80-\xFF",
        "punct" => r"!-/:-@\[-`{-~",
        "space" => r" \t\n\x0B\x0C\r",
        "upper" if ignore_case => "A-Za-z",
        "upper" => "A-Z",
        "xdigit" => "0-9A-Fa-f",
        "return" => r"\r",
        "tab" => r"\t",
        "escape" => r"\x1B",
        "backspace" => r"\x08",
        "ident" => return Some(format!("{}0-9", options.ident_chars)),
        "keyword" => return Some(format!("{}0-9", options.keyword_chars)),
        "fname" => return Some(format!("{}0-9", options.file_name_chars)),
        _ => return None,
    };
    Some(body.to_string())
}

/// Opening text for a collection.
///
/// `[^...]` in Vim never matches a line break, while the target engine's
/// negated classes do, so `\r\n` joins the excluded set. `\_[...]` matches a
/// line break as well; the caller must close the extra group on `]`.
pub fn collection_start(
    negated: bool,
    leading_bracket: bool,
    include_newline: bool,
    new_line: &str,
) -> String {
    let mut start = String::from(if negated { "[^" } else { "[" });
    if leading_bracket {
        start.push_str(r"\]");
    }
    if negated {
        start.push_str(r"\r\n");
    }
    if include_newline {
        format!("(?:{new_line}|{start}")
    } else {
        start
    }
}

/// End text matching [`collection_start`].
pub fn collection_end(include_newline: bool) -> &'static str {
    if include_newline { "])" } else { "]" }
}
