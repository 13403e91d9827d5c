use crate::error::{ConversionError, TranslationCause};
use crate::lexer::{Lexer, TranslationState};
use crate::options::ConversionOptions;
use crate::parser::Parser;
use crate::types::Magicness;

/// Facts about a pattern gathered while it was converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionMetadata {
    /// Number of `\z(...)` groups.
    pub external_groups: u32,
    /// Highest `\z1`..`\z9` the pattern refers to, or 0.
    pub last_external_match: u32,
    pub has_match_start_group: bool,
    pub has_match_end_group: bool,
    pub has_back_reference: bool,
    /// A magic `$` ends one of the top-level branches.
    pub matches_magic_dollar: bool,
}

/// A Vim pattern converted to the syntax of [`fancy_regex`].
///
/// Conversion happens in [`VimRegexConverter::new`]; the value is read-only
/// afterwards.
///
/// ```
/// use vim_regex::{ConversionOptions, VimRegexConverter};
///
/// let converter = VimRegexConverter::new(r"\<fu\%[nction]\>", &ConversionOptions::default())?;
/// let regex = converter.to_regex()?;
/// assert!(regex.is_match("fun")?);
/// assert!(regex.is_match("function")?);
/// assert!(!regex.is_match("funk")?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct VimRegexConverter {
    converted: String,
    ignore_case: bool,
    magicness: Magicness,
    ident_chars: String,
    keyword_chars: String,
    new_line: String,
    metadata: ConversionMetadata,
}

impl VimRegexConverter {
    pub fn new(pattern: &str, options: &ConversionOptions) -> Result<Self, ConversionError> {
        let mut converter = Self {
            converted: String::new(),
            ignore_case: options.ignore_case,
            magicness: options.magicness,
            ident_chars: options.ident_chars.clone(),
            keyword_chars: options.keyword_chars.clone(),
            new_line: options.new_line.clone(),
            metadata: ConversionMetadata::default(),
        };
        if pattern.is_empty() {
            return Ok(converter);
        }

        converter.ignore_case = case_marker(pattern).unwrap_or(options.ignore_case);
        let mut translation = translate(pattern, options, converter.ignore_case, false)?;
        let metadata = translation.metadata;
        // the target engine refuses numbered back-references next to named groups
        if metadata.has_back_reference
            && (metadata.external_groups > 0
                || metadata.has_match_start_group
                || metadata.has_match_end_group)
        {
            translation = translate(pattern, options, converter.ignore_case, true)?;
        }
        converter.magicness = translation.magicness;
        converter.metadata = translation.metadata;

        converter.converted = if converter.ignore_case {
            format!("(?i:{})", translation.body)
        } else {
            translation.body
        };

        tracing::debug!(
            pattern,
            converted = %converter.converted,
            ignore_case = converter.ignore_case,
            metadata = ?converter.metadata,
            "converted vim pattern"
        );
        Ok(converter)
    }

    /// Converts `pattern` and returns only the resulting text.
    pub fn convert(pattern: &str, options: &ConversionOptions) -> Result<String, ConversionError> {
        Self::new(pattern, options).map(|converter| converter.converted)
    }

    pub fn converted_regex(&self) -> &str {
        &self.converted
    }

    /// Compiles the converted text.
    pub fn to_regex(&self) -> Result<fancy_regex::Regex, ConversionError> {
        fancy_regex::Regex::new(&self.converted).map_err(|source| {
            tracing::debug!(converted = %self.converted, %source, "regex engine rejected pattern");
            ConversionError::Compile {
                converted: self.converted.clone(),
                source: Box::new(source),
            }
        })
    }

    pub fn metadata(&self) -> ConversionMetadata {
        self.metadata
    }

    /// Whether the output is wrapped in `(?i:...)`.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Magicness in effect at the end of the pattern.
    pub fn magicness(&self) -> Magicness {
        self.magicness
    }

    pub fn ident_chars(&self) -> &str {
        &self.ident_chars
    }

    pub fn keyword_chars(&self) -> &str {
        &self.keyword_chars
    }

    pub fn new_line(&self) -> &str {
        &self.new_line
    }

    pub fn external_groups(&self) -> u32 {
        self.metadata.external_groups
    }

    pub fn last_external_match(&self) -> u32 {
        self.metadata.last_external_match
    }

    pub fn has_match_start_group(&self) -> bool {
        self.metadata.has_match_start_group
    }

    pub fn has_match_end_group(&self) -> bool {
        self.metadata.has_match_end_group
    }

    pub fn has_back_reference(&self) -> bool {
        self.metadata.has_back_reference
    }

    pub fn matches_magic_dollar(&self) -> bool {
        self.metadata.matches_magic_dollar
    }
}

struct Translation {
    body: String,
    magicness: Magicness,
    metadata: ConversionMetadata,
}

/// One lexer and parser run. With `name_groups` set, plain groups are named
/// and back-references refer to them by name.
fn translate(
    pattern: &str,
    options: &ConversionOptions,
    ignore_case: bool,
    name_groups: bool,
) -> Result<Translation, ConversionError> {
    let mut state = TranslationState::new(options, ignore_case);
    state.name_groups = name_groups;
    let mut parser = Parser::new(Lexer::new(pattern, state));

    let root = match parser.parse() {
        Ok(root) => root,
        Err(cause) => return Err(translation_error(pattern, parser.lexer().partial(), cause)),
    };

    let matches_magic_dollar = parser.matches_magic_dollar();
    let state = parser.into_lexer().into_state();
    Ok(Translation {
        body: root.render(),
        magicness: state.magicness,
        metadata: ConversionMetadata {
            external_groups: state.external_groups,
            last_external_match: state.last_external_match,
            has_match_start_group: state.has_match_start_group,
            has_match_end_group: state.has_match_end_group,
            has_back_reference: state.has_back_reference,
            matches_magic_dollar,
        },
    })
}

/// First unescaped `\c` (ignore case) or `\C` (match case) in the pattern.
fn case_marker(pattern: &str) -> Option<bool> {
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            continue;
        }
        match chars.next() {
            Some('c') => return Some(true),
            Some('C') => return Some(false),
            _ => {}
        }
    }
    None
}

fn translation_error(pattern: &str, partial: &str, cause: TranslationCause) -> ConversionError {
    tracing::debug!(pattern, partial, %cause, "vim pattern conversion failed");
    ConversionError::Translation {
        pattern: pattern.to_string(),
        partial: (!partial.is_empty()).then(|| partial.to_string()),
        cause,
    }
}
