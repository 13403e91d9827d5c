use std::sync::LazyLock;

use crate::types::Magicness;

/// Settings a Vim pattern is converted under.
///
/// The four character-class strings are bodies of bracket expressions (no
/// surrounding `[]`) and stand in for Vim's 'isident', 'iskeyword',
/// 'isfname' and 'isprint' options. Digits are left out: `\i`, `\k`, `\f`
/// and `\p` add `0-9`, while their upper-case forms do not.
///
/// The strings are not validated. A malformed body only shows up when the
/// regex engine rejects the converted pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConversionOptions {
    /// Body used for `\i` and `\I`.
    pub ident_chars: String,
    /// Body used for `\k` and `\K`.
    pub keyword_chars: String,
    /// Body used for `\f` and `\F`.
    pub file_name_chars: String,
    /// Body used for `\p` and `\P`.
    pub printable_chars: String,
    /// Magicness in effect at the start of every pattern.
    pub magicness: Magicness,
    /// Case folding, unless the pattern carries `\c` or `\C`.
    pub ignore_case: bool,
    /// Make magic `^` and `$` match around every `new_line`, not only at the
    /// ends of the input.
    pub force_multiline_mode: bool,
    /// Target-dialect pattern that matches a line break.
    pub new_line: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            ident_chars: r"A-Za-z_\xC0-\xFF".to_string(),
            keyword_chars: r"A-Za-z_\xC0-\xFF".to_string(),
            file_name_chars: r"A-Za-z/.\-_+,#$%~=".to_string(),
            printable_chars: r"\x20-\x7E\xA1-\xFF".to_string(),
            magicness: Magicness::Magic,
            ignore_case: false,
            force_multiline_mode: false,
            new_line: r"\n".to_string(),
        }
    }
}

static DEFAULT_MULTILINE: LazyLock<ConversionOptions> =
    LazyLock::new(|| ConversionOptions::builder().force_multiline_mode(true).build());

static CASE_INSENSITIVE_MULTILINE: LazyLock<ConversionOptions> = LazyLock::new(|| {
    ConversionOptions::builder()
        .force_multiline_mode(true)
        .ignore_case(true)
        .build()
});

impl ConversionOptions {
    pub fn builder() -> ConversionOptionsBuilder {
        ConversionOptionsBuilder::default()
    }

    /// Vim defaults with `^`/`$` matching at every line break.
    ///
    /// Shared by every caller; build a fresh value instead of cloning and
    /// mutating this one when something else is needed.
    pub fn default_multiline() -> &'static ConversionOptions {
        &DEFAULT_MULTILINE
    }

    /// Like [`ConversionOptions::default_multiline`] but folding case.
    pub fn case_insensitive_multiline() -> &'static ConversionOptions {
        &CASE_INSENSITIVE_MULTILINE
    }
}

/// Fluent construction of [`ConversionOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConversionOptionsBuilder {
    options: ConversionOptions,
}

impl ConversionOptionsBuilder {
    pub fn ident_chars(mut self, chars: impl Into<String>) -> Self {
        self.options.ident_chars = chars.into();
        self
    }

    pub fn keyword_chars(mut self, chars: impl Into<String>) -> Self {
        self.options.keyword_chars = chars.into();
        self
    }

    pub fn file_name_chars(mut self, chars: impl Into<String>) -> Self {
        self.options.file_name_chars = chars.into();
        self
    }

    pub fn printable_chars(mut self, chars: impl Into<String>) -> Self {
        self.options.printable_chars = chars.into();
        self
    }

    pub fn magicness(mut self, magicness: Magicness) -> Self {
        self.options.magicness = magicness;
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.options.ignore_case = ignore_case;
        self
    }

    pub fn force_multiline_mode(mut self, force: bool) -> Self {
        self.options.force_multiline_mode = force;
        self
    }

    pub fn new_line(mut self, new_line: impl Into<String>) -> Self {
        self.options.new_line = new_line.into();
        self
    }

    pub fn build(self) -> ConversionOptions {
        self.options
    }
}
