/// How many characters of a Vim pattern are "special".
///
/// Vim can switch between these levels in the middle of a pattern with
/// `\v`, `\m`, `\M` and `\V`. The same raw character (`.`, `*`, `(`) is a
/// metacharacter at one level and a literal at another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magicness {
    /// `\v` - every ASCII character except `0-9a-zA-Z_` is special.
    VeryMagic,
    /// `\m` - Vim's default ('magic' set).
    #[default]
    Magic,
    /// `\M` - 'nomagic': only `$`, `^` and escaped forms are special.
    NonMagic,
    /// `\V` - only the backslash has special meaning.
    VeryNonMagic,
}

impl Magicness {
    /// True for the two levels where the escaped form is the metacharacter.
    pub fn is_nomagic(self) -> bool {
        matches!(self, Magicness::NonMagic | Magicness::VeryNonMagic)
    }
}

/// Nesting context of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Top level of the pattern.
    Initial,
    /// Inside `[...]`.
    Collection,
    /// Inside `\%[...]`.
    OptionalMatch,
}

impl LexState {
    /// The single-bit set for this state.
    pub fn flag(self) -> LexStates {
        match self {
            LexState::Initial => LexStates::INITIAL,
            LexState::Collection => LexStates::COLLECTION,
            LexState::OptionalMatch => LexStates::OPTIONAL_MATCH,
        }
    }

    /// Inclusive states also run every rule of the initial state.
    ///
    /// A collection has its own escaping rules, so it is exclusive; an
    /// optional-match sequence holds ordinary atoms.
    pub fn is_inclusive(self) -> bool {
        matches!(self, LexState::OptionalMatch)
    }
}

bitflags::bitflags! {
    /// Set of lexer states in which a scanner rule is active.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LexStates: u8 {
        const INITIAL        = 0b001;
        const COLLECTION     = 0b010;
        const OPTIONAL_MATCH = 0b100;
        const ALL = Self::INITIAL.bits() | Self::COLLECTION.bits() | Self::OPTIONAL_MATCH.bits();
    }
}

/// Token classes produced by the scanner and consumed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal,
    Dollar,
    Caret,
    And,
    Or,
    StartGroup,
    EndGroup,
    StartCollection,
    EndCollection,
    StartOptionalMatch,
    EndOptionalMatch,
    Quantifier,
    ZeroWidth,
    Eof,
}

/// A scanned piece of the Vim pattern together with its translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the parser sees.
    pub kind: TokenKind,
    /// Translated text in the target dialect.
    pub text: String,
    /// The Vim source text that produced this token.
    pub raw: String,
    /// Byte offset of `raw` within the Vim pattern.
    pub position: usize,
    /// Magicness that was active when the token was scanned.
    pub magicness: Magicness,
}

impl Token {
    pub(crate) fn eof(position: usize, magicness: Magicness) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            raw: String::new(),
            position,
            magicness,
        }
    }

    /// Vim treats `\n` as a line break; `^` and `$` next to one are anchors.
    pub(crate) fn is_newline(&self) -> bool {
        self.raw == "\\n" || self.raw == "\n"
    }
}
