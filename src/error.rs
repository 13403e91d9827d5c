use thiserror::Error;

use crate::types::LexState;

/// The scanner could not turn the pattern into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no rule matches at byte {position} (column {column}): '{rest}'")]
    NoRuleMatches {
        position: usize,
        /// Column in grapheme clusters, counted from 1.
        column: usize,
        rest: String,
    },

    #[error("pattern ends inside {state:?} opened at byte {position}")]
    Unterminated { state: LexState, position: usize },

    #[error("unknown collection class '[:{name}:]' at byte {position}")]
    UnknownCollectionClass { name: String, position: usize },

    #[error("unknown character class '\\{class}'")]
    UnknownCharacterClass { class: char },

    #[error("'{escape}' at byte {position} is not a valid character")]
    InvalidCodePoint { escape: String, position: usize },

    /// The scanner produced a quantifier its own converter cannot read.
    #[error("malformed quantifier '{quantifier}'")]
    MalformedQuantifier { quantifier: String },
}

/// The token stream does not form a valid pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("group opened at byte {position} is never closed")]
    UnclosedGroup { position: usize },

    #[error("group close at byte {position} has no matching open")]
    UnexpectedGroupEnd { position: usize },

    #[error("'{token}' at byte {position} has nothing to apply to")]
    MissingOperand { token: String, position: usize },

    #[error("quantifier '{token}' at byte {position} follows another quantifier")]
    NestedQuantifier { token: String, position: usize },

    #[error("empty optional sequence at byte {position}")]
    EmptyOptionalMatch { position: usize },

    #[error("unexpected '{token}' at byte {position}")]
    UnexpectedToken { token: String, position: usize },
}

/// Whichever pipeline stage failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationCause {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The single error type callers see.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("error converting vim regex '{pattern}'")]
    Translation {
        pattern: String,
        /// Output produced before the failure, if any.
        partial: Option<String>,
        #[source]
        cause: TranslationCause,
    },

    #[error("converted regex '{converted}' is rejected by the regex engine")]
    Compile {
        converted: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

impl ConversionError {
    /// The failing stage, for translation errors.
    pub fn cause(&self) -> Option<&TranslationCause> {
        match self {
            ConversionError::Translation { cause, .. } => Some(cause),
            ConversionError::Compile { .. } => None,
        }
    }
}
