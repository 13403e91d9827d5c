pub mod classes;
pub mod converter;
pub mod error;
pub mod options;
pub mod quantifier;
pub mod types;
pub mod unit;

mod lexer;
mod parser;

pub use crate::converter::{ConversionMetadata, VimRegexConverter};
pub use crate::error::{ConversionError, ParseError, ScanError, TranslationCause};
pub use crate::options::{ConversionOptions, ConversionOptionsBuilder};
pub use crate::quantifier::convert_quantifier;
pub use crate::types::{LexState, LexStates, Magicness, Token, TokenKind};
pub use crate::unit::RegexUnit;
