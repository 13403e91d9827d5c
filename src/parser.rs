//! Recursive-descent parser over the scanner's tokens.
//!
//! ```text
//! pattern    := branch (OR branch)*
//! branch     := concat (AND concat)*
//! concat     := piece*
//! piece      := atom QUANTIFIER? ZEROWIDTH*
//! atom       := LITERAL | CARET | DOLLAR
//!             | STARTGROUP pattern ENDGROUP
//!             | STARTCOLLECTION LITERAL* ENDCOLLECTION
//!             | STARTOPTIONALMATCH piece+ ENDOPTIONALMATCH
//! ```
//!
//! Tokens are pulled from the lexer one at a time with a single token of
//! lookahead.

use crate::error::{ParseError, TranslationCause};
use crate::lexer::Lexer;
use crate::types::{Magicness, Token, TokenKind};
use crate::unit::RegexUnit;

/// Where a `^` sits within its branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaretPosition {
    BranchStart,
    /// Right after a `\n`, which already pins the position.
    AfterNewline,
    Inside,
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Token,
    depth: usize,
    matches_magic_dollar: bool,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let lookahead = Token::eof(0, lexer.state().magicness);
        Self {
            lexer,
            lookahead,
            depth: 0,
            matches_magic_dollar: false,
        }
    }

    /// True when a magic `$` anchor ends one of the top-level branches.
    pub fn matches_magic_dollar(&self) -> bool {
        self.matches_magic_dollar
    }

    pub fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    pub fn into_lexer(self) -> Lexer<'a> {
        self.lexer
    }

    /// Parses the whole pattern into its root unit.
    pub fn parse(&mut self) -> Result<RegexUnit, TranslationCause> {
        self.advance()?;
        let root = self.parse_alternation()?;
        let token = &self.lookahead;
        match token.kind {
            TokenKind::Eof => Ok(root),
            TokenKind::EndGroup => Err(ParseError::UnexpectedGroupEnd {
                position: token.position,
            }
            .into()),
            _ => Err(unexpected(token)),
        }
    }

    fn advance(&mut self) -> Result<Token, TranslationCause> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn parse_alternation(&mut self) -> Result<RegexUnit, TranslationCause> {
        let first = self.parse_branch()?;
        if self.lookahead.kind != TokenKind::Or {
            return Ok(first);
        }

        let mut branches = vec![first.render()];
        while self.lookahead.kind == TokenKind::Or {
            self.advance()?;
            branches.push(self.parse_branch()?.render());
        }
        Ok(RegexUnit::Single(branches.join("|")))
    }

    /// `a\&b\&c`; every operand but the last becomes a lookahead.
    fn parse_branch(&mut self) -> Result<RegexUnit, TranslationCause> {
        let mut unit = RegexUnit::Single(self.parse_concat()?);
        while self.lookahead.kind == TokenKind::And {
            self.advance()?;
            unit.push(self.parse_concat()?);
        }
        Ok(unit)
    }

    fn parse_concat(&mut self) -> Result<String, TranslationCause> {
        let mut out = String::new();
        let mut caret = CaretPosition::BranchStart;
        while !matches!(
            self.lookahead.kind,
            TokenKind::Or
                | TokenKind::And
                | TokenKind::EndGroup
                | TokenKind::EndOptionalMatch
                | TokenKind::Eof
        ) {
            let newline = self.lookahead.is_newline();
            out.push_str(&self.parse_piece(caret)?);
            caret = if newline {
                CaretPosition::AfterNewline
            } else {
                CaretPosition::Inside
            };
        }
        Ok(out)
    }

    fn parse_piece(&mut self, caret: CaretPosition) -> Result<String, TranslationCause> {
        let mut text = self.parse_atom(caret)?;
        let mut quantified = false;
        loop {
            match self.lookahead.kind {
                TokenKind::Quantifier => {
                    let quantifier = self.advance()?;
                    if quantified {
                        return Err(ParseError::NestedQuantifier {
                            token: quantifier.raw,
                            position: quantifier.position,
                        }
                        .into());
                    }
                    text.push_str(&quantifier.text);
                    quantified = true;
                }
                TokenKind::ZeroWidth => {
                    let assertion = self.advance()?;
                    text = format!("{}{text})", assertion.text);
                    quantified = true;
                }
                _ => return Ok(text),
            }
        }
    }

    fn parse_atom(&mut self, caret: CaretPosition) -> Result<String, TranslationCause> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Literal => Ok(token.text),
            TokenKind::Caret => Ok(match caret {
                CaretPosition::BranchStart => token.text,
                CaretPosition::AfterNewline => String::new(),
                CaretPosition::Inside if token.magicness == Magicness::VeryMagic => token.text,
                CaretPosition::Inside => r"\^".to_string(),
            }),
            TokenKind::Dollar => Ok(self.dollar(token)),
            TokenKind::StartGroup => self.parse_group(token),
            TokenKind::StartCollection => self.parse_collection(token),
            TokenKind::StartOptionalMatch => self.parse_optional_match(token),
            TokenKind::Quantifier | TokenKind::ZeroWidth => Err(ParseError::MissingOperand {
                token: token.raw,
                position: token.position,
            }
            .into()),
            TokenKind::EndGroup => Err(ParseError::UnexpectedGroupEnd {
                position: token.position,
            }
            .into()),
            _ => Err(unexpected(&token)),
        }
    }

    /// `$` anchors at the end of a branch and right before a line break;
    /// before a `\n` the line break itself pins the position.
    fn dollar(&mut self, token: Token) -> String {
        let next = &self.lookahead;
        let ends_branch = matches!(
            next.kind,
            TokenKind::Or
                | TokenKind::And
                | TokenKind::EndGroup
                | TokenKind::EndOptionalMatch
                | TokenKind::Eof
        );
        if !ends_branch {
            if next.is_newline() {
                return String::new();
            }
            if token.magicness != Magicness::VeryMagic {
                return r"\$".to_string();
            }
        }
        if self.depth == 0 && matches!(next.kind, TokenKind::Or | TokenKind::Eof) {
            self.matches_magic_dollar = true;
        }
        token.text
    }

    fn parse_group(&mut self, open: Token) -> Result<String, TranslationCause> {
        self.depth += 1;
        let inner = self.parse_alternation()?;
        if self.lookahead.kind != TokenKind::EndGroup {
            return Err(ParseError::UnclosedGroup {
                position: open.position,
            }
            .into());
        }
        let close = self.advance()?;
        self.depth -= 1;
        Ok(format!("{}{}{}", open.text, inner.render(), close.text))
    }

    fn parse_collection(&mut self, open: Token) -> Result<String, TranslationCause> {
        let mut text = open.text;
        while self.lookahead.kind == TokenKind::Literal {
            text.push_str(&self.advance()?.text);
        }
        if self.lookahead.kind != TokenKind::EndCollection {
            return Err(unexpected(&self.lookahead));
        }
        text.push_str(&self.advance()?.text);
        Ok(text)
    }

    fn parse_optional_match(&mut self, open: Token) -> Result<String, TranslationCause> {
        let mut chain = RegexUnit::OptionalChain(Vec::new());
        while !matches!(
            self.lookahead.kind,
            TokenKind::EndOptionalMatch | TokenKind::Eof
        ) {
            chain.push(self.parse_piece(CaretPosition::Inside)?);
        }
        if self.lookahead.kind != TokenKind::EndOptionalMatch {
            return Err(unexpected(&self.lookahead));
        }
        self.advance()?;
        if chain.is_empty() {
            return Err(ParseError::EmptyOptionalMatch {
                position: open.position,
            }
            .into());
        }
        Ok(chain.render())
    }
}

fn unexpected(token: &Token) -> TranslationCause {
    let shown = if token.kind == TokenKind::Eof {
        "end of pattern".to_string()
    } else {
        token.raw.clone()
    };
    ParseError::UnexpectedToken {
        token: shown,
        position: token.position,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TranslationState;
    use crate::options::ConversionOptions;

    fn parse(pattern: &str) -> Result<(String, bool), TranslationCause> {
        let options = ConversionOptions::default();
        let lexer = Lexer::new(pattern, TranslationState::new(&options, false));
        let mut parser = Parser::new(lexer);
        let root = parser.parse()?;
        Ok((root.render(), parser.matches_magic_dollar()))
    }

    #[test]
    fn caret_and_dollar_anchor_only_at_branch_edges() {
        assert_eq!(parse("^a^b$c$").unwrap().0, r"^a\^b\$c$");
        assert_eq!(parse(r"a\|^b$\|c").unwrap().0, "a|^b$|c");
        assert_eq!(parse(r"\(^a$\)").unwrap().0, "(^a$)");
        assert_eq!(parse(r"\va^b$c").unwrap().0, "a^b$c");
    }

    #[test]
    fn anchors_next_to_line_breaks_are_implied() {
        assert_eq!(parse(r"foo$\nbar").unwrap().0, r"foo\nbar");
        assert_eq!(parse(r"foo\n^bar").unwrap().0, r"foo\nbar");
        assert!(!parse(r"foo$\nbar").unwrap().1);
    }

    #[test]
    fn magic_dollar_is_reported_for_top_level_branches() {
        assert!(parse("foo$").unwrap().1);
        assert!(parse(r"foo$\|bar").unwrap().1);
        assert!(!parse(r"\(foo$\)bar").unwrap().1);
        assert!(!parse("fo$o").unwrap().1);
    }

    #[test]
    fn logical_and_becomes_lookaheads() {
        assert_eq!(parse(r".*bar\&foo").unwrap().0, "(?=.*bar)foo");
        assert_eq!(parse(r"a\&b\&c\|d").unwrap().0, "(?=a)(?=b)c|d");
    }

    #[test]
    fn zero_width_wraps_the_preceding_piece() {
        assert_eq!(parse(r"\(foo\)\@<=bar").unwrap().0, "(?<=(foo))bar");
        assert_eq!(parse(r"a*\@!").unwrap().0, "(?!a*)");
    }

    #[test]
    fn grammar_errors() {
        assert!(matches!(
            parse(r"\(a"),
            Err(TranslationCause::Parse(ParseError::UnclosedGroup { position: 0 }))
        ));
        assert!(matches!(
            parse(r"a\)"),
            Err(TranslationCause::Parse(ParseError::UnexpectedGroupEnd { position: 1 }))
        ));
        assert!(matches!(
            parse(r"a\|*"),
            Err(TranslationCause::Parse(ParseError::MissingOperand { .. }))
        ));
        assert!(matches!(
            parse("a**"),
            Err(TranslationCause::Parse(ParseError::NestedQuantifier { position: 2, .. }))
        ));
        assert!(matches!(
            parse(r"\%[]"),
            Err(TranslationCause::Parse(ParseError::EmptyOptionalMatch { position: 0 }))
        ));
    }
}
