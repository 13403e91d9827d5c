//! Table-driven scanner for Vim patterns.
//!
//! Every position is matched against [`RULES`] in declaration order and the
//! first rule that is active in the current lexer state, whose precondition
//! holds and whose pattern matches wins. Order therefore encodes precedence:
//! multi-character escapes such as `\zs` or `\@<=` must come before the
//! generic `\.` fallback at the end of the table.
//!
//! Rules can emit a token, change scanner state, or both. Mode switches
//! (`\v`, `\m`, `\M`, `\V`) and ignored items (`\%V`, `\Z`, `\c`) emit
//! nothing.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_segmentation::UnicodeSegmentation;

use crate::classes;
use crate::error::ScanError;
use crate::options::ConversionOptions;
use crate::quantifier::convert_quantifier;
use crate::types::{LexState, LexStates, Magicness, Token, TokenKind};

/// Everything the rules read and write while one pattern is scanned.
#[derive(Debug)]
pub(crate) struct TranslationState<'o> {
    pub options: &'o ConversionOptions,
    pub magicness: Magicness,
    pub ignore_case: bool,
    pub external_groups: u32,
    pub last_external_match: u32,
    pub has_match_start_group: bool,
    pub has_match_end_group: bool,
    pub has_back_reference: bool,
    /// Give plain groups the names `g1`, `g2`, ... and refer to them by
    /// name. The target engine refuses numbered back-references once a
    /// pattern has any named group.
    pub name_groups: bool,
    plain_groups: u32,
    /// `(state, byte offset of its opening)`, never popped below `Initial`.
    lex_states: Vec<(LexState, usize)>,
    collection_includes_newline: bool,
    /// A `*` here is a literal: nothing precedes it, or only a `^` that
    /// starts a line.
    literal_star: bool,
    at_line_start: bool,
    token_start: usize,
    magic_caret: String,
    magic_dollar: String,
    multiline_caret: String,
    multiline_dollar: String,
    newline_atom: String,
}

impl<'o> TranslationState<'o> {
    pub fn new(options: &'o ConversionOptions, ignore_case: bool) -> Self {
        let new_line = &options.new_line;
        let multiline_caret = format!("(?:^|(?<={new_line}))");
        let multiline_dollar = format!("(?={new_line}|$)");
        let (magic_caret, magic_dollar) = if options.force_multiline_mode {
            (multiline_caret.clone(), multiline_dollar.clone())
        } else {
            ("^".to_string(), "$".to_string())
        };
        let newline_atom = if new_line.chars().count() <= 2 {
            new_line.clone()
        } else {
            format!("(?:{new_line})")
        };

        Self {
            options,
            magicness: options.magicness,
            ignore_case,
            external_groups: 0,
            last_external_match: 0,
            has_match_start_group: false,
            has_match_end_group: false,
            has_back_reference: false,
            name_groups: false,
            plain_groups: 0,
            lex_states: vec![(LexState::Initial, 0)],
            collection_includes_newline: false,
            literal_star: true,
            at_line_start: true,
            token_start: 0,
            magic_caret,
            magic_dollar,
            multiline_caret,
            multiline_dollar,
            newline_atom,
        }
    }

    fn current_lex_state(&self) -> LexState {
        self.lex_states.last().map_or(LexState::Initial, |&(state, _)| state)
    }

    fn push_lex_state(&mut self, state: LexState) {
        self.lex_states.push((state, self.token_start));
    }

    fn pop_lex_state(&mut self) {
        if self.lex_states.len() > 1 {
            self.lex_states.pop();
        }
    }

    fn very_magic(&self) -> bool {
        self.magicness == Magicness::VeryMagic
    }
}

type Precondition = fn(&TranslationState<'_>) -> bool;
type TextFn = fn(&Captures<'_>, &mut TranslationState<'_>) -> Result<String, ScanError>;
type Action = fn(&Captures<'_>, &mut TranslationState<'_>);

struct LexRule {
    states: LexStates,
    pattern: Regex,
    precondition: Option<Precondition>,
    token: Option<TokenKind>,
    text: TextFn,
    action: Option<Action>,
}

impl LexRule {
    /// A rule active in the initial state that emits nothing.
    fn new(raw: &str) -> Self {
        let pattern = Regex::new(&format!("^(?:{raw})")).expect("lexer rule pattern must compile");
        Self {
            states: LexStates::INITIAL,
            pattern,
            precondition: None,
            token: None,
            text: |m, _| Ok(m[0].to_string()),
            action: None,
        }
    }

    fn token(mut self, kind: TokenKind) -> Self {
        self.token = Some(kind);
        self
    }

    fn states(mut self, states: LexStates) -> Self {
        self.states = states;
        self
    }

    fn when(mut self, precondition: Precondition) -> Self {
        self.precondition = Some(precondition);
        self
    }

    fn text(mut self, text: TextFn) -> Self {
        self.text = text;
        self
    }

    fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn is_active(&self, state: LexState, scan: &TranslationState<'_>) -> bool {
        let in_state = self.states.contains(state.flag())
            || (state.is_inclusive() && self.states.contains(LexStates::INITIAL));
        in_state && self.precondition.is_none_or(|holds| holds(scan))
    }
}

fn very_magic(s: &TranslationState<'_>) -> bool {
    s.very_magic()
}

fn not_very_magic(s: &TranslationState<'_>) -> bool {
    !s.very_magic()
}

fn magic(s: &TranslationState<'_>) -> bool {
    !s.magicness.is_nomagic()
}

fn nomagic(s: &TranslationState<'_>) -> bool {
    s.magicness.is_nomagic()
}

fn very_nomagic(s: &TranslationState<'_>) -> bool {
    s.magicness == Magicness::VeryNonMagic
}

fn not_very_nomagic(s: &TranslationState<'_>) -> bool {
    s.magicness != Magicness::VeryNonMagic
}

/// `\x{HEX}` for a code point, or an error if it is not a character.
fn code_point(
    digits: &str,
    radix: u32,
    s: &TranslationState<'_>,
    m: &Captures<'_>,
) -> Result<String, ScanError> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .map(|c| format!(r"\x{{{:X}}}", u32::from(c)))
        .ok_or_else(|| ScanError::InvalidCodePoint {
            escape: m[0].to_string(),
            position: s.token_start,
        })
}

/// Translation of an escaped character that no other rule claimed.
fn generic_escape(c: char) -> String {
    match c {
        't' => r"\t".to_string(),
        'r' => r"\r".to_string(),
        'e' => r"\x1B".to_string(),
        'b' => r"\x08".to_string(),
        _ => regex::escape(c.encode_utf8(&mut [0; 4])),
    }
}

static RULES: LazyLock<Vec<LexRule>> = LazyLock::new(|| {
    use TokenKind::*;

    vec![
        // magicness switches
        LexRule::new(r"\\v").action(|_, s| s.magicness = Magicness::VeryMagic),
        LexRule::new(r"\\m").action(|_, s| s.magicness = Magicness::Magic),
        LexRule::new(r"\\M").action(|_, s| s.magicness = Magicness::NonMagic),
        LexRule::new(r"\\V").action(|_, s| s.magicness = Magicness::VeryNonMagic),

        // very magic constructs that start with an otherwise plain character
        LexRule::new(r"%\(").token(StartGroup).when(very_magic).text(|_, _| Ok("(?:".to_string())),
        LexRule::new(r"%\[").token(StartOptionalMatch).when(very_magic)
            .action(|_, s| s.push_lex_state(LexState::OptionalMatch)),

        // the last substitute string has no meaning outside the editor
        LexRule::new(r"~").when(magic),
        LexRule::new(r"\\~").when(nomagic),

        // plain literals
        LexRule::new(r"[\x00-\x1F]").token(Literal)
            .text(|m, _| Ok(format!(r"\x{:02x}", m[0].chars().next().map_or(0, u32::from)))),
        LexRule::new(r"[^\^$.(){}\\\[\]?+*|@%&=<>]").token(Literal),
        LexRule::new(r"@").token(Literal).when(not_very_magic),

        LexRule::new(r"\(").token(Literal).when(not_very_magic).text(|_, _| Ok(r"\(".to_string())),
        LexRule::new(r"\)").token(Literal).when(not_very_magic).text(|_, _| Ok(r"\)".to_string())),
        LexRule::new(r"\{").token(Literal).when(not_very_magic).text(|_, _| Ok(r"\{".to_string())),
        LexRule::new(r"\}").token(Literal).text(|_, _| Ok(r"\}".to_string())),

        LexRule::new(r"\\\.").token(Literal).when(nomagic).text(|_, _| Ok(".".to_string())),
        LexRule::new(r"\.").token(Literal).when(nomagic).text(|_, _| Ok(r"\.".to_string())),
        LexRule::new(r"\.").token(Literal).when(magic),
        LexRule::new(r"\*").token(Literal).when(nomagic).text(|_, _| Ok(r"\*".to_string())),

        LexRule::new(r"\|").token(Literal).when(not_very_magic).text(|_, _| Ok(r"\|".to_string())),

        // dollars and carets; the parser decides whether they anchor
        LexRule::new(r"\$").token(Dollar).when(not_very_nomagic).text(|_, s| Ok(s.magic_dollar.clone())),
        LexRule::new(r"\$").token(Literal).when(very_nomagic).text(|_, _| Ok(r"\$".to_string())),
        LexRule::new(r"\^").token(Caret).when(not_very_nomagic).text(|_, s| Ok(s.magic_caret.clone())),
        LexRule::new(r"\^").token(Literal).when(very_nomagic).text(|_, _| Ok(r"\^".to_string())),
        LexRule::new(r"\\\$").token(Dollar).when(very_nomagic).text(|_, s| Ok(s.magic_dollar.clone())),
        LexRule::new(r"\\\^").token(Caret).when(very_nomagic).text(|_, s| Ok(s.magic_caret.clone())),

        LexRule::new(r"\\_\^").token(Literal).text(|_, s| Ok(s.multiline_caret.clone())),
        LexRule::new(r"\\_\$").token(Literal).text(|_, s| Ok(s.multiline_dollar.clone())),
        LexRule::new(r"\\_\.").token(Literal).text(|_, s| Ok(format!("(?:{}|.)", s.options.new_line))),
        LexRule::new(r"\\n").token(Literal).text(|_, s| Ok(s.newline_atom.clone())),

        // word boundaries
        LexRule::new(r"\\<").token(Literal).when(not_very_magic).text(|_, _| Ok(r"(?<!\w)(?=\w)".to_string())),
        LexRule::new(r"\\>").token(Literal).when(not_very_magic).text(|_, _| Ok(r"(?<=\w)(?!\w)".to_string())),
        LexRule::new(r"<").token(Literal).when(very_magic).text(|_, _| Ok(r"(?<!\w)(?=\w)".to_string())),
        LexRule::new(r">").token(Literal).when(very_magic).text(|_, _| Ok(r"(?<=\w)(?!\w)".to_string())),

        // match start and end; the target engine allows each name only once,
        // so repeats become an empty group that a quantifier can still bind to
        LexRule::new(r"\\zs").token(Literal).text(|_, s| {
            let first = !std::mem::replace(&mut s.has_match_start_group, true);
            Ok(if first { "(?<zs>)" } else { "(?:)" }.to_string())
        }),
        LexRule::new(r"\\ze").token(Literal).text(|_, s| {
            let first = !std::mem::replace(&mut s.has_match_end_group, true);
            Ok(if first { "(?<ze>)" } else { "(?:)" }.to_string())
        }),
        LexRule::new(r"\\%\^").token(Literal).text(|_, _| Ok(r"\A".to_string())),
        LexRule::new(r"\\%\$").token(Literal).text(|_, _| Ok(r"\z".to_string())),

        // editor positions, combining characters and case markers mean nothing here
        LexRule::new(r"\\%(?:V|#|[<>]?(?:'.|[0-9]+[lcv]))"),
        LexRule::new(r"\\Z"),
        // case sensitivity is settled before scanning starts
        LexRule::new(r"\\[Cc]"),

        // built-in character classes
        LexRule::new(r"\\(?P<nl>_)?(?P<class>[iIkKfFpPsSdDxXoOwWhHaAlLuU])").token(Literal)
            .text(|m, s| {
                let class = m["class"].chars().next().unwrap_or('s');
                classes::character_class(class, m.name("nl").is_some(), s.options)
            }),

        // decimal, octal, hex and unicode character codes
        LexRule::new(r"\\%?d(?P<n>[0-9]+)").token(Literal).states(LexStates::ALL)
            .text(|m, s| code_point(&m["n"], 10, s, m)),
        LexRule::new(r"\\%?o(?P<n>[0-7]{1,4})").token(Literal).states(LexStates::ALL)
            .text(|m, s| code_point(&m["n"], 8, s, m)),
        LexRule::new(r"\\%?x(?P<n>[0-9a-fA-F]{1,2})").token(Literal).states(LexStates::ALL)
            .text(|m, s| code_point(&m["n"], 16, s, m)),
        LexRule::new(r"\\%?u(?P<n>[0-9a-fA-F]{1,4})").token(Literal).states(LexStates::ALL)
            .text(|m, s| code_point(&m["n"], 16, s, m)),
        LexRule::new(r"\\%?U(?P<n>[0-9a-fA-F]{1,8})").token(Literal).states(LexStates::ALL)
            .text(|m, s| code_point(&m["n"], 16, s, m)),

        // logical operators
        LexRule::new(r"\\&").token(And).when(not_very_magic),
        LexRule::new(r"\\\|").token(Or).when(not_very_magic).text(|_, _| Ok("|".to_string())),
        LexRule::new(r"&").token(And).when(very_magic),
        LexRule::new(r"\|").token(Or).when(very_magic),

        // groups
        LexRule::new(r"\\\(").token(StartGroup).when(not_very_magic)
            .action(|_, s| s.plain_groups += 1)
            .text(plain_group),
        LexRule::new(r"\(").token(StartGroup).when(very_magic)
            .action(|_, s| s.plain_groups += 1)
            .text(plain_group),
        LexRule::new(r"\\%\(").token(StartGroup).text(|_, _| Ok("(?:".to_string())),
        LexRule::new(r"\\z\(").token(StartGroup)
            .action(|_, s| s.external_groups += 1)
            .text(|_, s| Ok(format!("(?<z{}>", s.external_groups))),
        LexRule::new(r"\\\)").token(EndGroup).when(not_very_magic).text(|_, _| Ok(")".to_string())),
        LexRule::new(r"\)").token(EndGroup).when(very_magic),

        // a star at the start of the pattern or right after a line-start `^`
        // has nothing to repeat and matches itself
        LexRule::new(r"\*").token(Literal).when(|s| s.literal_star).text(|_, _| Ok(r"\*".to_string())),

        // quantifiers
        LexRule::new(r"\*").token(Quantifier),
        LexRule::new(r"\\\*").token(Quantifier).when(nomagic).text(|_, _| Ok("*".to_string())),
        LexRule::new(r"\\\+").token(Quantifier).when(not_very_magic).text(|_, _| Ok("+".to_string())),
        LexRule::new(r"\\[?=]").token(Quantifier).when(not_very_magic).text(|_, _| Ok("?".to_string())),
        LexRule::new(r"\+").token(Quantifier).when(very_magic),
        LexRule::new(r"[?=]").token(Quantifier).when(very_magic).text(|_, _| Ok("?".to_string())),
        LexRule::new(r"\\\{-?[0-9]*,?[0-9]*\\?\}").token(Quantifier).when(not_very_magic)
            .text(|m, _| convert_quantifier(&m[0])),
        LexRule::new(r"\{-?[0-9]*,?[0-9]*\}").token(Quantifier).when(very_magic)
            .text(|m, _| convert_quantifier(&m[0])),

        // zero-width assertions around the preceding atom
        LexRule::new(r"\\@=").token(ZeroWidth).when(not_very_magic).text(|_, _| Ok("(?=".to_string())),
        LexRule::new(r"\\@!").token(ZeroWidth).when(not_very_magic).text(|_, _| Ok("(?!".to_string())),
        LexRule::new(r"\\@[0-9]*<=").token(ZeroWidth).when(not_very_magic).text(|_, _| Ok("(?<=".to_string())),
        LexRule::new(r"\\@[0-9]*<!").token(ZeroWidth).when(not_very_magic).text(|_, _| Ok("(?<!".to_string())),
        LexRule::new(r"\\@>").token(ZeroWidth).when(not_very_magic).text(|_, _| Ok("(?>".to_string())),
        LexRule::new(r"@=").token(ZeroWidth).when(very_magic).text(|_, _| Ok("(?=".to_string())),
        LexRule::new(r"@!").token(ZeroWidth).when(very_magic).text(|_, _| Ok("(?!".to_string())),
        LexRule::new(r"@[0-9]*<=").token(ZeroWidth).when(very_magic).text(|_, _| Ok("(?<=".to_string())),
        LexRule::new(r"@[0-9]*<!").token(ZeroWidth).when(very_magic).text(|_, _| Ok("(?<!".to_string())),
        LexRule::new(r"@>").token(ZeroWidth).when(very_magic).text(|_, _| Ok("(?>".to_string())),

        // collections, eg [abc] or [^xyz]
        LexRule::new(r"(?P<nl>\\_)?\[(?P<not>\^)?(?P<bracket>\])?").token(StartCollection).when(magic)
            .action(|_, s| s.push_lex_state(LexState::Collection))
            .text(collection_start),
        LexRule::new(r"(?:\\|(?P<nl>\\_))\[(?P<not>\^)?(?P<bracket>\])?").token(StartCollection).when(nomagic)
            .action(|_, s| s.push_lex_state(LexState::Collection))
            .text(collection_start),

        LexRule::new(r"\]").token(EndCollection).states(LexStates::COLLECTION)
            .action(|_, s| s.pop_lex_state())
            .text(|_, s| Ok(classes::collection_end(s.collection_includes_newline).to_string())),
        LexRule::new(r"\[:(?P<name>[a-z]+):\]").token(Literal).states(LexStates::COLLECTION)
            .text(|m, s| {
                classes::collection_class(&m["name"], s.ignore_case, s.options).ok_or_else(|| {
                    ScanError::UnknownCollectionClass { name: m["name"].to_string(), position: s.token_start }
                })
            }),
        // equivalence classes and collation elements stand for the character itself
        LexRule::new(r"\[[=.](?P<char>[^\]])[=.]\]").token(Literal).states(LexStates::COLLECTION)
            .text(|m, _| Ok(regex::escape(&m["char"]))),
        // Vim does not know \d or \s inside a collection, so only the escapes
        // that mean the same thing in both dialects pass through
        LexRule::new(r"\\[rtn\\\]^\-]").token(Literal).states(LexStates::COLLECTION),
        LexRule::new(r"\\e").token(Literal).states(LexStates::COLLECTION).text(|_, _| Ok(r"\x1B".to_string())),
        LexRule::new(r"\\b").token(Literal).states(LexStates::COLLECTION).text(|_, _| Ok(r"\x08".to_string())),
        LexRule::new(r"\\").token(Literal).states(LexStates::COLLECTION).text(|_, _| Ok(r"\\".to_string())),
        // `--` would be a set difference in the target syntax
        LexRule::new(r"--").token(Literal).states(LexStates::COLLECTION).text(|_, _| Ok(r"-\-".to_string())),
        LexRule::new(r"[\[&~]").token(Literal).states(LexStates::COLLECTION).text(|m, _| Ok(format!(r"\{}", &m[0]))),
        LexRule::new(r"(?s:.)").token(Literal).states(LexStates::COLLECTION),

        // optional sequences, eg fu\%[nction]
        LexRule::new(r"\\%\[").token(StartOptionalMatch)
            .action(|_, s| s.push_lex_state(LexState::OptionalMatch)),
        LexRule::new(r"\]").token(EndOptionalMatch).states(LexStates::OPTIONAL_MATCH)
            .action(|_, s| s.pop_lex_state()),

        LexRule::new(r"\]").token(Literal).text(|_, _| Ok(r"\]".to_string())),
        LexRule::new(r"[?+\[]").token(Literal).text(|m, _| Ok(format!(r"\{}", &m[0]))),
        LexRule::new(r"[%&=<>]").token(Literal),

        // back-references; \z1 refers to a group of another pattern and is
        // left for the caller to substitute
        LexRule::new(r"\\z(?P<n>[1-9])").token(Literal).action(|m, s| {
            let n = m["n"].parse::<u32>().unwrap_or(0);
            s.last_external_match = s.last_external_match.max(n);
        }),
        LexRule::new(r"\\(?P<n>[1-9])").token(Literal)
            .action(|_, s| s.has_back_reference = true)
            .text(|m, s| Ok(if s.name_groups { format!(r"\k<g{}>", &m["n"]) } else { m[0].to_string() })),
        LexRule::new(r"\\(?s:.)").token(Literal)
            .text(|m, _| Ok(m[0].chars().nth(1).map(generic_escape).unwrap_or_default())),
    ]
});

fn plain_group(_: &Captures<'_>, s: &mut TranslationState<'_>) -> Result<String, ScanError> {
    Ok(if s.name_groups {
        format!("(?<g{}>", s.plain_groups)
    } else {
        "(".to_string()
    })
}

fn collection_start(m: &Captures<'_>, s: &mut TranslationState<'_>) -> Result<String, ScanError> {
    let include_newline = m.name("nl").is_some();
    s.collection_includes_newline = include_newline;
    Ok(classes::collection_start(
        m.name("not").is_some(),
        m.name("bracket").is_some(),
        include_newline,
        &s.options.new_line,
    ))
}

/// Produces tokens from a Vim pattern on demand.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    position: usize,
    state: TranslationState<'a>,
    partial: String,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, state: TranslationState<'a>) -> Self {
        Self {
            input,
            position: 0,
            state,
            partial: String::new(),
        }
    }

    pub fn state(&self) -> &TranslationState<'a> {
        &self.state
    }

    pub fn into_state(self) -> TranslationState<'a> {
        self.state
    }

    /// Concatenated text of every token produced so far.
    pub fn partial(&self) -> &str {
        &self.partial
    }

    /// Scans the next token. Once the input is exhausted this keeps
    /// returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        let input = self.input;
        loop {
            if self.position >= input.len() {
                if let Some(&(state, position)) = self.state.lex_states.last()
                    && state != LexState::Initial
                {
                    return Err(ScanError::Unterminated { state, position });
                }
                return Ok(Token::eof(self.position, self.state.magicness));
            }

            let rest = &input[self.position..];
            let current = self.state.current_lex_state();
            let found = RULES
                .iter()
                .filter(|rule| rule.is_active(current, &self.state))
                .find_map(|rule| {
                    rule.pattern
                        .captures(rest)
                        .filter(|m| !m[0].is_empty())
                        .map(|m| (rule, m))
                });

            let Some((rule, m)) = found else {
                return Err(ScanError::NoRuleMatches {
                    position: self.position,
                    column: input[..self.position].graphemes(true).count() + 1,
                    rest: rest.to_string(),
                });
            };

            let raw = &m[0];
            self.state.token_start = self.position;
            self.position += raw.len();

            if let Some(action) = rule.action {
                action(&m, &mut self.state);
            }

            let Some(kind) = rule.token else {
                tracing::trace!(raw, magicness = ?self.state.magicness, "scanner state change");
                continue;
            };

            let text = (rule.text)(&m, &mut self.state)?;
            tracing::trace!(?kind, raw, %text, "token");
            self.partial.push_str(&text);

            let token = Token {
                kind,
                text,
                raw: raw.to_string(),
                position: self.state.token_start,
                magicness: self.state.magicness,
            };
            self.state.literal_star = kind == TokenKind::Caret && self.state.at_line_start;
            self.state.at_line_start = token.is_newline()
                || matches!(kind, TokenKind::Or | TokenKind::And | TokenKind::StartGroup);
            return Ok(token);
        }
    }
}
