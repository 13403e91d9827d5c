/// A piece of converted output, assembled by the parser.
///
/// Vim's logical AND (`\&`) and optional sequences (`\%[...]`) have no
/// direct counterpart in the target dialect, so the parser collects their
/// operands first and renders them once complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexUnit {
    /// Already-converted text.
    Single(String),
    /// `a\&b\&c`: every operand must match at the same position; the last
    /// one is what gets consumed.
    Concat(Vec<String>),
    /// `\%[abc]`: each atom is optional, but only if all atoms before it
    /// matched.
    OptionalChain(Vec<String>),
}

impl Default for RegexUnit {
    fn default() -> Self {
        RegexUnit::Single(String::new())
    }
}

impl From<String> for RegexUnit {
    fn from(value: String) -> Self {
        RegexUnit::Single(value)
    }
}

impl RegexUnit {
    /// Adds an operand (or atom) to the unit.
    ///
    /// A `Single` unit gives up its text as the first operand and turns into
    /// a `Concat`.
    pub fn push(&mut self, part: impl Into<String>) {
        let part = part.into();
        match self {
            RegexUnit::Single(value) => {
                let first = std::mem::take(value);
                *self = RegexUnit::Concat(vec![first, part]);
            }
            RegexUnit::Concat(parts) | RegexUnit::OptionalChain(parts) => parts.push(part),
        }
    }

    /// Number of accumulated operands; a `Single` counts as one.
    pub fn len(&self) -> usize {
        match self {
            RegexUnit::Single(_) => 1,
            RegexUnit::Concat(parts) | RegexUnit::OptionalChain(parts) => parts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RegexUnit::Single(value) => value.is_empty(),
            RegexUnit::Concat(parts) | RegexUnit::OptionalChain(parts) => parts.is_empty(),
        }
    }

    /// Text in the target dialect.
    pub fn render(&self) -> String {
        match self {
            RegexUnit::Single(value) => value.clone(),
            RegexUnit::Concat(parts) => render_concat(parts),
            RegexUnit::OptionalChain(parts) => render_optional_chain(parts),
        }
    }
}

/// `[a, b, c]` -> `(?=a)(?=b)c`
fn render_concat(parts: &[String]) -> String {
    let Some((last, leading)) = parts.split_last() else {
        return String::new();
    };
    let mut out = String::new();
    for part in leading {
        out.push_str("(?=");
        out.push_str(part);
        out.push(')');
    }
    out.push_str(last);
    out
}

/// `[a, b, c]` -> `(?:abc|ab|a|)`, longest branch first.
fn render_optional_chain(atoms: &[String]) -> String {
    let branches: Vec<String> = (0..=atoms.len())
        .rev()
        .map(|n| atoms[..n].concat())
        .collect();
    format!("(?:{})", branches.join("|"))
}
