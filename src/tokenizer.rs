use crate::ast::Repetition;
use crate::error::TokenizeError;

// Characters that end a literal run. `]` and `}` are only special inside
// constructs that open them, so on their own they stay literal.
const SPECIAL: &[char] = &['\\', '(', ')', '[', '.', '+', '*', '?', '{', '^', '$', '|'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    pub repetition: Repetition,
    pub greedy: bool,
    /// Trailing `+`: no backtracking into the repetition.
    pub possessive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupOpener {
    Capturing,
    Named,
    NonCapturing,
    Flagged,
    Atomic,
    LookAhead,
    NegativeLookAhead,
    LookBehind,
    NegativeLookBehind,
    /// `(?(cond)`, the condition included in the token.
    Conditional,
}

impl GroupOpener {
    pub fn is_capturing(&self) -> bool {
        matches!(self, GroupOpener::Capturing | GroupOpener::Named)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `\d`, `\w`, `\s`, their negations and `.`
    CharClass,
    /// `\p{..}`, `\P{..}`, `\pL`
    UnicodeProperty { negated: bool },
    Anchor,
    ControlChar,
    Backreference(usize),
    /// `\k<name>`, `\k'name'` or `(?P=name)`
    NamedBackreference,
    /// Escapes the diagram only names, such as `\K`.
    Complex,
    Quantifier(Quantifier),
    GroupOpen(GroupOpener),
    GroupClose,
    Alternation,
    Bracket,
    /// Any other backslash escape, including hex escapes.
    Escape,
    /// `(?i)` style flag switches.
    InlineFlags,
    /// Whitespace and `#` comments under the `x` flag. Kept for the round trip, never parsed.
    Trivia,
    Literal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'p> {
    pub kind: TokenKind,
    pub raw: &'p str,
    pub offset: usize,
}

impl<'p> Token<'p> {
    /// Name declared by `(?<name>` / `(?P<name>` or referenced by `\k<name>`,
    /// `\k'name'` and `(?P=name)`.
    pub fn name(&self) -> Option<&'p str> {
        let raw = self.raw;
        if let Some(name) = raw.strip_prefix("(?P=") {
            return name.strip_suffix(')');
        }
        let (start, end) = match raw.find(['<', '\'']) {
            Some(open) if raw[open..].starts_with('\'') => (open + 1, raw.rfind('\'')?),
            Some(open) => (open + 1, raw.rfind('>')?),
            None => return None,
        };
        (start <= end).then(|| &raw[start..end])
    }

    /// Condition text of a `(?(cond)` opener.
    pub fn condition(&self) -> Option<&'p str> {
        self.raw.strip_prefix("(?(")?.strip_suffix(')')
    }

    /// Flag letters of `(?i)` or `(?i:`.
    pub fn flags(&self) -> Option<&'p str> {
        let inner = self.raw.strip_prefix("(?")?;
        Some(inner.trim_end_matches([')', ':']))
    }
}

pub fn tokenize(pattern: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    let mut tokenizer = Tokenizer { src: pattern, pos: 0, extended: false, saved: Vec::new() };
    let mut tokens = Vec::new();
    while let Some(c) = tokenizer.rest().chars().next() {
        let token = tokenizer.next_token(c)?;
        log::trace!("token {:?} at {}: {:?}", token.kind, token.offset, token.raw);
        tokenizer.track_flags(&token);
        tokens.push(token);
    }
    Ok(tokens)
}

struct Tokenizer<'p> {
    src: &'p str,
    pos: usize,
    // `x` flag in effect, and its value outside each open group.
    extended: bool,
    saved: Vec<bool>,
}

// New `x` setting requested by a flag string such as `ix` or `i-x`.
fn extended_flag(flags: &str) -> Option<bool> {
    let (on, off) = flags.split_once('-').unwrap_or((flags, ""));
    if off.contains('x') {
        Some(false)
    } else if on.contains('x') {
        Some(true)
    } else {
        None
    }
}

impl<'p> Tokenizer<'p> {
    fn rest(&self) -> &'p str {
        &self.src[self.pos..]
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'p> {
        let token = Token { kind, raw: &self.src[self.pos..self.pos + len], offset: self.pos };
        self.pos += len;
        token
    }

    fn track_flags(&mut self, token: &Token<'p>) {
        match token.kind {
            TokenKind::GroupOpen(opener) => {
                self.saved.push(self.extended);
                if opener == GroupOpener::Flagged {
                    if let Some(x) = token.flags().and_then(extended_flag) {
                        self.extended = x;
                    }
                }
            }
            TokenKind::GroupClose => {
                if let Some(outer) = self.saved.pop() {
                    self.extended = outer;
                }
            }
            TokenKind::InlineFlags => {
                if let Some(x) = token.flags().and_then(extended_flag) {
                    self.extended = x;
                }
            }
            _ => {}
        }
    }

    fn next_token(&mut self, c: char) -> Result<Token<'p>, TokenizeError> {
        if self.extended {
            let len = trivia_len(self.rest());
            if len > 0 {
                return Ok(self.emit(TokenKind::Trivia, len));
            }
        }

        if let Some((quantifier, len)) = quantifier_at(self.rest()) {
            return Ok(self.emit(TokenKind::Quantifier(quantifier), len));
        }

        match c {
            '\\' => self.escape(),
            '.' => Ok(self.emit(TokenKind::CharClass, 1)),
            '^' | '$' => Ok(self.emit(TokenKind::Anchor, 1)),
            '|' => Ok(self.emit(TokenKind::Alternation, 1)),
            ')' => Ok(self.emit(TokenKind::GroupClose, 1)),
            '(' => Ok(self.group_open()),
            '[' => self.bracket(),
            // A `{` that does not form a repetition is an ordinary character.
            '{' => Ok(self.emit(TokenKind::Literal, 1)),
            _ => Ok(self.literal_run()),
        }
    }

    fn escape(&mut self) -> Result<Token<'p>, TokenizeError> {
        let rest = self.rest();
        let Some(c) = rest[1..].chars().next() else {
            return Err(TokenizeError::TrailingBackslash { offset: self.pos });
        };
        let after = &rest[1 + c.len_utf8()..];

        let (kind, len) = match c {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'h' | 'H' => (TokenKind::CharClass, 2),
            'b' | 'B' | 'A' | 'z' | 'Z' | 'G' | '<' | '>' => (TokenKind::Anchor, 2),
            'n' | 'r' | 't' | 'f' | 'v' | 'e' | 'a' => (TokenKind::ControlChar, 2),
            'K' => (TokenKind::Complex, 2),
            '1'..='9' => {
                let digits = 1 + leading(after, |c| c.is_ascii_digit());
                match rest[1..1 + digits].parse() {
                    Ok(n) => (TokenKind::Backreference(n), 1 + digits),
                    Err(_) => (TokenKind::Escape, 2),
                }
            }
            'k' if after.starts_with(['<', '\'']) => {
                let close = if after.starts_with('<') { '>' } else { '\'' };
                match after[1..].find(close) {
                    Some(end) => (TokenKind::NamedBackreference, 2 + end + 2),
                    None => (TokenKind::Escape, 2),
                }
            }
            'p' | 'P' => {
                let kind = TokenKind::UnicodeProperty { negated: c == 'P' };
                if after.starts_with('{') {
                    match after.find('}') {
                        Some(close) => (kind, 2 + close + 1),
                        None => (TokenKind::Escape, 2),
                    }
                } else {
                    match after.chars().next() {
                        Some(name) if name.is_ascii_alphabetic() => (kind, 3),
                        _ => (TokenKind::Escape, 2),
                    }
                }
            }
            'x' => (TokenKind::Escape, 2 + hex_escape_len(after, 2)),
            'u' => (TokenKind::Escape, 2 + hex_escape_len(after, 4)),
            'U' => (TokenKind::Escape, 2 + hex_escape_len(after, 8)),
            _ => (TokenKind::Escape, 1 + c.len_utf8()),
        };
        Ok(self.emit(kind, len))
    }

    fn group_open(&mut self) -> Token<'p> {
        let rest = self.rest();
        let fixed: &[(&str, GroupOpener)] = &[
            ("(?:", GroupOpener::NonCapturing),
            ("(?=", GroupOpener::LookAhead),
            ("(?!", GroupOpener::NegativeLookAhead),
            ("(?<=", GroupOpener::LookBehind),
            ("(?<!", GroupOpener::NegativeLookBehind),
            ("(?>", GroupOpener::Atomic),
        ];
        for (prefix, opener) in fixed {
            if rest.starts_with(prefix) {
                return self.emit(TokenKind::GroupOpen(*opener), prefix.len());
            }
        }

        if let Some(after) = rest.strip_prefix("(?P=") {
            let name_len = leading(after, |c| c.is_alphanumeric() || c == '_');
            if name_len > 0 && after[name_len..].starts_with(')') {
                return self.emit(TokenKind::NamedBackreference, 4 + name_len + 1);
            }
        }

        if rest.starts_with("(?(") {
            if let Some(close) = closing_paren(&rest[3..]) {
                return self.emit(TokenKind::GroupOpen(GroupOpener::Conditional), 3 + close + 1);
            }
        }

        for prefix in ["(?<", "(?P<"] {
            if let Some(after) = rest.strip_prefix(prefix) {
                let name_len = leading(after, |c| c.is_alphanumeric() || c == '_');
                if name_len > 0 && after[name_len..].starts_with('>') {
                    return self.emit(TokenKind::GroupOpen(GroupOpener::Named), prefix.len() + name_len + 1);
                }
            }
        }

        if let Some(after) = rest.strip_prefix("(?") {
            let flags_len = leading(after, |c| c.is_ascii_alphabetic() || c == '-');
            if flags_len > 0 {
                match after[flags_len..].chars().next() {
                    Some(')') => return self.emit(TokenKind::InlineFlags, 2 + flags_len + 1),
                    Some(':') => {
                        return self.emit(TokenKind::GroupOpen(GroupOpener::Flagged), 2 + flags_len + 1)
                    }
                    _ => {}
                }
            }
        }

        self.emit(TokenKind::GroupOpen(GroupOpener::Capturing), 1)
    }

    fn bracket(&mut self) -> Result<Token<'p>, TokenizeError> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 1;
        if bytes.get(i) == Some(&b'^') {
            i += 1;
        }
        // A `]` right after the opening is a member, not the end.
        if bytes.get(i) == Some(&b']') {
            i += 1;
        }
        // Nested classes such as `[a-z&&[^aeiou]]` end at the outermost `]`.
        let mut depth = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'[' if bytes.get(i + 1) == Some(&b':') => {
                    i = match rest[i + 2..].find(":]") {
                        Some(end) => i + 2 + end + 2,
                        None => i + 1,
                    };
                }
                b'[' => {
                    depth += 1;
                    i += 1;
                }
                b']' if depth == 0 => return Ok(self.emit(TokenKind::Bracket, i + 1)),
                b']' => {
                    depth -= 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(TokenizeError::UnterminatedClass { offset: self.pos })
    }

    fn literal_run(&mut self) -> Token<'p> {
        let rest = self.rest();
        let end = if self.extended {
            rest.find(|c: char| SPECIAL.contains(&c) || c == '#' || c.is_whitespace())
        } else {
            rest.find(SPECIAL)
        };
        let end = end.unwrap_or(rest.len());
        let mut len = end;
        let mut tail = &rest[end..];
        if self.extended {
            tail = &tail[trivia_len(tail)..];
        }
        // Leave the last character for a following quantifier to bind to.
        if quantifier_at(tail).is_some() {
            if let Some((last, _)) = rest[..end].char_indices().last() {
                if last > 0 {
                    len = last;
                }
            }
        }
        self.emit(TokenKind::Literal, len)
    }
}

fn leading(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices().find(|&(_, c)| !pred(c)).map_or(s.len(), |(i, _)| i)
}

// Length of the whitespace and `#` comments at the start of `s`.
fn trivia_len(s: &str) -> usize {
    let mut len = 0;
    loop {
        let rest = &s[len..];
        let step = if rest.starts_with('#') {
            rest.find('\n').map_or(rest.len(), |n| n + 1)
        } else {
            leading(rest, char::is_whitespace)
        };
        if step == 0 {
            return len;
        }
        len += step;
    }
}

// Offset of the `)` closing a parenthesis opened just before `s`.
fn closing_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

// Byte length of the hex part after `\x` or `\u`: either `{...}` or a fixed count of digits.
fn hex_escape_len(after: &str, digits: usize) -> usize {
    if after.starts_with('{') {
        if let Some(close) = after.find('}') {
            return close + 1;
        }
        return 0;
    }
    let found = leading(after, |c| c.is_ascii_hexdigit());
    if found >= digits {
        digits
    } else {
        0
    }
}

/// Recognises a quantifier at the start of `s`, returning it and its length.
fn quantifier_at(s: &str) -> Option<(Quantifier, usize)> {
    let (repetition, len) = match s.as_bytes().first()? {
        b'*' => (Repetition::ZeroOrMore, 1),
        b'+' => (Repetition::OneOrMore, 1),
        b'?' => (Repetition::ZeroOrOne, 1),
        b'{' => braces(s)?,
        _ => return None,
    };
    let lazy = s[len..].starts_with('?');
    let possessive = s[len..].starts_with('+');
    let quantifier = Quantifier { repetition, greedy: !lazy, possessive };
    Some((quantifier, len + usize::from(lazy || possessive)))
}

// `{n}`, `{n,}` or `{n,m}`.
fn braces(s: &str) -> Option<(Repetition, usize)> {
    let close = s.find('}')?;
    let body = &s[1..close];
    let number = |text: &str| -> Option<u32> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok()
    };
    let repetition = match body.split_once(',') {
        None => Repetition::Exactly(number(body)?),
        Some((min, "")) => Repetition::AtLeast(number(min)?),
        Some((min, max)) => Repetition::Between(number(min)?, number(max)?),
    };
    Some((repetition, close + 1))
}
