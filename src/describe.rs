//! Display text for terminal tokens.
//!
//! The lookup tables are built once on first use and only ever read, so they
//! are shared freely between concurrent parses.

use crate::ast::{Terminal, TerminalKind};
use map_macro::hash_map;
use std::collections::HashMap;
use std::sync::LazyLock;

struct TokenInfo {
    kind: TerminalKind,
    label: &'static str,
    description: &'static str,
}

static TOKENS: LazyLock<HashMap<&'static str, TokenInfo>> = LazyLock::new(|| {
    let class = |label, description| TokenInfo { kind: TerminalKind::CharClass, label, description };
    let anchor = |label, description| TokenInfo { kind: TerminalKind::Anchor, label, description };
    let control = |label, description| TokenInfo { kind: TerminalKind::ControlChar, label, description };
    let complex = |label, description| TokenInfo { kind: TerminalKind::Unknown, label, description };
    hash_map! {
        "\\d" => class("digit", "Matches any digit (0-9)."),
        "\\D" => class("non-digit", "Matches any character that is not a digit."),
        "\\w" => class("word character", "Matches any word character (letters, digits and underscore)."),
        "\\W" => class("non-word character", "Matches any character that is not a word character."),
        "\\s" => class("whitespace", "Matches any whitespace character."),
        "\\S" => class("non-whitespace", "Matches any character that is not whitespace."),
        "\\h" => class("hex digit", "Matches any hexadecimal digit (0-9, a-f, A-F)."),
        "\\H" => class("non-hex digit", "Matches any character that is not a hexadecimal digit."),
        "." => class("any character", "Matches any character except a line break."),
        "^" => anchor("start", "Matches the start of the string (or line in multiline mode)."),
        "$" => anchor("end", "Matches the end of the string (or line in multiline mode)."),
        "\\b" => anchor("word boundary", "Matches a word boundary."),
        "\\B" => anchor("non-word boundary", "Matches a position that is not a word boundary."),
        "\\A" => anchor("start of text", "Matches only at the very start of the text."),
        "\\z" => anchor("end of text", "Matches only at the very end of the text."),
        "\\Z" => anchor("end of text", "Matches at the end of the text or before a final line break."),
        "\\G" => anchor("end of previous match", "Matches where the previous match ended."),
        "\\<" => anchor("start of word", "Matches at the start of a word."),
        "\\>" => anchor("end of word", "Matches at the end of a word."),
        "\\n" => control("line feed", "Matches a line feed character."),
        "\\r" => control("carriage return", "Matches a carriage return character."),
        "\\t" => control("tab", "Matches a tab character."),
        "\\f" => control("form feed", "Matches a form feed character."),
        "\\v" => control("vertical tab", "Matches a vertical tab character."),
        "\\e" => control("escape", "Matches the escape character (U+001B)."),
        "\\a" => control("bell", "Matches the bell character (U+0007)."),
        "\\K" => complex("keep out", "Complex token: drops the text matched so far from the reported match."),
    }
});

// Bracket interiors with a friendlier name than "one of".
static COMMON_RANGES: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> = LazyLock::new(|| {
    hash_map! {
        "a-z" => ("lowercase letter", "Matches any lowercase letter from a to z."),
        "A-Z" => ("uppercase letter", "Matches any uppercase letter from A to Z."),
        "0-9" => ("digit", "Matches any digit from 0 to 9."),
        "a-zA-Z" => ("letter", "Matches any ASCII letter."),
        "A-Za-z" => ("letter", "Matches any ASCII letter."),
        "a-zA-Z0-9" => ("letter or digit", "Matches any ASCII letter or digit."),
        "A-Za-z0-9" => ("letter or digit", "Matches any ASCII letter or digit."),
        "a-zA-Z0-9_" => ("word character", "Matches any word character (letters, digits and underscore)."),
        "\\w\\W" => ("any character", "Matches any character, line breaks included."),
        "\\s\\S" => ("any character", "Matches any character, line breaks included."),
        "\\d\\D" => ("any character", "Matches any character, line breaks included."),
        "\\w" => ("word character", "Matches any word character (letters, digits and underscore)."),
        "\\W" => ("non-word character", "Matches any character that is not a word character."),
        "\\d" => ("digit", "Matches any digit (0-9)."),
        "\\D" => ("non-digit", "Matches any character that is not a digit."),
        "\\s" => ("whitespace", "Matches any whitespace character."),
        "\\S" => ("non-whitespace", "Matches any character that is not whitespace."),
        "\\W_" => ("symbol", "Matches a non-word character or an underscore (anything but a letter or digit)."),
    }
});

fn terminal(kind: TerminalKind, raw: &str, label: impl Into<String>, description: impl Into<String>) -> Terminal {
    Terminal { kind, raw: raw.to_string(), label: label.into(), description: description.into(), detail: None }
}

/// Table lookup for escapes, anchors and `.`.
pub fn known(raw: &str) -> Option<Terminal> {
    TOKENS.get(raw).map(|info| terminal(info.kind.clone(), raw, info.label, info.description))
}

pub fn unicode_property(raw: &str, negated: bool) -> Terminal {
    let name = raw[2..].trim_start_matches('{').trim_end_matches('}');
    let (label, description) = if negated {
        (format!("not {}", name), format!("Matches any character without the Unicode property {}.", name))
    } else {
        (name.to_string(), format!("Matches any character with the Unicode property {}.", name))
    };
    terminal(TerminalKind::CharClass, raw, label, description)
}

pub fn bracket(raw: &str) -> Terminal {
    match raw {
        "[^\\n]" => {
            return terminal(TerminalKind::CharClass, raw, "non-line-feed", "Matches any character except a line feed.")
        }
        "[^\\r\\n]" => {
            return terminal(
                TerminalKind::CharClass,
                raw,
                "non-line-break",
                "Matches any character except a line feed or carriage return.",
            )
        }
        _ => {}
    }

    let negated = raw.starts_with("[^");
    let content = &raw[if negated { 2 } else { 1 }..raw.len() - 1];
    if let Some((label, description)) = COMMON_RANGES.get(content) {
        let label = if negated { format!("not: {}", label) } else { label.to_string() };
        let description =
            if negated { format!("Does not match: {}", lowercase_first(description)) } else { description.to_string() };
        return terminal(TerminalKind::CharClass, raw, label, description);
    }

    let mut t = if negated {
        terminal(TerminalKind::CharClass, raw, "none of", format!("Matches none of: {}", content))
    } else {
        terminal(TerminalKind::CharClass, raw, "one of", format!("Matches one of: {}", content))
    };
    t.detail = Some(content.to_string());
    t
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn backreference(raw: &str, group: usize) -> Terminal {
    terminal(
        TerminalKind::Backreference { group },
        raw,
        format!("back-reference #{}", group),
        format!("Matches the same text as capturing group #{}.", group),
    )
}

pub fn named_backreference(raw: &str, name: &str, group: Option<usize>) -> Terminal {
    match group {
        Some(group) => terminal(
            TerminalKind::Backreference { group },
            raw,
            format!("back-reference #{} <{}>", group, name),
            format!("Matches the same text as capturing group #{} ({}).", group, name),
        ),
        None => unknown(raw, format!("Refers to a group named {} that is not defined before it.", name)),
    }
}

/// `\X` for an `X` without special meaning, plus hex escapes.
pub fn escaped_literal(raw: &str) -> Terminal {
    let body = &raw[1..];
    let decoded = body
        .strip_prefix('x')
        .or_else(|| body.strip_prefix(['u', 'U']))
        .map(|hex| hex.trim_start_matches('{').trim_end_matches('}'))
        .filter(|hex| !hex.is_empty())
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .and_then(char::from_u32);

    match decoded {
        Some(c) => {
            let value = c.to_string();
            let description = format!("Matches the character U+{:04X} (\"{}\").", c as u32, c);
            terminal(TerminalKind::Literal { value: value.clone() }, raw, value, description)
        }
        None => literal_of(raw, body),
    }
}

pub fn literal(raw: &str) -> Terminal {
    literal_of(raw, raw)
}

fn literal_of(raw: &str, value: &str) -> Terminal {
    let description = if value.chars().count() == 1 {
        format!("Matches the literal character \"{}\".", value)
    } else {
        format!("Matches the literal text \"{}\".", value)
    };
    terminal(TerminalKind::Literal { value: value.to_string() }, raw, value, description)
}

pub fn modifier(raw: &str, flags: &str) -> Terminal {
    terminal(
        TerminalKind::Modifier,
        raw,
        format!("flags: {}", flags),
        format!("Switches the flags \"{}\" for the rest of the enclosing group.", flags),
    )
}

pub fn unknown(raw: &str, description: impl Into<String>) -> Terminal {
    terminal(TerminalKind::Unknown, raw, raw, description)
}
