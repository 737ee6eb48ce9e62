use crate::error::EngineError;
use fancy_regex::{Captures, Regex};
use serde::Serialize;

/// Host-side check of whether a pattern compiles.
///
/// On failure the returned string is shown to the user as-is.
pub trait PatternValidator {
    fn validate(&self, pattern: &str) -> Result<(), String>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct ProcessRequest<'a> {
    pub pattern: &'a str,
    pub subject: &'a str,
    pub replacement: &'a str,
    pub flags: Flags,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Character offset of the match in the subject.
    pub index: usize,
    /// Group 0 is the whole match; groups that did not take part are empty.
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessOutcome {
    pub matches: Vec<MatchResult>,
    pub replaced: String,
}

/// Matching engine backed by `fancy_regex`, which understands lookaround,
/// atomic groups and back-references.
#[derive(Clone, Copy, Debug, Default)]
pub struct FancyEngine;

impl PatternValidator for FancyEngine {
    fn validate(&self, pattern: &str) -> Result<(), String> {
        Regex::new(pattern).map(|_| ()).map_err(|e| e.to_string())
    }
}

impl FancyEngine {
    pub fn compile(&self, pattern: &str, flags: Flags) -> Result<Regex, EngineError> {
        let mut inline = String::new();
        if flags.ignore_case {
            inline.push('i');
        }
        if flags.multiline {
            inline.push('m');
        }
        let source = if inline.is_empty() { pattern.to_string() } else { format!("(?{}){}", inline, pattern) };
        Ok(Regex::new(&source)?)
    }

    /// Lists matches and performs the replacement, first match only unless `global`.
    pub fn process(&self, request: &ProcessRequest<'_>) -> Result<ProcessOutcome, EngineError> {
        let subject = request.subject;
        if request.pattern.is_empty() {
            return Ok(ProcessOutcome { matches: Vec::new(), replaced: subject.to_string() });
        }

        let regex = self.compile(request.pattern, request.flags)?;
        let mut captures = Vec::new();
        if request.flags.global {
            for caps in regex.captures_iter(subject) {
                captures.push(caps?);
            }
        } else if let Some(caps) = regex.captures(subject)? {
            captures.push(caps);
        }
        log::debug!("{} match(es) for {:?}", captures.len(), request.pattern);

        let mut matches = Vec::with_capacity(captures.len());
        let mut replaced = String::with_capacity(subject.len());
        let mut last = 0;
        for caps in &captures {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            matches.push(MatchResult {
                index: subject[..whole.start()].chars().count(),
                groups: (0..caps.len())
                    .map(|i| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string()))
                    .collect(),
            });
            replaced.push_str(&subject[last..whole.start()]);
            expand(request.replacement, caps, &mut replaced);
            last = whole.end();
        }
        replaced.push_str(&subject[last..]);

        Ok(ProcessOutcome { matches, replaced })
    }
}

/// Expands `$n`, `${n}`, `${name}`, `$0`, `$&` and `$$` in a replacement template.
///
/// Numbered references to groups the pattern does not have are copied literally.
pub fn expand(template: &str, caps: &Captures<'_>, out: &mut String) {
    let mut rest = template;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        rest = &rest[dollar..];
        let after = &rest[1..];

        let consumed = if after.starts_with('$') {
            out.push('$');
            2
        } else if after.starts_with('&') {
            push_group(caps, 0, "$&", out);
            2
        } else if let Some(braced) = after.strip_prefix('{').and_then(|b| b.find('}').map(|end| &b[..end])) {
            let reference = &rest[..braced.len() + 3];
            match braced.parse::<usize>() {
                Ok(n) => push_group(caps, n, reference, out),
                Err(_) => out.push_str(caps.name(braced).map_or("", |m| m.as_str())),
            }
            reference.len()
        } else {
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            match after[..digits].parse::<usize>() {
                Ok(n) => {
                    push_group(caps, n, &rest[..digits + 1], out);
                    digits + 1
                }
                Err(_) => {
                    out.push('$');
                    1
                }
            }
        };
        rest = &rest[consumed..];
    }
    out.push_str(rest);
}

fn push_group(caps: &Captures<'_>, n: usize, reference: &str, out: &mut String) {
    if n < caps.len() {
        out.push_str(caps.get(n).map_or("", |m| m.as_str()));
    } else {
        out.push_str(reference);
    }
}
