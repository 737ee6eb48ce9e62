use serde::Serialize;
use std::fmt;

// Tree representation of a pattern. Built fresh for every render and never shared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AstNode {
    Sequence {
        parts: Vec<AstNode>,
    },
    Choice {
        options: Vec<AstNode>,
    },
    Quantifier {
        kind: Repetition,
        greedy: bool,
        content: Box<AstNode>,
    },
    Group {
        kind: GroupKind,
        index: Option<usize>,
        label: String,
        content: Box<AstNode>,
    },
    Terminal(Terminal),
}

impl AstNode {
    /// Builds a sequence, collapsing a single part into the part itself.
    pub fn sequence(mut parts: Vec<AstNode>) -> AstNode {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            AstNode::Sequence { parts }
        }
    }

    /// Builds a choice, collapsing a single option into the option itself.
    pub fn choice(mut options: Vec<AstNode>) -> AstNode {
        if options.len() == 1 {
            options.remove(0)
        } else {
            AstNode::Choice { options }
        }
    }

    /// True for nodes that assert a position without consuming input.
    pub fn is_zero_width(&self) -> bool {
        match self {
            AstNode::Terminal(t) => matches!(t.kind, TerminalKind::Anchor | TerminalKind::Modifier),
            AstNode::Group { kind, .. } => kind.is_lookaround(),
            AstNode::Sequence { .. } | AstNode::Choice { .. } | AstNode::Quantifier { .. } => false,
        }
    }

    /// Capturing group indices in pre-order, which is opening-parenthesis order.
    pub fn capture_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.collect_captures(&mut indices);
        indices
    }

    fn collect_captures(&self, out: &mut Vec<usize>) {
        match self {
            AstNode::Sequence { parts: nodes } | AstNode::Choice { options: nodes } => {
                nodes.iter().for_each(|n| n.collect_captures(out));
            }
            AstNode::Quantifier { content, .. } => content.collect_captures(out),
            AstNode::Group { index, content, .. } => {
                out.extend(*index);
                content.collect_captures(out);
            }
            AstNode::Terminal(_) => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repetition {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    Exactly(u32),
    AtLeast(u32),
    Between(u32, u32),
}

impl Repetition {
    pub fn min(&self) -> u32 {
        match *self {
            Repetition::ZeroOrMore | Repetition::ZeroOrOne => 0,
            Repetition::OneOrMore => 1,
            Repetition::Exactly(n) | Repetition::AtLeast(n) | Repetition::Between(n, _) => n,
        }
    }

    /// Upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<u32> {
        match *self {
            Repetition::ZeroOrMore | Repetition::OneOrMore | Repetition::AtLeast(_) => None,
            Repetition::ZeroOrOne => Some(1),
            Repetition::Exactly(n) => Some(n),
            Repetition::Between(_, m) => Some(m),
        }
    }

    pub fn allows_zero(&self) -> bool {
        self.min() == 0
    }

    pub fn allows_many(&self) -> bool {
        self.max().map_or(true, |m| m > 1)
    }

    /// Natural-language repetition count, e.g. "between 2 and 3 times".
    pub fn describe(&self) -> String {
        match *self {
            Repetition::ZeroOrMore => "zero or more times".to_string(),
            Repetition::OneOrMore => "one or more times".to_string(),
            Repetition::ZeroOrOne => "zero or one time".to_string(),
            Repetition::Exactly(n) => format!("exactly {}", times(n)),
            Repetition::AtLeast(n) => format!("{} or more times", n),
            Repetition::Between(n, m) => format!("between {} and {} times", n, m),
        }
    }
}

fn times(n: u32) -> String {
    if n == 1 {
        "1 time".to_string()
    } else {
        format!("{} times", n)
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repetition::ZeroOrMore => write!(f, "*"),
            Repetition::OneOrMore => write!(f, "+"),
            Repetition::ZeroOrOne => write!(f, "?"),
            Repetition::Exactly(n) => write!(f, "{{{}}}", n),
            Repetition::AtLeast(n) => write!(f, "{{{},}}", n),
            Repetition::Between(n, m) => write!(f, "{{{},{}}}", n, m),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum GroupKind {
    Capturing,
    Named(String),
    NonCapturing,
    Flagged(String),
    Atomic,
    LookAhead,
    NegativeLookAhead,
    LookBehind,
    NegativeLookBehind,
    /// `(?(cond)yes|no)`; holds the condition text.
    Conditional(String),
}

impl GroupKind {
    pub fn is_capturing(&self) -> bool {
        matches!(self, GroupKind::Capturing | GroupKind::Named(_))
    }

    pub fn is_lookaround(&self) -> bool {
        matches!(
            self,
            GroupKind::LookAhead
                | GroupKind::NegativeLookAhead
                | GroupKind::LookBehind
                | GroupKind::NegativeLookBehind
        )
    }

    /// Frame caption shown around the group in a diagram.
    pub fn label(&self, index: Option<usize>) -> String {
        match (self, index) {
            (GroupKind::Capturing, Some(i)) => format!("Capturing group #{}", i),
            (GroupKind::Named(name), Some(i)) => format!("Capturing group #{} <{}>", i, name),
            (GroupKind::Capturing, None) => "Capturing group".to_string(),
            (GroupKind::Named(name), None) => format!("Capturing group <{}>", name),
            (GroupKind::NonCapturing, _) => "Non-capturing group".to_string(),
            (GroupKind::Flagged(flags), _) => format!("Non-capturing group (flags: {})", flags),
            (GroupKind::Atomic, _) => "Atomic group".to_string(),
            (GroupKind::LookAhead, _) => "Positive lookahead".to_string(),
            (GroupKind::NegativeLookAhead, _) => "Negative lookahead".to_string(),
            (GroupKind::LookBehind, _) => "Positive lookbehind".to_string(),
            (GroupKind::NegativeLookBehind, _) => "Negative lookbehind".to_string(),
            (GroupKind::Conditional(condition), _) => {
                if condition.bytes().all(|b| b.is_ascii_digit()) {
                    format!("Conditional (if group #{} matched)", condition)
                } else if condition.starts_with(['<', '\'']) {
                    format!("Conditional (if group {} matched)", condition)
                } else if condition.starts_with('?') {
                    format!("Conditional (if ({}) matches)", condition)
                } else {
                    format!("Conditional (if {} matches)", condition)
                }
            }
        }
    }
}

// Leaf of the tree: a single token with its display text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub kind: TerminalKind,
    pub raw: String,
    pub label: String,
    pub description: String,
    /// Interior of a bracket expression when no friendlier label exists.
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "kebab-case")]
pub enum TerminalKind {
    CharClass,
    ControlChar,
    Anchor,
    Literal { value: String },
    Backreference { group: usize },
    Modifier,
    Unknown,
}
