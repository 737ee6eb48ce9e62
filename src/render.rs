//! Turns an [`AstNode`] into a railroad-diagram layout.
//!
//! The result is a plain tree of shapes with their sizes. Loops and branches
//! are shapes wrapping their content; there are no graph edges. Painting it
//! onto a surface is left to a backend such as [`crate::svg`] or
//! [`crate::outline`].

use crate::ast::{AstNode, TerminalKind};
use serde::Serialize;

pub const MIN_SCALE: u32 = 25;
pub const MAX_SCALE: u32 = 150;
pub const DEFAULT_SCALE: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualTree {
    /// Zoom percentage the sizes were computed at.
    pub scale: u32,
    pub root: Visual,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Visual {
    pub size: Size,
    #[serde(flatten)]
    pub shape: Shape,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum Shape {
    Start,
    End,
    /// Items left to right, joined by straight path segments.
    Track { items: Vec<Visual> },
    /// Rows fanning out from one entry and merging into one exit, "or" between rows.
    Branch { rows: Vec<Visual> },
    Loop {
        /// Arc above the content that skips it.
        bypass: bool,
        /// Arc below the content that returns to its start.
        loop_back: bool,
        lazy: bool,
        caption: String,
        content: Box<Visual>,
    },
    /// Dashed frame around a group.
    Frame { label: String, content: Box<Visual> },
    Terminal { style: BoxStyle, label: String, detail: Option<String>, tooltip: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxStyle {
    CharClass,
    ControlChar,
    Anchor,
    Literal,
    Backreference,
    Modifier,
    Unknown,
}

impl Visual {
    pub fn children(&self) -> Vec<&Visual> {
        match &self.shape {
            Shape::Track { items: visuals } | Shape::Branch { rows: visuals } => visuals.iter().collect(),
            Shape::Loop { content, .. } | Shape::Frame { content, .. } => vec![content.as_ref()],
            Shape::Start | Shape::End | Shape::Terminal { .. } => Vec::new(),
        }
    }

    /// Number of shapes in this subtree, this one included.
    pub fn count(&self, pred: &impl Fn(&Shape) -> bool) -> usize {
        let own = usize::from(pred(&self.shape));
        own + self.children().into_iter().map(|c| c.count(pred)).sum::<usize>()
    }
}

/// Pixel metrics at a given zoom. Every field scales linearly, so changing the
/// zoom resizes a diagram uniformly without changing its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub char_width: f64,
    pub line_height: f64,
    pub detail_height: f64,
    pub box_pad_x: f64,
    pub box_pad_y: f64,
    pub box_min_width: f64,
    pub path: f64,
    pub terminus: f64,
    pub arc: f64,
    pub caption: f64,
    pub frame_pad: f64,
    pub frame_margin: f64,
    pub row_pad_x: f64,
    pub row_pad_y: f64,
    pub separator: f64,
    pub stub: f64,
}

impl Metrics {
    pub fn at(scale: u32) -> Metrics {
        let k = f64::from(scale) / 100.0;
        Metrics {
            char_width: 8.0 * k,
            line_height: 16.0 * k,
            detail_height: 14.0 * k,
            box_pad_x: 12.0 * k,
            box_pad_y: 6.0 * k,
            box_min_width: 50.0 * k,
            path: 24.0 * k,
            terminus: 48.0 * k,
            arc: 16.0 * k,
            caption: 16.0 * k,
            frame_pad: 16.0 * k,
            frame_margin: 8.0 * k,
            row_pad_x: 16.0 * k,
            row_pad_y: 8.0 * k,
            separator: 16.0 * k,
            stub: 8.0 * k,
        }
    }

    pub fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

/// Lays out `ast` between a start and an end node at `scale` percent.
///
/// Scales outside [`MIN_SCALE`]..=[`MAX_SCALE`] are clamped.
pub fn render(ast: &AstNode, scale: u32) -> VisualTree {
    let scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    let m = Metrics::at(scale);
    let start = terminus(Shape::Start, &m);
    let end = terminus(Shape::End, &m);
    let root = track(vec![start, visual(ast, &m), end], &m);
    VisualTree { scale, root }
}

fn visual(node: &AstNode, m: &Metrics) -> Visual {
    match node {
        AstNode::Sequence { parts } => track(parts.iter().map(|p| visual(p, m)).collect(), m),
        AstNode::Choice { options } => branch(options.iter().map(|o| visual(o, m)).collect(), m),
        AstNode::Quantifier { kind, greedy, content } => {
            let mut caption = kind.describe();
            if !greedy {
                caption.push_str(" (lazy)");
            }
            let content = visual(content, m);
            let width = (content.size.width + 2.0 * m.path).max(m.text_width(&caption));
            let height = content.size.height + 2.0 * (m.arc + m.caption);
            Visual {
                size: Size { width, height },
                shape: Shape::Loop {
                    bypass: kind.allows_zero(),
                    loop_back: kind.allows_many(),
                    lazy: !greedy,
                    caption,
                    content: Box::new(content),
                },
            }
        }
        AstNode::Group { label, content, .. } => {
            let content = visual(content, m);
            let inner = content.size.width.max(m.text_width(label));
            let width = inner + 2.0 * (m.frame_pad + m.frame_margin);
            let height = content.size.height + 2.0 * m.frame_pad;
            Visual {
                size: Size { width, height },
                shape: Shape::Frame { label: label.clone(), content: Box::new(content) },
            }
        }
        AstNode::Terminal(t) => {
            let style = match t.kind {
                TerminalKind::CharClass => BoxStyle::CharClass,
                TerminalKind::ControlChar => BoxStyle::ControlChar,
                TerminalKind::Anchor => BoxStyle::Anchor,
                TerminalKind::Literal { .. } => BoxStyle::Literal,
                TerminalKind::Backreference { .. } => BoxStyle::Backreference,
                TerminalKind::Modifier => BoxStyle::Modifier,
                TerminalKind::Unknown => BoxStyle::Unknown,
            };
            let text = m.text_width(&t.label).max(t.detail.as_deref().map_or(0.0, |d| m.text_width(d)));
            let width = (text + 2.0 * m.box_pad_x).max(m.box_min_width);
            let mut height = m.line_height + 2.0 * m.box_pad_y;
            if t.detail.is_some() {
                height += m.detail_height;
            }
            Visual {
                size: Size { width, height },
                shape: Shape::Terminal {
                    style,
                    label: t.label.clone(),
                    detail: t.detail.clone(),
                    tooltip: t.description.clone(),
                },
            }
        }
    }
}

fn terminus(shape: Shape, m: &Metrics) -> Visual {
    Visual { size: Size { width: m.terminus, height: m.terminus }, shape }
}

fn track(items: Vec<Visual>, m: &Metrics) -> Visual {
    let size = if items.is_empty() {
        Size { width: m.path, height: m.line_height }
    } else {
        let joins = (items.len() - 1) as f64 * m.path;
        Size {
            width: items.iter().map(|v| v.size.width).sum::<f64>() + joins,
            height: items.iter().map(|v| v.size.height).fold(0.0, f64::max),
        }
    };
    Visual { size, shape: Shape::Track { items } }
}

/// Outer size of one branch row, including its lead-in and lead-out paths.
pub fn row_size(row: &Visual, m: &Metrics) -> Size {
    Size {
        width: row.size.width + 2.0 * (m.path + m.row_pad_x),
        height: row.size.height + 2.0 * m.row_pad_y,
    }
}

fn branch(rows: Vec<Visual>, m: &Metrics) -> Visual {
    let outer: Vec<Size> = rows.iter().map(|r| row_size(r, m)).collect();
    let separators = rows.len().saturating_sub(1) as f64 * m.separator;
    let size = Size {
        width: outer.iter().map(|s| s.width).fold(0.0, f64::max),
        height: outer.iter().map(|s| s.height).sum::<f64>() + separators + 2.0 * m.stub,
    };
    Visual { size, shape: Shape::Branch { rows } }
}
