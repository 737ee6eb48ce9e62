use crate::render::{Shape, Visual, VisualTree};

const INDENT: &str = "  ";

/// Paints a diagram as indented text for terminals.
///
/// Sequences stay at their parent's depth; branches, loops and groups indent
/// their content one level.
pub fn paint(tree: &VisualTree) -> String {
    let mut out = String::new();
    paint_visual(&tree.root, 0, &mut out);
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn paint_visual(visual: &Visual, depth: usize, out: &mut String) {
    match &visual.shape {
        Shape::Start => line(out, depth, "○ start"),
        Shape::End => line(out, depth, "● end"),
        Shape::Track { items } if items.is_empty() => line(out, depth, "─ (nothing)"),
        Shape::Track { items } => items.iter().for_each(|item| paint_visual(item, depth, out)),
        Shape::Branch { rows } => {
            line(out, depth, &format!("┬ one of {} branches", rows.len()));
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    line(out, depth + 1, "── or ──");
                }
                paint_visual(row, depth + 1, out);
            }
        }
        Shape::Loop { bypass, loop_back, caption, content, .. } => {
            let marker = match (bypass, loop_back) {
                (true, true) => "↻?",
                (true, false) => "?",
                (false, true) => "↻",
                (false, false) => "=",
            };
            line(out, depth, &format!("{} {}", marker, caption));
            paint_visual(content, depth + 1, out);
        }
        Shape::Frame { label, content } => {
            line(out, depth, &format!("┌ {}", label));
            paint_visual(content, depth + 1, out);
        }
        Shape::Terminal { label, detail, tooltip, .. } => {
            let text = match detail {
                Some(detail) => format!("[{}] {}  -- {}", label, detail, tooltip),
                None => format!("[{}]  -- {}", label, tooltip),
            };
            line(out, depth, &text);
        }
    }
}
