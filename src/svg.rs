use crate::render::{row_size, BoxStyle, Metrics, Shape, Visual, VisualTree};

const STYLE: &str = "\
.rail{stroke:#dc2626;stroke-width:2;fill:none}\
.lazy{stroke-dasharray:4 3}\
.frame{stroke:#9ca3af;stroke-width:2;stroke-dasharray:6 4;fill:#f3f4f6}\
.box{stroke-width:2;fill:#fff}\
.char-class{stroke:#34d399}.anchor{stroke:#a78bfa}.control-char{stroke:#e879f9}\
.literal{stroke:#38bdf8}.backreference{stroke:#fb923c}.modifier{stroke:#94a3b8}.unknown{stroke:#64748b}\
.start{fill:#22c55e;stroke:#15803d}.end{fill:#334155;stroke:#0f172a}\
.label{text-anchor:middle;dominant-baseline:middle}\
.note{fill:#6b7280;text-anchor:middle;dominant-baseline:middle}\
.caption{fill:#6b7280;dominant-baseline:middle}";

/// Paints a diagram as a standalone SVG document. Tooltips become `<title>` elements.
pub fn paint(tree: &VisualTree) -> String {
    let m = Metrics::at(tree.scale);
    let margin = m.path;
    let width = tree.root.size.width + 2.0 * margin;
    let height = tree.root.size.height + 2.0 * margin;

    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.1}\" height=\"{h:.1}\" viewBox=\"0 0 {w:.1} {h:.1}\" \
         font-family=\"monospace\" font-size=\"{fs:.1}\">\n<style>{STYLE}</style>\n",
        w = width,
        h = height,
        fs = m.line_height * 0.8,
    );
    paint_visual(&tree.root, margin, margin, &m, &mut out);
    out.push_str("</svg>\n");
    out
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn rail(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    out.push_str(&format!("<line class=\"rail\" x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\"/>\n"));
}

// Detour from `from` to `to` on the axis through the horizontal line at `level`.
fn arc(out: &mut String, class: &str, (from, to): (f64, f64), level: f64, axis: f64) {
    out.push_str(&format!(
        "<path class=\"{class}\" d=\"M {from:.1} {axis:.1} V {level:.1} H {to:.1} V {axis:.1}\"/>\n"
    ));
}

fn text(out: &mut String, class: &str, x: f64, y: f64, content: &str) {
    out.push_str(&format!("<text class=\"{class}\" x=\"{x:.1}\" y=\"{y:.1}\">{}</text>\n", escape(content)));
}

fn style_class(style: BoxStyle) -> &'static str {
    match style {
        BoxStyle::CharClass => "char-class",
        BoxStyle::ControlChar => "control-char",
        BoxStyle::Anchor => "anchor",
        BoxStyle::Literal => "literal",
        BoxStyle::Backreference => "backreference",
        BoxStyle::Modifier => "modifier",
        BoxStyle::Unknown => "unknown",
    }
}

// Draws `visual` with its top-left corner at (x, y). Every shape is entered
// and left on its horizontal centre line.
fn paint_visual(visual: &Visual, x: f64, y: f64, m: &Metrics, out: &mut String) {
    let w = visual.size.width;
    let h = visual.size.height;
    let axis = y + h / 2.0;

    match &visual.shape {
        Shape::Start | Shape::End => {
            let (class, caption) = if visual.shape == Shape::Start { ("start", "start") } else { ("end", "end") };
            out.push_str(&format!(
                "<circle class=\"{class}\" cx=\"{:.1}\" cy=\"{axis:.1}\" r=\"{:.1}\"/>\n",
                x + w / 2.0,
                w / 2.0
            ));
            out.push_str(&format!(
                "<text class=\"label\" fill=\"#fff\" x=\"{:.1}\" y=\"{axis:.1}\">{caption}</text>\n",
                x + w / 2.0
            ));
        }
        Shape::Track { items } => {
            if items.is_empty() {
                rail(out, x, axis, x + w, axis);
            }
            let mut cursor = x;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    rail(out, cursor, axis, cursor + m.path, axis);
                    cursor += m.path;
                }
                paint_visual(item, cursor, axis - item.size.height / 2.0, m, out);
                cursor += item.size.width;
            }
        }
        Shape::Branch { rows } => {
            let mut top = y + m.stub;
            let mut axes = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let outer = row_size(row, m);
                let row_axis = top + outer.height / 2.0;
                let left = x + (w - row.size.width) / 2.0;
                rail(out, x, row_axis, left, row_axis);
                paint_visual(row, left, row_axis - row.size.height / 2.0, m, out);
                rail(out, left + row.size.width, row_axis, x + w, row_axis);
                axes.push(row_axis);
                top += outer.height;
                if i + 1 < rows.len() {
                    text(out, "note", x + w / 2.0, top + m.separator / 2.0, "or");
                    top += m.separator;
                }
            }
            if let (Some(first), Some(last)) = (axes.first(), axes.last()) {
                rail(out, x, *first, x, *last);
                rail(out, x + w, *first, x + w, *last);
            }
        }
        Shape::Loop { bypass, loop_back, lazy, caption, content } => {
            let cw = content.size.width;
            let ch = content.size.height;
            let left = x + (w - cw) / 2.0;
            let top = axis - ch / 2.0;
            rail(out, x, axis, left, axis);
            paint_visual(content, left, top, m, out);
            rail(out, left + cw, axis, x + w, axis);

            let outer_left = left - m.path / 2.0;
            let outer_right = left + cw + m.path / 2.0;
            if *bypass {
                let over = top - m.arc / 2.0;
                arc(out, "rail", (outer_left, outer_right), over, axis);
            }
            if *loop_back {
                let under = top + ch + m.arc / 2.0;
                let class = if *lazy { "rail lazy" } else { "rail" };
                arc(out, class, (outer_right, outer_left), under, axis);
                // Arrow head pointing back towards the start of the content.
                let tip = x + w / 2.0 - m.stub / 2.0;
                out.push_str(&format!(
                    "<path fill=\"#dc2626\" d=\"M {tip:.1} {under:.1} l {a:.1} {b:.1} v {c:.1} z\"/>\n",
                    a = m.stub,
                    b = -m.stub / 2.0,
                    c = m.stub,
                ));
            }
            text(out, "note", x + w / 2.0, y + h - m.caption / 2.0, caption);
        }
        Shape::Frame { label, content } => {
            out.push_str(&format!(
                "<rect class=\"frame\" x=\"{:.1}\" y=\"{y:.1}\" width=\"{:.1}\" height=\"{h:.1}\" rx=\"{:.1}\"/>\n",
                x + m.frame_margin,
                w - 2.0 * m.frame_margin,
                m.stub
            ));
            text(out, "caption", x + m.frame_margin + m.frame_pad / 2.0, y + m.frame_pad / 2.0, label);
            let left = x + (w - content.size.width) / 2.0;
            rail(out, x, axis, left, axis);
            paint_visual(content, left, y + m.frame_pad, m, out);
            rail(out, left + content.size.width, axis, x + w, axis);
        }
        Shape::Terminal { style, label, detail, tooltip } => {
            out.push_str(&format!("<g>\n<title>{}</title>\n", escape(tooltip)));
            out.push_str(&format!(
                "<rect class=\"box {}\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" rx=\"{:.1}\"/>\n",
                style_class(*style),
                m.box_pad_y
            ));
            let label_y = y + m.box_pad_y + m.line_height / 2.0;
            text(out, "label", x + w / 2.0, label_y, label);
            if let Some(detail) = detail {
                text(out, "note", x + w / 2.0, label_y + m.line_height / 2.0 + m.detail_height / 2.0, detail);
            }
            out.push_str("</g>\n");
        }
    }
}
