//! Debug SVG serialization of a paper subtree.
//!
//! For inspection and test assertions only — not a persistence format.

use crate::node::{Attrs, NodeKind};
use crate::paper::Paper;
use kurbo::Affine;
use petgraph::graph::NodeIndex;
use std::fmt::Write;

impl Paper {
    /// Serialize the whole tree to an SVG string.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">");
        self.write_node(&mut out, self.root());
        out.push_str("</svg>");
        out
    }

    fn write_node(&self, out: &mut String, idx: NodeIndex) {
        let Some(node) = self.node(idx) else {
            return;
        };
        match &node.kind {
            NodeKind::Group => {
                out.push_str("<g");
                write_transform(out, node.transform);
                write_attrs(out, &node.attrs);
                out.push('>');
                for child in self.children(idx) {
                    self.write_node(out, child);
                }
                out.push_str("</g>");
            }
            NodeKind::Rect(r) => {
                let _ = write!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    fmt_num(r.x0),
                    fmt_num(r.y0),
                    fmt_num(r.width()),
                    fmt_num(r.height())
                );
                write_transform(out, node.transform);
                write_attrs(out, &node.attrs);
                out.push_str("/>");
            }
            NodeKind::Polyline(points) => {
                out.push_str("<polyline points=\"");
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{},{}", fmt_num(p.x), fmt_num(p.y));
                }
                out.push('"');
                write_transform(out, node.transform);
                write_attrs(out, &node.attrs);
                out.push_str("/>");
            }
        }
    }
}

fn write_transform(out: &mut String, transform: Option<Affine>) {
    if let Some(t) = transform {
        let [a, b, c, d, e, f] = t.as_coeffs();
        let _ = write!(
            out,
            " transform=\"matrix({},{},{},{},{},{})\"",
            fmt_num(a),
            fmt_num(b),
            fmt_num(c),
            fmt_num(d),
            fmt_num(e),
            fmt_num(f)
        );
    }
}

fn write_attrs(out: &mut String, attrs: &Attrs) {
    if let Some(class) = &attrs.class {
        let _ = write!(out, " class=\"{class}\"");
    }
    if let Some(fill) = &attrs.fill {
        let _ = write!(out, " fill=\"{fill}\"");
    }
    if let Some(stroke) = &attrs.stroke {
        let _ = write!(out, " stroke=\"{stroke}\"");
    }
    if let Some(width) = attrs.stroke_width {
        let _ = write!(out, " stroke-width=\"{}\"", fmt_num(width));
    }
}

/// Trim trailing zeros so `10.0` prints as `10` but `10.5` stays `10.5`.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
