use kurbo::{Affine, Point, Rect};

/// The node kinds a paper tree is built from.
///
/// Only groups may hold children; rects and polylines are leaf visuals.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Rect(Rect),
    Polyline(Vec<Point>),
}

/// Paint attributes carried by a node, SVG-attribute style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    pub class: Option<String>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Attrs {
    pub fn with_class(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            ..Default::default()
        }
    }
}

/// A single node in the drawing-surface tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNode {
    pub kind: NodeKind,
    pub attrs: Attrs,
    /// Local transform applied to this node and its subtree, if any.
    pub(crate) transform: Option<Affine>,
}

impl SurfaceNode {
    pub fn group(attrs: Attrs) -> Self {
        Self {
            kind: NodeKind::Group,
            attrs,
            transform: None,
        }
    }

    pub fn rect(rect: Rect, attrs: Attrs) -> Self {
        Self {
            kind: NodeKind::Rect(rect),
            attrs,
            transform: None,
        }
    }

    pub fn polyline(points: Vec<Point>, attrs: Attrs) -> Self {
        Self {
            kind: NodeKind::Polyline(points),
            attrs,
            transform: None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}
