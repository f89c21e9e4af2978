//! Diagram element model.
//!
//! An [`Element`] is the logical descriptor of a diagram object — identity
//! plus geometry — independent of its rendered counterpart on the drawing
//! surface. Whether an element is a shape or a connection is a tag resolved
//! once at construction, not inferred from the presence of waypoints at
//! each dispatch site.
//!
//! Parent/child links are id references used only for traversal; the
//! element registry owns the canonical descriptor for every id.

use crate::id::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The two element kinds of the diagram model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// A node-like element with a rectangular footprint in model space.
    Shape {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// An edge-like element routed through an ordered waypoint sequence.
    Connection { waypoints: SmallVec<[Point; 4]> },
}

/// A diagram element descriptor: a shape or a connection with identity,
/// optional parent, and ordered children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique, non-empty id. Must not change after registration.
    pub id: ElementId,

    /// What kind of element this is.
    pub kind: ElementKind,

    /// Back-reference to the containing element, if nested.
    pub parent: Option<ElementId>,

    /// Children in z-order (first = bottom-most in paint order).
    pub children: SmallVec<[ElementId; 4]>,
}

impl Element {
    /// Create a shape descriptor with the given footprint.
    pub fn shape(id: ElementId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            kind: ElementKind::Shape {
                x,
                y,
                width,
                height,
            },
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Create a connection descriptor routed through `waypoints`.
    pub fn connection(id: ElementId, waypoints: impl IntoIterator<Item = Point>) -> Self {
        Self {
            id,
            kind: ElementKind::Connection {
                waypoints: waypoints.into_iter().collect(),
            },
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Builder-style parent assignment.
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn is_connection(&self) -> bool {
        matches!(self.kind, ElementKind::Connection { .. })
    }

    /// The shape footprint in model coordinates; `None` for connections.
    pub fn bounds(&self) -> Option<Rect> {
        match self.kind {
            ElementKind::Shape {
                x,
                y,
                width,
                height,
            } => Some(Rect::new(x, y, x + width, y + height)),
            ElementKind::Connection { .. } => None,
        }
    }

    /// The waypoint sequence; empty for shapes.
    pub fn waypoints(&self) -> &[Point] {
        match &self.kind {
            ElementKind::Connection { waypoints } => waypoints,
            ElementKind::Shape { .. } => &[],
        }
    }
}
