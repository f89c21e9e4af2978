//! Graphics-update routines: sync an element's visual with its descriptor.
//!
//! Each element owns a group on the paper; the group's first non-group
//! child is the visual. Updating replaces the visual's geometry in place,
//! so child element groups nested in the same group are untouched.

use ib_core::{CanvasError, Element, NodeIndex};
use ib_surface::{Attrs, NodeKind, Paper, SurfaceNode};

fn shape_attrs() -> Attrs {
    Attrs {
        class: None,
        fill: Some("#FFFFFF".to_string()),
        stroke: Some("#000000".to_string()),
        stroke_width: Some(2.0),
    }
}

fn connection_attrs() -> Attrs {
    Attrs {
        class: None,
        fill: Some("none".to_string()),
        stroke: Some("#000000".to_string()),
        stroke_width: Some(2.0),
    }
}

fn visual_child(paper: &Paper, gfx: NodeIndex) -> Option<NodeIndex> {
    paper
        .children(gfx)
        .into_iter()
        .find(|&c| paper.node(c).is_some_and(|n| !n.is_group()))
}

/// Draw or refresh a shape's rect inside its group.
pub fn update_shape(paper: &mut Paper, gfx: NodeIndex, element: &Element) -> Result<(), CanvasError> {
    let bounds = element.bounds().ok_or_else(|| {
        CanvasError::GraphicsCreation(format!("element {} has no shape bounds", element.id))
    })?;

    match visual_child(paper, gfx) {
        Some(visual) => {
            if let Some(node) = paper.node_mut(visual) {
                node.kind = NodeKind::Rect(bounds);
            }
        }
        None => {
            paper.create(gfx, SurfaceNode::rect(bounds, shape_attrs()))?;
        }
    }
    Ok(())
}

/// Draw or refresh a connection's polyline inside its group.
pub fn update_connection(
    paper: &mut Paper,
    gfx: NodeIndex,
    element: &Element,
) -> Result<(), CanvasError> {
    let waypoints = element.waypoints().to_vec();

    match visual_child(paper, gfx) {
        Some(visual) => {
            if let Some(node) = paper.node_mut(visual) {
                node.kind = NodeKind::Polyline(waypoints);
            }
        }
        None => {
            paper.create(gfx, SurfaceNode::polyline(waypoints, connection_attrs()))?;
        }
    }
    Ok(())
}
