//! The paper: an owned tree of graphical nodes with SVG semantics.
//!
//! Nodes live in a `StableDiGraph` where edges run parent → child. Paint
//! order is kept in an explicit per-parent child list — `petgraph`
//! adjacency iteration order is not guaranteed, and append-to-end is the
//! reordering primitive the canvas builds z-order on.

use crate::node::{Attrs, NodeKind, SurfaceNode};
use ib_core::CanvasError;
use kurbo::{Affine, Rect};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// An owned drawing surface. One per canvas, never shared.
#[derive(Debug)]
pub struct Paper {
    graph: StableDiGraph<SurfaceNode, ()>,
    root: NodeIndex,
    /// Paint order: children of each group, bottom-most first.
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl Paper {
    /// Create a paper with an empty root group.
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(SurfaceNode::group(Attrs::with_class("viewport")));
        let mut child_order = HashMap::new();
        child_order.insert(root, Vec::new());

        Self {
            graph,
            root,
            child_order,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.graph.node_weight(node).is_some()
    }

    pub fn node(&self, node: NodeIndex) -> Option<&SurfaceNode> {
        self.graph.node_weight(node)
    }

    pub fn node_mut(&mut self, node: NodeIndex) -> Option<&mut SurfaceNode> {
        self.graph.node_weight_mut(node)
    }

    /// Create a node as the last child of `parent`.
    ///
    /// Fails with `GraphicsCreation` when the parent handle is stale or
    /// not a group.
    pub fn create(
        &mut self,
        parent: NodeIndex,
        node: SurfaceNode,
    ) -> Result<NodeIndex, CanvasError> {
        self.require_group(parent)?;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.child_order.entry(parent).or_default().push(idx);
        if self.graph[idx].is_group() {
            self.child_order.insert(idx, Vec::new());
        }
        Ok(idx)
    }

    /// Create an empty group node under `parent`.
    pub fn create_group(&mut self, parent: NodeIndex, attrs: Attrs) -> Result<NodeIndex, CanvasError> {
        self.create(parent, SurfaceNode::group(attrs))
    }

    /// Detach `child` from its current parent and append it as the last
    /// child of `parent`. Appending an existing child of `parent` moves it
    /// to the end — this is the z-order reordering primitive.
    pub fn append_child(
        &mut self,
        parent: NodeIndex,
        child: NodeIndex,
    ) -> Result<(), CanvasError> {
        self.require_group(parent)?;
        if !self.contains(child) {
            return Err(CanvasError::GraphicsCreation(format!(
                "cannot append removed node {child:?}"
            )));
        }

        if let Some(old_parent) = self.parent(child) {
            if let Some(edge) = self.graph.find_edge(old_parent, child) {
                self.graph.remove_edge(edge);
            }
            if let Some(order) = self.child_order.get_mut(&old_parent) {
                order.retain(|&c| c != child);
            }
        }

        self.graph.add_edge(parent, child, ());
        self.child_order.entry(parent).or_default().push(child);
        Ok(())
    }

    /// Remove a node and its entire subtree.
    pub fn remove(&mut self, node: NodeIndex) {
        if !self.contains(node) || node == self.root {
            return;
        }
        if let Some(parent) = self.parent(node) {
            if let Some(order) = self.child_order.get_mut(&parent) {
                order.retain(|&c| c != node);
            }
        }
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            stack.extend(self.children(idx));
            self.child_order.remove(&idx);
            self.graph.remove_node(idx);
        }
    }

    /// The parent of a node, `None` for the root.
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
    }

    /// Children of a node in paint order (bottom-most first).
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.child_order.get(&node).cloned().unwrap_or_default()
    }

    // ─── Transforms ──────────────────────────────────────────────────────

    /// The node's local transform; identity if none was set.
    pub fn transform(&self, node: NodeIndex) -> Affine {
        self.graph
            .node_weight(node)
            .and_then(|n| n.transform)
            .unwrap_or(Affine::IDENTITY)
    }

    /// Replace the node's local transform wholesale.
    pub fn set_transform(&mut self, node: NodeIndex, transform: Affine) {
        if let Some(n) = self.graph.node_weight_mut(node) {
            log::trace!("set_transform {node:?} {:?}", transform.as_coeffs());
            n.transform = Some(transform);
        }
    }

    /// The current transform matrix of a node: the composition of every
    /// ancestor transform down to and including the node's own.
    pub fn ctm(&self, node: NodeIndex) -> Affine {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(idx) = current {
            chain.push(self.transform(idx));
            current = self.parent(idx);
        }
        chain
            .into_iter()
            .rev()
            .fold(Affine::IDENTITY, |acc, t| acc * t)
    }

    // ─── Bounding boxes ──────────────────────────────────────────────────

    /// Bounding box in the node's local coordinate space — the node's own
    /// transform is *not* applied, descendants' transforms are.
    pub fn bbox_isolated(&self, node: NodeIndex) -> Option<Rect> {
        match &self.graph.node_weight(node)?.kind {
            NodeKind::Rect(rect) => Some(*rect),
            NodeKind::Polyline(points) => {
                let first = points.first()?;
                let mut bounds = Rect::from_points(*first, *first);
                for p in &points[1..] {
                    bounds = bounds.union_pt(*p);
                }
                Some(bounds)
            }
            NodeKind::Group => {
                let mut bounds: Option<Rect> = None;
                for child in self.children(node) {
                    if let Some(b) = self.bbox(child) {
                        bounds = Some(match bounds {
                            Some(acc) => acc.union(b),
                            None => b,
                        });
                    }
                }
                bounds
            }
        }
    }

    /// Bounding box in the parent's coordinate space — the node's own
    /// transform applied to its isolated box.
    pub fn bbox(&self, node: NodeIndex) -> Option<Rect> {
        let local = self.bbox_isolated(node)?;
        Some(self.transform(node).transform_rect_bbox(local))
    }

    fn require_group(&self, node: NodeIndex) -> Result<(), CanvasError> {
        match self.graph.node_weight(node) {
            Some(n) if n.is_group() => Ok(()),
            Some(_) => Err(CanvasError::GraphicsCreation(format!(
                "node {node:?} is not a group"
            ))),
            None => Err(CanvasError::GraphicsCreation(format!(
                "parent node {node:?} does not exist"
            ))),
        }
    }
}

impl Default for Paper {
    fn default() -> Self {
        Self::new()
    }
}
