//! Element registry: canonical descriptors and their graphics association.
//!
//! The registry owns the canonical [`Element`] for every registered id and
//! keeps a weak id → graphical-node association (indices into the paper,
//! not owned nodes). Callers must not change an element's id after
//! registration.

use ib_core::{Element, ElementId, NodeIndex};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: HashMap<ElementId, Element>,
    graphics: HashMap<ElementId, NodeIndex>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Register the canonical descriptor for its id.
    pub fn register(&mut self, element: Element) {
        log::debug!("register {}", element.id);
        self.elements.insert(element.id, element);
    }

    /// Remove the descriptor and any graphics association.
    pub fn unregister(&mut self, id: ElementId) -> Option<Element> {
        self.graphics.remove(&id);
        self.elements.remove(&id)
    }

    pub fn get_by_id(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_by_id_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Associate a registered element with its graphical node.
    pub fn associate(&mut self, id: ElementId, gfx: NodeIndex) {
        self.graphics.insert(id, gfx);
    }

    /// The element's graphical node, if one was associated.
    pub fn graphics_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.graphics.get(&id).copied()
    }

    /// Append `child` to the parent's ordered child list.
    pub fn link_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(p) = self.elements.get_mut(&parent) {
            if !p.children.contains(&child) {
                p.children.push(child);
            }
        }
    }

    /// Remove `child` from the parent's child list.
    pub fn unlink_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|c| *c != child);
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
