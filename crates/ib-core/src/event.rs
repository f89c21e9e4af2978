//! Typed canvas event vocabulary and synchronous event bus.
//!
//! Every event kind carries its own payload shape — listeners match on
//! [`CanvasEvent`] instead of decoding untyped string/object pairs.
//! Dispatch is synchronous: listeners fire in registration order, on the
//! calling thread, before the triggering operation returns.

use crate::id::ElementId;
use crate::model::Element;
use crate::viewbox::Viewbox;
use petgraph::graph::NodeIndex;

/// Discriminant for subscribing to a single event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CanvasInit,
    ShapeAdded,
    ConnectionAdded,
    ViewboxChanged,
    ShapeChanged,
    ConnectionChanged,
}

/// A canvas lifecycle event with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The canvas finished constructing its root drawing-surface node.
    CanvasInit { root: NodeIndex },

    /// A shape was registered and its graphics created.
    ShapeAdded { element: Element, gfx: NodeIndex },

    /// A connection was registered and its graphics created.
    ConnectionAdded { element: Element, gfx: NodeIndex },

    /// The root transform changed (viewbox write, scroll, or zoom).
    ViewboxChanged { viewbox: Viewbox },

    /// A shape descriptor changed and its graphics were refreshed.
    ShapeChanged { element: Element, gfx: NodeIndex },

    /// A connection descriptor changed and its graphics were refreshed.
    ConnectionChanged { element: Element, gfx: NodeIndex },
}

impl CanvasEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CanvasEvent::CanvasInit { .. } => EventKind::CanvasInit,
            CanvasEvent::ShapeAdded { .. } => EventKind::ShapeAdded,
            CanvasEvent::ConnectionAdded { .. } => EventKind::ConnectionAdded,
            CanvasEvent::ViewboxChanged { .. } => EventKind::ViewboxChanged,
            CanvasEvent::ShapeChanged { .. } => EventKind::ShapeChanged,
            CanvasEvent::ConnectionChanged { .. } => EventKind::ConnectionChanged,
        }
    }

    /// The element id carried by the event, if any.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            CanvasEvent::ShapeAdded { element, .. }
            | CanvasEvent::ConnectionAdded { element, .. }
            | CanvasEvent::ShapeChanged { element, .. }
            | CanvasEvent::ConnectionChanged { element, .. } => Some(element.id),
            CanvasEvent::CanvasInit { .. } | CanvasEvent::ViewboxChanged { .. } => None,
        }
    }
}

type Listener = Box<dyn FnMut(&CanvasEvent)>;

/// Synchronous pub/sub bus for [`CanvasEvent`]s.
///
/// No priorities, no filtering beyond the subscribed kind: listeners fire
/// in registration order and run to completion before `fire` returns.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(Option<EventKind>, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a single event kind.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&CanvasEvent) + 'static) {
        self.listeners.push((Some(kind), Box::new(listener)));
    }

    /// Subscribe to every event kind.
    pub fn on_any(&mut self, listener: impl FnMut(&CanvasEvent) + 'static) {
        self.listeners.push((None, Box::new(listener)));
    }

    /// Fire an event to all matching listeners, in registration order.
    pub fn fire(&mut self, event: &CanvasEvent) {
        log::trace!("fire {:?}", event.kind());
        for (kind, listener) in &mut self.listeners {
            if kind.is_none() || *kind == Some(event.kind()) {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
