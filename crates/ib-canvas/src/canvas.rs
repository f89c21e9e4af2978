//! The canvas: sole owner of the drawing surface and view state.
//!
//! A canvas instance owns its paper tree, root transform, registry, event
//! bus, and container size — nothing is shared across instances. All
//! operations are synchronous and run to completion before returning;
//! event listeners fire inline, in registration order.

use crate::command::{
    AddConnectionHandler, AddShapeHandler, CommandContext, CommandKind, CommandStack,
};
use crate::draw;
use crate::registry::ElementRegistry;
use crate::viewbox::{self, round_scale};
use ib_core::{
    CanvasError, CanvasEvent, Dimensions, Element, ElementId, EventBus, EventKind, NodeIndex,
    Viewbox,
};
use ib_surface::Paper;
use kurbo::{Point, Rect, Vec2};

const DEFAULT_UNDO_DEPTH: usize = 100;

/// Zoom write target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zoom {
    /// An absolute scale factor.
    Level(f64),
    /// `min(1, container width / diagram width)` — shrink to fit, never
    /// enlarge past natural size.
    FitViewport,
}

/// Anchor for a zoom write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomCenter {
    /// The container midpoint.
    Auto,
    /// A fixed point in current screen coordinates.
    Point(Point),
}

/// The mutable canvas internals handed to command handlers.
#[derive(Debug)]
pub struct CanvasState {
    pub paper: Paper,
    pub registry: ElementRegistry,
    pub events: EventBus,
    /// Container client size — the authority for the viewbox `outer` box.
    pub container: Dimensions,
}

impl CanvasState {
    pub fn new(container: Dimensions) -> Self {
        Self {
            paper: Paper::new(),
            registry: ElementRegistry::new(),
            events: EventBus::new(),
            container,
        }
    }

    /// Recompute the viewbox snapshot from the root transform.
    fn viewbox(&self) -> Viewbox {
        let root = self.paper.root();
        let inner = self
            .paper
            .bbox_isolated(root)
            .map(|b| Dimensions::new(b.width(), b.height()))
            .unwrap_or(Dimensions::new(0.0, 0.0));
        viewbox::viewbox_from_transform(self.paper.transform(root), inner, self.container)
    }

    fn fire_viewbox_changed(&mut self) {
        let viewbox = self.viewbox();
        self.events.fire(&CanvasEvent::ViewboxChanged { viewbox });
    }
}

/// An SVG-backed diagram canvas.
#[derive(Debug)]
pub struct Canvas {
    state: Option<CanvasState>,
    commands: CommandStack,
}

impl Canvas {
    pub fn new(container: Dimensions) -> Self {
        Self::with_event_bus(container, EventBus::new())
    }

    /// Build a canvas over a pre-populated event bus, so listeners
    /// registered beforehand observe the init event.
    pub fn with_event_bus(container: Dimensions, events: EventBus) -> Self {
        let mut state = CanvasState {
            paper: Paper::new(),
            registry: ElementRegistry::new(),
            events,
            container,
        };
        let mut commands = CommandStack::new(DEFAULT_UNDO_DEPTH);
        commands.register_handler(CommandKind::AddShape, Box::new(AddShapeHandler));
        commands.register_handler(CommandKind::AddConnection, Box::new(AddConnectionHandler));

        let root = state.paper.root();
        state.events.fire(&CanvasEvent::CanvasInit { root });
        log::debug!("canvas initialized ({}x{})", container.width, container.height);

        Self {
            state: Some(state),
            commands,
        }
    }

    fn state(&self) -> Result<&CanvasState, CanvasError> {
        self.state.as_ref().ok_or(CanvasError::NotInitialized)
    }

    fn state_mut(&mut self) -> Result<&mut CanvasState, CanvasError> {
        self.state.as_mut().ok_or(CanvasError::NotInitialized)
    }

    /// Subscribe to a single event kind.
    pub fn on(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&CanvasEvent) + 'static,
    ) -> Result<(), CanvasError> {
        self.state_mut()?.events.on(kind, listener);
        Ok(())
    }

    /// Subscribe to every event kind.
    pub fn on_any(
        &mut self,
        listener: impl FnMut(&CanvasEvent) + 'static,
    ) -> Result<(), CanvasError> {
        self.state_mut()?.events.on_any(listener);
        Ok(())
    }

    // ─── Element operations ──────────────────────────────────────────────

    /// Add a shape through the command stack. Validates the id before any
    /// state is touched; emits `ShapeAdded` once graphics exist.
    pub fn add_shape(&mut self, element: Element) -> Result<&mut Self, CanvasError> {
        let state = self.state.as_mut().ok_or(CanvasError::NotInitialized)?;
        if element.is_connection() {
            return Err(CanvasError::Validation("add_shape requires a shape element"));
        }
        validate_new_id(state, &element)?;
        self.commands
            .execute(state, CommandKind::AddShape, CommandContext { element })?;
        Ok(self)
    }

    /// Add a connection through the command stack. Validates the id before
    /// any state is touched; emits `ConnectionAdded` once graphics exist.
    pub fn add_connection(&mut self, element: Element) -> Result<&mut Self, CanvasError> {
        let state = self.state.as_mut().ok_or(CanvasError::NotInitialized)?;
        if !element.is_connection() {
            return Err(CanvasError::Validation(
                "add_connection requires a connection element",
            ));
        }
        validate_new_id(state, &element)?;
        self.commands
            .execute(state, CommandKind::AddConnection, CommandContext { element })?;
        Ok(self)
    }

    /// The registered descriptor for an id, if any.
    pub fn element(&self, id: ElementId) -> Result<Option<&Element>, CanvasError> {
        Ok(self.state()?.registry.get_by_id(id))
    }

    /// The element's graphical node. `Ok(None)` for unregistered ids —
    /// not an error, callers must check.
    pub fn graphics_of(&self, id: ElementId) -> Result<Option<NodeIndex>, CanvasError> {
        Ok(self.state()?.registry.graphics_of(id))
    }

    /// The root drawing-surface node.
    pub fn root(&self) -> Result<NodeIndex, CanvasError> {
        Ok(self.state()?.paper.root())
    }

    /// Read access to the drawing surface.
    pub fn paper(&self) -> Result<&Paper, CanvasError> {
        Ok(&self.state()?.paper)
    }

    /// Current container client size. Read fresh on every call — the
    /// container may have been resized in between.
    pub fn size(&self) -> Result<Dimensions, CanvasError> {
        Ok(self.state()?.container)
    }

    pub fn set_size(&mut self, container: Dimensions) -> Result<(), CanvasError> {
        self.state_mut()?.container = container;
        Ok(())
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Reorder the element's graphics to be the last child of its
    /// graphical parent (topmost in paint order). With `bubble`, ancestors
    /// are sent to front first; children are then re-appended in their
    /// original order. No-op for elements without graphics.
    pub fn send_to_front(&mut self, id: ElementId, bubble: bool) -> Result<(), CanvasError> {
        send_to_front_inner(self.state_mut()?, id, bubble)
    }

    // ─── View state ──────────────────────────────────────────────────────

    /// Recompute and return the current viewbox snapshot.
    pub fn viewbox(&self) -> Result<Viewbox, CanvasError> {
        Ok(self.state()?.viewbox())
    }

    /// Replace the root transform so `region` fully fills the container
    /// (cover-fit: `max` of the per-axis ratios, possibly cropping one
    /// axis). Does not compose with the prior transform. Returns the
    /// input region unchanged.
    pub fn set_viewbox(&mut self, region: Rect) -> Result<Rect, CanvasError> {
        let state = self.state_mut()?;
        let root = state.paper.root();
        let transform = viewbox::viewbox_transform(region, state.container);
        state.paper.set_transform(root, transform);
        state.fire_viewbox_changed();
        Ok(region)
    }

    /// The current root translation in container pixels.
    pub fn scroll(&self) -> Result<Point, CanvasError> {
        let state = self.state()?;
        let [.., e, f] = state.paper.transform(state.paper.root()).as_coeffs();
        Ok(Point::new(e, f))
    }

    /// Translate the view by a screen-space delta and return the
    /// resulting translation.
    pub fn scroll_by(&mut self, delta: Vec2) -> Result<Point, CanvasError> {
        let state = self.state_mut()?;
        let root = state.paper.root();
        let next = viewbox::scroll_transform(state.paper.transform(root), delta.x, delta.y);
        state.paper.set_transform(root, next);
        state.fire_viewbox_changed();
        let [.., e, f] = next.as_coeffs();
        Ok(Point::new(e, f))
    }

    /// The current zoom level (3-decimal precision).
    pub fn zoom(&self) -> Result<f64, CanvasError> {
        Ok(self.state()?.viewbox().scale)
    }

    /// Zoom to a target level, optionally anchored at a center point (see
    /// [`ZoomCenter`]). Returns the resulting rounded scale.
    pub fn set_zoom(
        &mut self,
        zoom: Zoom,
        center: Option<ZoomCenter>,
    ) -> Result<f64, CanvasError> {
        let state = self.state_mut()?;
        let root = state.paper.root();
        let vbox = state.viewbox();

        let target = match zoom {
            Zoom::Level(scale) => scale,
            Zoom::FitViewport => viewbox::fit_viewport_scale(vbox.inner, vbox.outer),
        };
        let center = center.map(|c| match c {
            ZoomCenter::Auto => Point::new(
                state.container.width / 2.0,
                state.container.height / 2.0,
            ),
            ZoomCenter::Point(p) => p,
        });

        let next = viewbox::zoom_transform(state.paper.transform(root), target, center);
        state.paper.set_transform(root, next);
        state.fire_viewbox_changed();
        Ok(round_scale(next.as_coeffs()[0]))
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Map an element's bounding box into container coordinates under the
    /// current viewbox. Any transform baked into the node itself is
    /// applied to its isolated box first, then the viewbox scale/offset.
    pub fn absolute_bbox(&self, id: ElementId) -> Result<Option<Rect>, CanvasError> {
        let state = self.state()?;
        let Some(gfx) = state.registry.graphics_of(id) else {
            return Ok(None);
        };
        let Some(local) = state.paper.bbox_isolated(gfx) else {
            return Ok(None);
        };
        let vbox = state.viewbox();

        let model = state.paper.transform(gfx).transform_rect_bbox(local);
        let x = model.x0 * vbox.scale - vbox.x * vbox.scale;
        let y = model.y0 * vbox.scale - vbox.y * vbox.scale;
        Ok(Some(Rect::new(
            x,
            y,
            x + model.width() * vbox.scale,
            y + model.height() * vbox.scale,
        )))
    }

    // ─── Reactive re-render ──────────────────────────────────────────────

    /// Element-changed dispatch: refresh the element's visual from its
    /// descriptor and fire the kind-specific changed event. Unregistered
    /// ids are ignored.
    pub fn element_changed(&mut self, id: ElementId) -> Result<(), CanvasError> {
        let state = self.state_mut()?;
        let Some(element) = state.registry.get_by_id(id).cloned() else {
            return Ok(());
        };
        let Some(gfx) = state.registry.graphics_of(id) else {
            return Ok(());
        };

        if element.is_connection() {
            draw::update_connection(&mut state.paper, gfx, &element)?;
            state
                .events
                .fire(&CanvasEvent::ConnectionChanged { element, gfx });
        } else {
            draw::update_shape(&mut state.paper, gfx, &element)?;
            state.events.fire(&CanvasEvent::ShapeChanged { element, gfx });
        }
        Ok(())
    }

    /// Mutate a registered descriptor in place, then run the changed
    /// dispatch. The closure must not change the element's id.
    pub fn update_element(
        &mut self,
        id: ElementId,
        mutate: impl FnOnce(&mut Element),
    ) -> Result<(), CanvasError> {
        {
            let state = self.state_mut()?;
            let Some(element) = state.registry.get_by_id_mut(id) else {
                return Ok(());
            };
            mutate(element);
        }
        self.element_changed(id)
    }

    // ─── Command stack ───────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<Option<CommandKind>, CanvasError> {
        let state = self.state.as_mut().ok_or(CanvasError::NotInitialized)?;
        self.commands.undo(state)
    }

    pub fn redo(&mut self) -> Result<Option<CommandKind>, CanvasError> {
        let state = self.state.as_mut().ok_or(CanvasError::NotInitialized)?;
        self.commands.redo(state)
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    // ─── Teardown ────────────────────────────────────────────────────────

    /// Serialize the surface tree for inspection.
    pub fn to_svg(&self) -> Result<String, CanvasError> {
        Ok(self.state()?.paper.to_svg())
    }

    /// Tear down the canvas: drop the surface tree and every root-node
    /// reference. Subsequent operations fail with `NotInitialized`.
    pub fn destroy(&mut self) {
        log::debug!("canvas destroyed");
        self.state = None;
    }
}

fn validate_new_id(state: &CanvasState, element: &Element) -> Result<(), CanvasError> {
    if element.id.is_empty() {
        return Err(CanvasError::Validation("element id must be non-empty"));
    }
    if state.registry.contains(element.id) {
        return Err(CanvasError::DuplicateId(element.id));
    }
    Ok(())
}

fn send_to_front_inner(
    state: &mut CanvasState,
    id: ElementId,
    bubble: bool,
) -> Result<(), CanvasError> {
    let Some(gfx) = state.registry.graphics_of(id) else {
        return Ok(());
    };
    let Some(element) = state.registry.get_by_id(id) else {
        return Ok(());
    };
    let parent = element.parent;
    let children = element.children.clone();

    // Ancestors first, so the whole chain ends up topmost; children are
    // re-appended in original order inside this element's already-placed
    // group.
    if bubble
        && let Some(parent) = parent
    {
        send_to_front_inner(state, parent, true)?;
    }
    for child in children {
        send_to_front_inner(state, child, false)?;
    }

    if let Some(parent_gfx) = state.paper.parent(gfx) {
        state.paper.append_child(parent_gfx, gfx)?;
    }
    Ok(())
}
