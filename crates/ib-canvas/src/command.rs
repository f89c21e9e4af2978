//! Undoable command execution.
//!
//! Mutations go through registered handlers keyed by [`CommandKind`]; each
//! handler is a `{ execute, revert }` pair over a [`CommandContext`]
//! holding the element descriptor. Executed commands are pushed to a
//! bounded undo stack; undo pops and applies the revert, redo re-executes.

use crate::canvas::CanvasState;
use crate::draw;
use ib_core::{CanvasError, CanvasEvent, Element};
use ib_surface::Attrs;
use std::collections::HashMap;

/// The registered command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AddShape,
    AddConnection,
}

/// Ephemeral record passed to a handler — created per invocation,
/// discarded after execution/undo.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub element: Element,
}

/// A reversible unit of work executed through the command stack.
pub trait CommandHandler {
    fn execute(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError>;
    fn revert(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError>;
}

/// Manages handler registration and the undo/redo stacks.
pub struct CommandStack {
    handlers: HashMap<CommandKind, Box<dyn CommandHandler>>,
    undo_stack: Vec<(CommandKind, CommandContext)>,
    redo_stack: Vec<(CommandKind, CommandContext)>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            handlers: HashMap::new(),
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    pub fn register_handler(&mut self, kind: CommandKind, handler: Box<dyn CommandHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Execute a command through its registered handler and push an undo
    /// record. Handler errors propagate; nothing is pushed on failure.
    pub fn execute(
        &mut self,
        state: &mut CanvasState,
        kind: CommandKind,
        ctx: CommandContext,
    ) -> Result<(), CanvasError> {
        let handler = self
            .handlers
            .get(&kind)
            .ok_or(CanvasError::Validation("no handler registered for command"))?;
        handler.execute(state, &ctx)?;

        self.undo_stack.push((kind, ctx));
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }

        // Clear redo stack on new action
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last command. Returns its kind, or `None` when the stack
    /// is empty.
    pub fn undo(&mut self, state: &mut CanvasState) -> Result<Option<CommandKind>, CanvasError> {
        let Some((kind, ctx)) = self.undo_stack.pop() else {
            return Ok(None);
        };
        self.handlers[&kind].revert(state, &ctx)?;
        self.redo_stack.push((kind, ctx));
        Ok(Some(kind))
    }

    /// Redo the last undone command. Returns its kind, or `None` when the
    /// stack is empty.
    pub fn redo(&mut self, state: &mut CanvasState) -> Result<Option<CommandKind>, CanvasError> {
        let Some((kind, ctx)) = self.redo_stack.pop() else {
            return Ok(None);
        };
        self.handlers[&kind].execute(state, &ctx)?;
        self.undo_stack.push((kind, ctx));
        Ok(Some(kind))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

impl std::fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandStack")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .finish()
    }
}

// ─── Add handlers ────────────────────────────────────────────────────────

/// Registers a shape, creates its group on the paper (parented to the
/// parent's graphics or the root), draws its visual, and fires
/// `ShapeAdded`.
pub struct AddShapeHandler;

impl CommandHandler for AddShapeHandler {
    fn execute(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError> {
        let element = ctx.element.clone();
        let id = element.id;

        let parent_gfx = element
            .parent
            .and_then(|p| state.registry.graphics_of(p))
            .unwrap_or_else(|| state.paper.root());
        let gfx = state.paper.create_group(parent_gfx, Attrs::with_class("shape"))?;
        if let Err(err) = draw::update_shape(&mut state.paper, gfx, &element) {
            state.paper.remove(gfx);
            return Err(err);
        }

        if let Some(parent) = element.parent {
            state.registry.link_child(parent, id);
        }
        state.registry.register(element.clone());
        state.registry.associate(id, gfx);
        state.events.fire(&CanvasEvent::ShapeAdded { element, gfx });
        Ok(())
    }

    fn revert(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError> {
        revert_add(state, ctx)
    }
}

/// Same pattern as [`AddShapeHandler`], keyed on the connection tag:
/// creates a path-like visual routed through the waypoints.
pub struct AddConnectionHandler;

impl CommandHandler for AddConnectionHandler {
    fn execute(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError> {
        let element = ctx.element.clone();
        let id = element.id;

        let parent_gfx = element
            .parent
            .and_then(|p| state.registry.graphics_of(p))
            .unwrap_or_else(|| state.paper.root());
        let gfx = state
            .paper
            .create_group(parent_gfx, Attrs::with_class("connection"))?;
        if let Err(err) = draw::update_connection(&mut state.paper, gfx, &element) {
            state.paper.remove(gfx);
            return Err(err);
        }

        if let Some(parent) = element.parent {
            state.registry.link_child(parent, id);
        }
        state.registry.register(element.clone());
        state.registry.associate(id, gfx);
        state.events.fire(&CanvasEvent::ConnectionAdded { element, gfx });
        Ok(())
    }

    fn revert(&self, state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError> {
        revert_add(state, ctx)
    }
}

/// Symmetric teardown for both add handlers: destroy graphics, drop the
/// registration and the parent's child link. Fires no event — the event
/// vocabulary has no removal kinds.
fn revert_add(state: &mut CanvasState, ctx: &CommandContext) -> Result<(), CanvasError> {
    let id = ctx.element.id;
    if let Some(gfx) = state.registry.graphics_of(id) {
        state.paper.remove(gfx);
    }
    if let Some(element) = state.registry.unregister(id) {
        if let Some(parent) = element.parent {
            state.registry.unlink_child(parent, id);
        }
    }
    log::debug!("reverted add of {id}");
    Ok(())
}
