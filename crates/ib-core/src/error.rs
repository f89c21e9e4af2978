use crate::id::ElementId;
use thiserror::Error;

/// Errors surfaced by canvas operations.
///
/// All failures are synchronous and deterministic; validation errors are
/// raised before any state mutation, so a failed call leaves no partial
/// side effects behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// A required element property is missing or malformed.
    #[error("invalid element: {0}")]
    Validation(&'static str),

    /// An element with the same id is already registered.
    #[error("element {0} is already registered")]
    DuplicateId(ElementId),

    /// The drawing surface could not create or update a graphical node.
    #[error("graphics creation failed: {0}")]
    GraphicsCreation(String),

    /// Operation on a destroyed canvas.
    #[error("canvas is not initialized")]
    NotInitialized,
}
