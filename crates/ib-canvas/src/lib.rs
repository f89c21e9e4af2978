pub mod canvas;
pub mod command;
pub mod draw;
pub mod registry;
pub mod viewbox;

pub use canvas::{Canvas, CanvasState, Zoom, ZoomCenter};
pub use command::{
    AddConnectionHandler, AddShapeHandler, CommandContext, CommandHandler, CommandKind,
    CommandStack,
};
pub use registry::ElementRegistry;

// Re-export the model and event vocabulary so most callers only need
// this crate.
pub use ib_core::{
    CanvasError, CanvasEvent, Dimensions, Element, ElementId, ElementKind, EventBus, EventKind,
    NodeIndex, Viewbox,
};
pub use ib_surface::Paper;
