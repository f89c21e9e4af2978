pub mod error;
pub mod event;
pub mod id;
pub mod model;
pub mod viewbox;

pub use error::CanvasError;
pub use event::{CanvasEvent, EventBus, EventKind};
pub use id::ElementId;
pub use model::{Element, ElementKind};
pub use viewbox::{Dimensions, Viewbox};

// Re-export petgraph's node handle so downstream crates don't need a
// direct dependency. Graphical nodes are addressed by `NodeIndex`.
pub use petgraph::graph::NodeIndex;
