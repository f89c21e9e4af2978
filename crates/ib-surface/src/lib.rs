pub mod node;
pub mod paper;
pub mod svg;

pub use node::{Attrs, NodeKind, SurfaceNode};
pub use paper::Paper;
