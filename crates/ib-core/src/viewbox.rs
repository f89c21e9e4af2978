use serde::{Deserialize, Serialize};

/// Width/height pair for a measured region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// The rectangular region of model space currently visible, plus derived
/// scale/size metadata.
///
/// A viewbox is a snapshot recomputed on every read from the root node's
/// transform matrix — it is never stored canvas state. `inner` is the
/// diagram's untransformed bounding size, `outer` the container's client
/// size at read time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewbox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub inner: Dimensions,
    pub outer: Dimensions,
}
