use serde::{Deserialize, Serialize};

/// Width and height of a pixel grid: a captured frame, a model input, or
/// a crop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
}

impl Shape {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Per-axis `(x, y)` factors that map coordinates in `self` onto `to`.
    pub fn scale_to(&self, to: Shape) -> (f64, f64) {
        (
            to.width as f64 / self.width as f64,
            to.height as f64 / self.height as f64,
        )
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
