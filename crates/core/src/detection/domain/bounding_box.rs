//! Bounding-box representations and the coordinate transforms between
//! detector space and original-frame space.
//!
//! Boxes stay in absolute, floating-point pixels until they are rescaled
//! onto a different pixel grid. `rescale` is the only place coordinates
//! become integers, and it always truncates toward zero.

use crate::shared::shape::Shape;

/// Center/size encoding, as produced by the grid decoder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// Corner encoding in floating-point pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

/// Corner encoding in integer pixels of a concrete frame.
///
/// `x_max`/`y_max` are exclusive when used for slicing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl CenterBox {
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
        }
    }

    pub fn to_corners(&self) -> CornerBox {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        CornerBox {
            x_min: self.x_center - half_w,
            y_min: self.y_center - half_h,
            x_max: self.x_center + half_w,
            y_max: self.y_center + half_h,
        }
    }
}

impl CornerBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn to_center_size(&self) -> CenterBox {
        CenterBox {
            x_center: (self.x_min + self.x_max) / 2.0,
            y_center: (self.y_min + self.y_max) / 2.0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Square box whose side is this box's height, centered on its
    /// horizontal center. Vertical bounds are kept as-is.
    ///
    /// Height is the steadier dimension for an upright face.
    pub fn square_from_height(&self) -> CornerBox {
        let center_x = (self.x_min + self.x_max) / 2.0;
        let half_side = self.height() / 2.0;
        CornerBox {
            x_min: center_x - half_side,
            y_min: self.y_min,
            x_max: center_x + half_side,
            y_max: self.y_max,
        }
    }

    /// Maps the box from the `from` pixel grid onto the `to` grid, scaling
    /// each axis independently and truncating toward zero.
    pub fn rescale(&self, from: Shape, to: Shape) -> PixelBox {
        let (sx, sy) = from.scale_to(to);
        PixelBox {
            x_min: (self.x_min * sx) as i32,
            y_min: (self.y_min * sy) as i32,
            x_max: (self.x_max * sx) as i32,
            y_max: (self.y_max * sy) as i32,
        }
    }
}

impl PixelBox {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    /// True when the box covers no pixels on at least one axis.
    pub fn is_empty(&self) -> bool {
        self.x_min == self.x_max || self.y_min == self.y_max
    }

    pub fn to_corners(&self) -> CornerBox {
        CornerBox {
            x_min: self.x_min as f64,
            y_min: self.y_min as f64,
            x_max: self.x_max as f64,
            y_max: self.y_max as f64,
        }
    }

    pub fn rescale(&self, from: Shape, to: Shape) -> PixelBox {
        self.to_corners().rescale(from, to)
    }

    /// Clamps every coordinate into `[0, dimension)` of `frame`, per axis.
    ///
    /// A box lying entirely outside the frame collapses onto the nearest
    /// edge with zero extent. `min <= max` holds on return.
    pub fn clip(&self, frame: Shape) -> PixelBox {
        let max_x = (frame.width as i32 - 1).max(0);
        let max_y = (frame.height as i32 - 1).max(0);
        let x_min = self.x_min.clamp(0, max_x);
        let y_min = self.y_min.clamp(0, max_y);
        PixelBox {
            x_min,
            y_min,
            x_max: self.x_max.clamp(0, max_x).max(x_min),
            y_max: self.y_max.clamp(0, max_y).max(y_min),
        }
    }
}
