//! Decodes YOLO-style grid output into detections.
//!
//! The detector divides its input into `S x S` cells; every cell predicts
//! `B` boxes of five values each: `x, y, w, h, confidence`. `x`/`y` are
//! offsets from the cell's top-left corner in cell units. Channels beyond
//! `5 * B` (class scores) are ignored.

use ndarray::{ArrayViewD, Axis, Ix3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{BOXES_PER_CELL, GRID_SIZE};
use crate::shared::shape::Shape;

use super::bounding_box::CenterBox;
use super::detection::Detection;

/// Values per predicted box: x, y, w, h, confidence.
const VALUES_PER_BOX: usize = 5;

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("expected a rank 3 or 4 detector tensor, got shape {0:?}")]
    UnexpectedRank(Vec<usize>),
    #[error("detector tensor {actual:?} does not hold a {grid}x{grid} grid")]
    GridMismatch { grid: usize, actual: Vec<usize> },
    #[error("detector tensor has {channels} channels per cell, need at least {required}")]
    TooFewChannels { channels: usize, required: usize },
}

/// Where the per-cell channels sit in the output tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// `[1, C, S, S]`
    ChannelsFirst,
    /// `[1, S, S, C]`
    ChannelsLast,
}

/// How the model encodes box width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeUnits {
    /// Already in detector-input pixels.
    Pixels,
    /// Fraction of the detector input; multiplied by the input size.
    InputFraction,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub grid_size: usize,
    pub boxes_per_cell: usize,
    pub layout: TensorLayout,
    pub size_units: SizeUnits,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            boxes_per_cell: BOXES_PER_CELL,
            layout: TensorLayout::ChannelsFirst,
            size_units: SizeUnits::Pixels,
        }
    }
}

pub struct GridDecoder {
    spec: GridSpec,
    input: Shape,
}

impl GridDecoder {
    pub fn new(spec: GridSpec, input: Shape) -> Self {
        Self { spec, input }
    }

    /// Decodes every box of every cell, in row-major cell order then box
    /// order. The order is what makes tie-breaking in
    /// [`select_best`](super::detection::select_best) deterministic.
    pub fn decode(&self, tensor: ArrayViewD<'_, f32>) -> Result<Vec<Detection>, DecodeError> {
        let s = self.spec.grid_size;
        let b = self.spec.boxes_per_cell;
        let required = b * VALUES_PER_BOX;

        let full_shape = tensor.shape().to_vec();
        let cells = match tensor.ndim() {
            4 if full_shape[0] >= 1 => tensor.index_axis_move(Axis(0), 0),
            3 => tensor,
            _ => return Err(DecodeError::UnexpectedRank(full_shape)),
        };
        let cells = cells
            .into_dimensionality::<Ix3>()
            .map_err(|_| DecodeError::UnexpectedRank(full_shape.clone()))?;

        let (grid_h, grid_w, channels) = match self.spec.layout {
            TensorLayout::ChannelsFirst => (cells.shape()[1], cells.shape()[2], cells.shape()[0]),
            TensorLayout::ChannelsLast => (cells.shape()[0], cells.shape()[1], cells.shape()[2]),
        };
        if grid_h != s || grid_w != s {
            return Err(DecodeError::GridMismatch {
                grid: s,
                actual: cells.shape().to_vec(),
            });
        }
        if channels < required {
            return Err(DecodeError::TooFewChannels { channels, required });
        }

        let value = |channel: usize, row: usize, col: usize| -> f64 {
            let v = match self.spec.layout {
                TensorLayout::ChannelsFirst => cells[[channel, row, col]],
                TensorLayout::ChannelsLast => cells[[row, col, channel]],
            };
            v as f64
        };

        let cell_w = self.input.width as f64 / s as f64;
        let cell_h = self.input.height as f64 / s as f64;
        let (size_x, size_y) = match self.spec.size_units {
            SizeUnits::Pixels => (1.0, 1.0),
            SizeUnits::InputFraction => (self.input.width as f64, self.input.height as f64),
        };

        let mut detections = Vec::with_capacity(s * s * b);
        for row in 0..s {
            for col in 0..s {
                for slot in 0..b {
                    let base = slot * VALUES_PER_BOX;
                    let x_center = (col as f64 + value(base, row, col)) * cell_w;
                    let y_center = (row as f64 + value(base + 1, row, col)) * cell_h;
                    let width = value(base + 2, row, col) * size_x;
                    let height = value(base + 3, row, col) * size_y;
                    detections.push(Detection {
                        bbox: CenterBox::new(x_center, y_center, width, height),
                        confidence: value(base + 4, row, col),
                        row,
                        col,
                        slot,
                    });
                }
            }
        }
        Ok(detections)
    }
}
