use ndarray::ArrayView3;

use super::shape::Shape;

/// A single captured frame: contiguous pixel bytes in row-major order.
///
/// Camera frames are RGB (3 channels); face crops handed to the
/// classifier are grayscale (1 channel). Format conversion happens at the
/// I/O boundaries only.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Capture sequence number, assigned by the frame source.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.width, self.height)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.dims(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn dims(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
