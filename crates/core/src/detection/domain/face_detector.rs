use crate::shared::frame::Frame;
use crate::shared::shape::Shape;

use super::detection::Detection;

/// Domain interface for face detection.
///
/// Implementations resize the frame to their own input resolution, so the
/// returned geometry is in detector-input pixels, not frame pixels.
pub trait FaceDetector: Send {
    /// Resolution the detector runs at.
    fn input_shape(&self) -> Shape;

    /// All candidate boxes, unfiltered. Selecting and thresholding is the
    /// caller's job.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
