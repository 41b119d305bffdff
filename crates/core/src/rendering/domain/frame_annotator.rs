use crate::classification::domain::emotion::Emotion;
use crate::detection::domain::bounding_box::PixelBox;
use crate::shared::frame::Frame;

/// What gets drawn for one classified face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overlay {
    /// Already rescaled and clipped to the frame.
    pub region: PixelBox,
    pub emotion: Emotion,
}

/// Domain interface for drawing the overlay onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`) and must leave
/// pixels outside the box and its label untouched.
pub trait FrameAnnotator {
    fn annotate(&self, frame: &mut Frame, overlay: &Overlay)
        -> Result<(), Box<dyn std::error::Error>>;
}
