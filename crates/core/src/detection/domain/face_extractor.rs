use ndarray::s;
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::shape::Shape;

use super::bounding_box::{CenterBox, PixelBox};

#[derive(Error, Debug, PartialEq)]
pub enum ExtractError {
    #[error("crop region {0:?} has zero area")]
    EmptyRegion(PixelBox),
    #[error("crop region {region:?} lies outside the {frame} frame")]
    OutOfBounds { region: PixelBox, frame: Shape },
    #[error("cannot extract a face from a {0}-channel frame")]
    UnsupportedChannels(u8),
}

/// Crop region in original-frame pixels for a detection made at
/// `detector` resolution.
///
/// Corners, then a square with side equal to the box height, then rescale
/// to `frame` (truncating), then clip to the frame.
pub fn face_crop_region(detection: &CenterBox, detector: Shape, frame: Shape) -> PixelBox {
    detection
        .to_corners()
        .square_from_height()
        .rescale(detector, frame)
        .clip(frame)
}

/// Box drawn on screen for a detection: the detector box itself (not
/// squared) mapped onto the frame.
pub fn display_region(detection: &CenterBox, detector: Shape, frame: Shape) -> PixelBox {
    detection.to_corners().rescale(detector, frame).clip(frame)
}

/// Cuts the face out of a full-resolution frame and prepares it for the
/// classifier: slice, bilinear resize to `target`, grayscale.
pub struct FaceExtractor {
    target: Shape,
}

impl FaceExtractor {
    pub fn new(target: Shape) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Shape {
        self.target
    }

    /// Returns a single-channel frame of the target size carrying the
    /// source frame's index.
    pub fn extract(&self, frame: &Frame, region: PixelBox) -> Result<Frame, ExtractError> {
        if region.is_empty() {
            return Err(ExtractError::EmptyRegion(region));
        }
        let shape = frame.shape();
        if region.x_min < 0
            || region.y_min < 0
            || region.x_max > shape.width as i32
            || region.y_max > shape.height as i32
            || region.width() < 0
            || region.height() < 0
        {
            return Err(ExtractError::OutOfBounds {
                region,
                frame: shape,
            });
        }

        let (x0, y0) = (region.x_min as usize, region.y_min as usize);
        let (x1, y1) = (region.x_max as usize, region.y_max as usize);
        let crop_w = (x1 - x0) as u32;
        let crop_h = (y1 - y0) as u32;

        let src = frame.as_ndarray();
        let pixels: Vec<u8> = src.slice(s![y0..y1, x0..x1, ..]).iter().copied().collect();

        let filter = image::imageops::FilterType::Triangle;
        let gray = match frame.channels() {
            3 => {
                let crop = image::RgbImage::from_raw(crop_w, crop_h, pixels)
                    .ok_or(ExtractError::UnsupportedChannels(3))?;
                let resized =
                    image::imageops::resize(&crop, self.target.width, self.target.height, filter);
                image::imageops::grayscale(&resized)
            }
            1 => {
                let crop = image::GrayImage::from_raw(crop_w, crop_h, pixels)
                    .ok_or(ExtractError::UnsupportedChannels(1))?;
                image::imageops::resize(&crop, self.target.width, self.target.height, filter)
            }
            other => return Err(ExtractError::UnsupportedChannels(other)),
        };

        Ok(Frame::new(
            gray.into_raw(),
            self.target.width,
            self.target.height,
            1,
            frame.index(),
        ))
    }
}
