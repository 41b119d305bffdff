/// Grid face detector using ONNX Runtime via `ort`.
///
/// Handles stretch-resize preprocessing, inference, and hands the raw grid
/// tensor to the domain's `GridDecoder`.
use std::path::Path;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::grid_decoder::{GridDecoder, GridSpec};
use crate::shared::frame::Frame;
use crate::shared::onnx_session::{load_session, static_input_shape};
use crate::shared::shape::Shape;

/// Grid detector backed by an ONNX Runtime session.
pub struct OnnxGridDetector {
    session: ort::session::Session,
    decoder: GridDecoder,
    input: Shape,
}

impl OnnxGridDetector {
    /// Load a detector model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting
    /// NCHW). `fallback_input` is used when the shape is dynamic.
    pub fn new(
        model_path: &Path,
        spec: GridSpec,
        fallback_input: Shape,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        let input = static_input_shape(&session).unwrap_or(fallback_input);
        if input != fallback_input {
            log::info!("Detector model declares {input} input, overriding {fallback_input}");
        }

        Ok(Self {
            session,
            decoder: GridDecoder::new(spec, input),
            input,
        })
    }
}

impl FaceDetector for OnnxGridDetector {
    fn input_shape(&self) -> Shape {
        self.input
    }

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let input_tensor = stretch_to_tensor(frame, self.input)?;

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("detector model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;

        Ok(self.decoder.decode(tensor.view())?)
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize a frame to exactly `target` (aspect ratio is not kept) and
/// normalize to an NCHW float32 tensor in [0, 1].
///
/// Detections come back in `target` pixels; the caller rescales per axis.
fn stretch_to_tensor(
    frame: &Frame,
    target: Shape,
) -> Result<ndarray::Array4<f32>, Box<dyn std::error::Error>> {
    if frame.channels() != 3 {
        return Err(format!("detector expects 3 channels, got {}", frame.channels()).into());
    }
    let image = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or("frame buffer does not match its dimensions")?;
    let resized = if frame.shape() == target {
        image
    } else {
        image::imageops::resize(
            &image,
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        )
    };

    let (w, h) = (target.width as usize, target.height as usize);
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, h, w));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }
    Ok(tensor)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
