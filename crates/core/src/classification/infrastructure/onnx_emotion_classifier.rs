use std::path::Path;

use crate::classification::domain::emotion_classifier::EmotionClassifier;
use crate::shared::frame::Frame;
use crate::shared::onnx_session::{load_session, static_input_shape};
use crate::shared::shape::Shape;

/// Emotion classifier backed by an ONNX Runtime session.
///
/// Input is `[1, 1, H, W]` float32 in [0, 1]; the first output is the score
/// vector.
pub struct OnnxEmotionClassifier {
    session: ort::session::Session,
    input: Shape,
}

impl OnnxEmotionClassifier {
    pub fn new(
        model_path: &Path,
        fallback_input: Shape,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        let input = static_input_shape(&session).unwrap_or(fallback_input);
        log::debug!("Classifier input {input}");
        Ok(Self { session, input })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn input_shape(&self) -> Shape {
        self.input
    }

    fn scores(&mut self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let tensor = face_to_tensor(face, self.input)?;
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("classifier model produced no outputs".into());
        }
        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

fn face_to_tensor(
    face: &Frame,
    expected: Shape,
) -> Result<ndarray::Array4<f32>, Box<dyn std::error::Error>> {
    if face.channels() != 1 || face.shape() != expected {
        return Err(format!(
            "classifier expects a 1-channel {expected} crop, got {}-channel {}",
            face.channels(),
            face.shape()
        )
        .into());
    }
    let (w, h) = (expected.width as usize, expected.height as usize);
    let tensor = ndarray::Array4::from_shape_fn((1, 1, h, w), |(_, _, y, x)| {
        face.data()[y * w + x] as f32 / 255.0
    });
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_to_tensor_layout_and_scale() {
        let mut data = vec![0u8; 4 * 2];
        // row 1, col 3
        data[7] = 255;
        let face = Frame::new(data, 4, 2, 1, 0);
        let tensor = face_to_tensor(&face, Shape::new(4, 2)).unwrap();
        assert_eq!(tensor.shape(), &[1, 1, 2, 4]);
        assert_eq!(tensor[[0, 0, 1, 3]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 3]], 0.0);
    }

    #[test]
    fn test_face_to_tensor_rejects_wrong_size() {
        let face = Frame::new(vec![0u8; 32 * 32], 32, 32, 1, 0);
        assert!(face_to_tensor(&face, Shape::square(64)).is_err());
    }

    #[test]
    fn test_face_to_tensor_rejects_color_crop() {
        let face = Frame::new(vec![0u8; 64 * 64 * 3], 64, 64, 3, 0);
        assert!(face_to_tensor(&face, Shape::square(64)).is_err());
    }
}
