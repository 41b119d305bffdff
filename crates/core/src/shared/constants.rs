use super::shape::Shape;

pub const DETECTOR_MODEL_NAME: &str = "face_grid_detector.onnx";
pub const CLASSIFIER_MODEL_NAME: &str = "emotion_classifier.onnx";

/// Resolution the detector network expects (frames are stretched, not letterboxed).
pub const DETECTION_SHAPE: Shape = Shape::square(320);

/// Resolution of the grayscale face crop fed to the emotion classifier.
pub const CLASSIFIER_SHAPE: Shape = Shape::square(64);

/// Minimum detection confidence for a face to be classified.
pub const DETECTION_THRESHOLD: f64 = 0.4;

/// Detector grid: S x S cells with B candidate boxes per cell.
pub const GRID_SIZE: usize = 5;
pub const BOXES_PER_CELL: usize = 2;

/// Display quit-poll timeout between frames.
pub const QUIT_POLL_MS: u64 = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
