use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::grid_decoder::GridSpec;
use crate::shared::constants::{
    CLASSIFIER_SHAPE, DETECTION_SHAPE, DETECTION_THRESHOLD, QUIT_POLL_MS,
};
use crate::shared::shape::Shape;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("threshold must be within [0, 1], got {0}")]
    Threshold(f64),
    #[error("{field} must be non-empty, got {shape}")]
    EmptyShape { field: &'static str, shape: Shape },
    #[error("grid_size must be at least 1")]
    EmptyGrid,
    #[error("boxes_per_cell must be at least 1")]
    NoBoxes,
}

/// Tunables of the inference loop.
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum detection confidence to classify a face (inclusive).
    pub threshold: f64,
    /// Used when the detector model does not declare a static input.
    pub detector_input: Shape,
    /// Used when the classifier model does not declare a static input.
    pub classifier_input: Shape,
    pub grid: GridSpec,
    pub quit_poll_ms: u64,
    /// Stop after this many frames.
    pub max_frames: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: DETECTION_THRESHOLD,
            detector_input: DETECTION_SHAPE,
            classifier_input: CLASSIFIER_SHAPE,
            grid: GridSpec::default(),
            quit_poll_ms: QUIT_POLL_MS,
            max_frames: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        for (field, shape) in [
            ("detector_input", self.detector_input),
            ("classifier_input", self.classifier_input),
        ] {
            if shape.is_empty() {
                return Err(ConfigError::EmptyShape { field, shape });
            }
        }
        if self.grid.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.grid.boxes_per_cell == 0 {
            return Err(ConfigError::NoBoxes);
        }
        Ok(())
    }

    pub fn quit_poll(&self) -> Duration {
        Duration::from_millis(self.quit_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::grid_decoder::{SizeUnits, TensorLayout};
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.threshold, 0.4);
        assert_eq!(config.detector_input, Shape::square(320));
        assert_eq!(config.classifier_input, Shape::square(64));
        assert_eq!(config.grid.grid_size, 5);
        assert_eq!(config.grid.boxes_per_cell, 2);
        assert_eq!(config.grid.layout, TensorLayout::ChannelsFirst);
        assert_eq!(config.grid.size_units, SizeUnits::Pixels);
        assert_eq!(config.quit_poll(), Duration::from_millis(1));
        assert_eq!(config.max_frames, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            PipelineConfig::from_json_str("{}").unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "threshold": 0.6,
                "detector_input": {"width": 416, "height": 416},
                "grid": {"layout": "channels_last", "size_units": "input_fraction"},
                "max_frames": 100
            }"#,
        )
        .unwrap();
        assert_eq!(config.threshold, 0.6);
        assert_eq!(config.detector_input, Shape::square(416));
        assert_eq!(config.grid.layout, TensorLayout::ChannelsLast);
        assert_eq!(config.grid.size_units, SizeUnits::InputFraction);
        assert_eq!(config.grid.grid_size, 5);
        assert_eq!(config.max_frames, Some(100));
        assert_eq!(config.classifier_input, Shape::square(64));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            PipelineConfig::from_json_str(r#"{"treshold": 0.5}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodlens.json");
        std::fs::write(&path, r#"{"quit_poll_ms": 5}"#).unwrap();
        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.quit_poll(), Duration::from_millis(5));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&dir.path().join("absent.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn test_threshold_out_of_range(#[case] threshold: f64) {
        let config = PipelineConfig {
            threshold,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Threshold(_))));
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn test_threshold_bounds_are_inclusive(#[case] threshold: f64) {
        let config = PipelineConfig {
            threshold,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_shape_rejected() {
        let config = PipelineConfig {
            classifier_input: Shape::new(64, 0),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyShape {
                field: "classifier_input",
                ..
            })
        ));
    }

    #[test]
    fn test_degenerate_grid_rejected() {
        let mut config = PipelineConfig::default();
        config.grid.grid_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid)));

        let mut config = PipelineConfig::default();
        config.grid.boxes_per_cell = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoBoxes)));
    }
}
