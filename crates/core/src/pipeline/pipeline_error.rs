use std::fmt;

use thiserror::Error;

use crate::detection::domain::face_extractor::ExtractError;

use super::pipeline_config::ConfigError;

/// Which model failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelStage {
    Detector,
    Classifier,
}

impl fmt::Display for ModelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelStage::Detector => f.write_str("detector"),
            ModelStage::Classifier => f.write_str("classifier"),
        }
    }
}

/// Fatal loop failures. Anything recoverable is handled per frame and never
/// surfaces here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open frame source: {0}")]
    SourceOpen(#[source] Box<dyn std::error::Error>),
    #[error("failed to open display: {0}")]
    DisplayOpen(#[source] Box<dyn std::error::Error>),
    #[error("{stage} failed on frame {frame}: {source}")]
    ModelExecution {
        stage: ModelStage,
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("face extraction failed on frame {frame}: {source}")]
    Extraction {
        frame: usize,
        #[source]
        source: ExtractError,
    },
    #[error("annotation failed on frame {frame}: {source}")]
    Annotation {
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("display failed on frame {frame}: {source}")]
    Display {
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("failed to close display: {0}")]
    DisplayClose(#[source] Box<dyn std::error::Error>),
}
