use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::shape::Shape;

use super::emotion::Emotion;

#[derive(Error, Debug, PartialEq)]
pub enum ClassificationError {
    #[error("classifier returned {actual} scores, expected {expected}")]
    ScoreCount { expected: usize, actual: usize },
    #[error("classifier returned no comparable score")]
    NoFiniteScore,
}

/// Domain interface for emotion classification of a prepared face crop.
pub trait EmotionClassifier: Send {
    /// Size of the single-channel crop the classifier expects.
    fn input_shape(&self) -> Shape;

    /// Raw per-label scores, in [`Emotion::ALL`] order.
    fn scores(&mut self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}

/// Arg-max over the score vector. The first maximum wins on ties.
pub fn emotion_from_scores(scores: &[f32]) -> Result<Emotion, ClassificationError> {
    if scores.len() != Emotion::ALL.len() {
        return Err(ClassificationError::ScoreCount {
            expected: Emotion::ALL.len(),
            actual: scores.len(),
        });
    }
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.and_then(|(i, _)| Emotion::from_index(i))
        .ok_or(ClassificationError::NoFiniteScore)
}
