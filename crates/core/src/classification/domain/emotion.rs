use std::fmt;

use serde::{Deserialize, Serialize};

/// Emotion labels, in the order of the classifier's output scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Happy,
    Neutral,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Anger,
        Emotion::Happy,
        Emotion::Neutral,
        Emotion::Surprise,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Anger => "Anger",
            Emotion::Happy => "Happy",
            Emotion::Neutral => "Neutral",
            Emotion::Surprise => "Surprise",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            assert_eq!(emotion.index(), i);
            assert_eq!(Emotion::from_index(i), Some(*emotion));
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(Emotion::from_index(4), None);
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Emotion::Surprise.to_string(), "Surprise");
    }
}
