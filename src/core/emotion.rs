use std::str::FromStr;

/// Emotion classes the demo model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Fear,
    Joy,
    Love,
    Sadness,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Love,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    /// Returns the label as written by the label encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Love => "love",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Anger => "😠",
            Emotion::Fear => "😨",
            Emotion::Joy => "😊",
            Emotion::Love => "❤️",
            Emotion::Sadness => "😢",
            Emotion::Surprise => "😲",
        }
    }

    /// Accent colour as a `#rrggbb` hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Emotion::Anger => "#ef4444",
            Emotion::Fear => "#a855f7",
            Emotion::Joy => "#22c55e",
            Emotion::Love => "#ec4899",
            Emotion::Sadness => "#60a5fa",
            Emotion::Surprise => "#facc15",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a label is not one of the known [`Emotion`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion '{0}'")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}
