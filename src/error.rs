use std::fmt;

use thiserror::Error;

/// Startup artifact that an [`EmotionError::ModelUnavailable`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Model hyper-parameters (`config.json`).
    ModelConfig,
    /// Model weights (`model.safetensors`).
    Weights,
    /// Fitted word tokenizer.
    Tokenizer,
    /// Fitted label encoder.
    LabelEncoder,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::ModelConfig => "model config",
            Artifact::Weights => "model weights",
            Artifact::Tokenizer => "tokenizer",
            Artifact::LabelEncoder => "label encoder",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum EmotionError {
    // Startup
    #[error("Model unavailable, {artifact} could not be loaded: {reason}")]
    ModelUnavailable { artifact: Artifact, reason: String },

    // Inference
    #[error("Inference failed: {0}")]
    Inference(String),

    // Network/Download
    #[error("Download failed: {0}")]
    Download(String),

    // Device
    #[error("Device error: {0}")]
    Device(String),

    // Pass-through from dependencies
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EmotionError>;

impl EmotionError {
    pub(crate) fn unavailable(artifact: Artifact, reason: impl fmt::Display) -> Self {
        EmotionError::ModelUnavailable {
            artifact,
            reason: reason.to_string(),
        }
    }

    /// Whether the error leaves the process without a usable model.
    ///
    /// Fatal errors are reported once; callers refuse further requests
    /// instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EmotionError::ModelUnavailable { .. }
                | EmotionError::Download(_)
                | EmotionError::Device(_)
        )
    }
}

impl From<hf_hub::api::sync::ApiError> for EmotionError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        EmotionError::Download(value.to_string())
    }
}
