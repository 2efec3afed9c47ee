//! Fitted label encoder: the ordered class names behind the model outputs.
//!
//! Output index `i` of the classifier corresponds to `classes()[i]`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Artifact, EmotionError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabelEncoder {
    Classes(Vec<String>),
    Object { classes: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Builds an encoder from an ordered, non-empty list of distinct names.
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(EmotionError::unavailable(
                Artifact::LabelEncoder,
                "no classes",
            ));
        }

        {
            let mut seen = HashSet::with_capacity(classes.len());
            if let Some(duplicate) = classes.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(EmotionError::unavailable(
                    Artifact::LabelEncoder,
                    format!("duplicate class '{duplicate}'"),
                ));
            }
        }

        Ok(Self { classes })
    }

    /// Accepts `["anger", ...]` or `{"classes": ["anger", ...]}`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawLabelEncoder = serde_json::from_str(content)
            .map_err(|e| EmotionError::unavailable(Artifact::LabelEncoder, e))?;
        let classes = match raw {
            RawLabelEncoder::Classes(classes) | RawLabelEncoder::Object { classes } => classes,
        };
        Self::new(classes)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EmotionError::unavailable(
                Artifact::LabelEncoder,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&content)
    }

    /// Class name for a model output index.
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Model output index for a class name.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
