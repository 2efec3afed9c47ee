use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::core::Emotion;
use crate::error::{Artifact, EmotionError, Result};
use crate::labels::LabelEncoder;
use crate::models::{BiLstmClassifier, SequenceClassifier};
use crate::preprocessing::{InputSequence, Preprocessor};

/// Below this confidence a prediction is considered ambiguous.
pub const AMBIGUITY_THRESHOLD: f32 = 0.5;

/// Outcome of classifying one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// The predicted class name.
    pub label: String,
    /// Position of `label` in the label set.
    pub label_index: usize,
    /// Probability of `label` (0.0 to 1.0).
    pub confidence: f32,
    /// Probability of every label, in label-set order.
    pub distribution: Vec<f32>,
}

impl Prediction {
    pub fn is_ambiguous(&self) -> bool {
        self.confidence < AMBIGUITY_THRESHOLD
    }

    /// The label as a known [`Emotion`], if it is one.
    pub fn emotion(&self) -> Option<Emotion> {
        self.label.parse().ok()
    }

    /// Pairs every probability with its label name.
    pub fn scores<'a>(
        &'a self,
        labels: &'a LabelEncoder,
    ) -> impl Iterator<Item = (&'a str, f32)> + 'a {
        labels
            .classes()
            .iter()
            .map(String::as_str)
            .zip(self.distribution.iter().copied())
    }
}

/// Everything loaded at startup: preprocessing, model and label set.
///
/// Immutable once built. Construct with
/// [`InferenceContextBuilder`](super::InferenceContextBuilder), or with
/// [`InferenceContext::new`] for an already loaded model.
pub struct InferenceContext<M: SequenceClassifier = BiLstmClassifier> {
    preprocessor: Preprocessor,
    model: M,
    labels: LabelEncoder,
}

impl<M: SequenceClassifier> InferenceContext<M> {
    /// Fails with [`EmotionError::ModelUnavailable`] when the model output
    /// size does not match the label set.
    pub fn new(preprocessor: Preprocessor, model: M, labels: LabelEncoder) -> Result<Self> {
        if model.num_labels() != labels.len() {
            return Err(EmotionError::unavailable(
                Artifact::LabelEncoder,
                format!(
                    "{} classes but the model predicts {} labels",
                    labels.len(),
                    model.num_labels()
                ),
            ));
        }
        Ok(Self {
            preprocessor,
            model,
            labels,
        })
    }

    /// Text to a fixed-length id sequence. Never fails.
    pub fn encode(&self, text: &str) -> InputSequence {
        self.preprocessor.encode(text)
    }

    /// Runs the model and picks the most probable label.
    pub fn classify(&self, input: &InputSequence) -> Result<Prediction> {
        let start = Instant::now();
        let distribution = self.model.forward(input)?;

        if distribution.len() != self.labels.len() {
            return Err(EmotionError::Inference(format!(
                "model returned {} probabilities for {} labels",
                distribution.len(),
                self.labels.len()
            )));
        }

        let label_index = stable_argmax(&distribution)
            .ok_or_else(|| EmotionError::Inference("model returned no finite probability".into()))?;
        let label = self
            .labels
            .inverse_transform(label_index)
            .ok_or_else(|| {
                EmotionError::Inference(format!("predicted index {label_index} has no label"))
            })?
            .to_string();
        let confidence = distribution[label_index];

        debug!(
            %label,
            confidence,
            tokens = input.token_count(),
            elapsed = ?start.elapsed(),
            "classified input"
        );

        Ok(Prediction {
            label,
            label_index,
            confidence,
            distribution,
        })
    }

    /// `classify(encode(text))`.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let input = self.encode(text);
        self.classify(&input)
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl InferenceContext<BiLstmClassifier> {
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M: SequenceClassifier> std::fmt::Debug for InferenceContext<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceContext")
            .field("preprocessor", &self.preprocessor)
            .field("labels", &self.labels.classes())
            .finish_non_exhaustive()
    }
}

/// Index of the largest value; ties go to the lowest index and NaN never
/// wins. `None` when no value is comparable.
pub(crate) fn stable_argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
