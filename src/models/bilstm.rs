//! Bidirectional LSTM emotion classifier.
//!
//! Embedding → bidirectional LSTM (last states concatenated) → optional
//! dense ReLU layers → dense → softmax. Dropout is a no-op at inference and
//! has no weights, so it does not appear here.
//!
//! ```rust,no_run
//! use candle_core::{DType, Device};
//! use candle_nn::VarBuilder;
//! use emotion_detection::models::{BiLstmClassifier, BiLstmConfig, SequenceClassifier};
//! use emotion_detection::InputSequence;
//!
//! # fn main() -> emotion_detection::Result<()> {
//! let config: BiLstmConfig = serde_json::from_str(&std::fs::read_to_string("config.json")?)?;
//! let device = Device::Cpu;
//! let vb = unsafe {
//!     VarBuilder::from_mmaped_safetensors(&["model.safetensors"], DType::F32, &device)?
//! };
//! let model = BiLstmClassifier::load(vb, &config)?;
//! let probabilities = model.forward(&InputSequence::zeros())?;
//! # Ok(())
//! # }
//! ```

use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{embedding, linear, ops::softmax, Embedding, Linear, VarBuilder};
use serde::{Deserialize, Serialize};

use super::components::{Direction, Lstm};
use super::SequenceClassifier;
use crate::error::{EmotionError, Result};
use crate::preprocessing::{InputSequence, PADDING_ID};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiLstmConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    /// Units per LSTM direction.
    pub hidden_size: usize,
    pub num_labels: usize,
    #[serde(default = "default_true")]
    pub bidirectional: bool,
    /// Widths of the ReLU layers between the LSTM and the classifier.
    #[serde(default)]
    pub dense_layers: Vec<usize>,
    /// Skip padding steps, like a Keras `Embedding(mask_zero=True)`.
    #[serde(default = "default_true")]
    pub mask_zero: bool,
}

impl BiLstmConfig {
    /// Width of the recurrent output fed to the dense head.
    pub fn recurrent_output_size(&self) -> usize {
        if self.bidirectional {
            2 * self.hidden_size
        } else {
            self.hidden_size
        }
    }
}

#[derive(Debug, Clone)]
pub struct BiLstmClassifier {
    embedding: Embedding,
    forward_lstm: Lstm,
    backward_lstm: Option<Lstm>,
    dense: Vec<Linear>,
    classifier: Linear,
    config: BiLstmConfig,
    device: Device,
}

impl BiLstmClassifier {
    /// Builds the network from `vb`, checking every weight shape.
    pub fn load(vb: VarBuilder, config: &BiLstmConfig) -> Result<Self> {
        let device = vb.device().clone();
        let embedding = embedding(config.vocab_size, config.embedding_dim, vb.pp("embedding"))?;

        let lstm_vb = vb.pp("lstm");
        let forward_lstm = Lstm::load(
            config.embedding_dim,
            config.hidden_size,
            Direction::Forward,
            lstm_vb.clone(),
        )?;
        let backward_lstm = if config.bidirectional {
            Some(Lstm::load(
                config.embedding_dim,
                config.hidden_size,
                Direction::Backward,
                lstm_vb,
            )?)
        } else {
            None
        };

        let mut in_dim = config.recurrent_output_size();
        let mut dense = Vec::with_capacity(config.dense_layers.len());
        for (i, &width) in config.dense_layers.iter().enumerate() {
            dense.push(linear(in_dim, width, vb.pp(format!("dense.{i}")))?);
            in_dim = width;
        }
        let classifier = linear(in_dim, config.num_labels, vb.pp("classifier"))?;

        Ok(Self {
            embedding,
            forward_lstm,
            backward_lstm,
            dense,
            classifier,
            config: config.clone(),
            device,
        })
    }

    pub fn config(&self) -> &BiLstmConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Ids the recurrent layers actually see.
    fn visible_ids(&self, input: &InputSequence) -> Result<Vec<u32>> {
        let ids: Vec<u32> = if self.config.mask_zero {
            input
                .ids()
                .iter()
                .copied()
                .filter(|&id| id != PADDING_ID)
                .collect()
        } else {
            input.ids().to_vec()
        };

        if let Some(&id) = ids.iter().find(|&&id| id as usize >= self.config.vocab_size) {
            return Err(EmotionError::Inference(format!(
                "token id {id} is outside the embedding table of {} rows",
                self.config.vocab_size
            )));
        }
        Ok(ids)
    }

    /// Concatenated last hidden states, `[1, recurrent_output_size]`.
    fn encode(&self, ids: &[u32]) -> Result<Tensor> {
        if ids.is_empty() {
            return Ok(Tensor::zeros(
                (1, self.config.recurrent_output_size()),
                DType::F32,
                &self.device,
            )?);
        }

        let ids = Tensor::new(ids, &self.device)?;
        let xs = self.embedding.forward(&ids)?;
        let forward = self.forward_lstm.last_hidden(&xs)?;

        let hidden = match &self.backward_lstm {
            Some(backward) => {
                let backward = backward.last_hidden(&xs)?;
                Tensor::cat(&[&forward, &backward], D::Minus1)?
            }
            None => forward,
        };
        Ok(hidden)
    }
}

impl SequenceClassifier for BiLstmClassifier {
    fn num_labels(&self) -> usize {
        self.config.num_labels
    }

    fn forward(&self, input: &InputSequence) -> Result<Vec<f32>> {
        let ids = self.visible_ids(input)?;
        let mut xs = self.encode(&ids)?;

        for layer in &self.dense {
            xs = layer.forward(&xs)?.relu()?;
        }
        let logits = self.classifier.forward(&xs)?;
        let probabilities = softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        Ok(probabilities)
    }
}
