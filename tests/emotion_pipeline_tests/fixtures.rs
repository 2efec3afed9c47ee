use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use emotion_detection::models::BiLstmConfig;
use emotion_detection::utils::DeviceSelectable;
use emotion_detection::{BiLstmClassifier, InferenceContext, InferenceContextBuilder};
use tempfile::TempDir;

pub const LABELS: [&str; 6] = ["anger", "fear", "joy", "love", "sadness", "surprise"];

/// Vocabulary words; id = position + 2 (1 is the OOV token).
pub const WORDS: [&str; 24] = [
    "i", "feel", "so", "happy", "sad", "angry", "scared", "today", "love", "you", "that",
    "came", "out", "of", "nowhere", "laughed", "then", "wanted", "to", "cry", "stayed",
    "even", "when", "alone",
];

pub fn word_id(word: &str) -> u32 {
    WORDS.iter().position(|w| *w == word).unwrap() as u32 + 2
}

pub fn config() -> BiLstmConfig {
    BiLstmConfig {
        vocab_size: WORDS.len() + 2,
        embedding_dim: 8,
        hidden_size: 6,
        num_labels: LABELS.len(),
        bidirectional: true,
        dense_layers: vec![8],
        mask_zero: true,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Weights {
    Random,
    Zero,
}

pub fn weights(config: &BiLstmConfig, kind: Weights) -> HashMap<String, Tensor> {
    let device = Device::Cpu;
    let make = |shape: Vec<usize>| match kind {
        Weights::Random => Tensor::randn(0f32, 0.5, shape, &device).unwrap(),
        Weights::Zero => Tensor::zeros(shape, DType::F32, &device).unwrap(),
    };

    let gates = 4 * config.hidden_size;
    let dense = config.dense_layers[0];
    let mut tensors = HashMap::new();
    tensors.insert(
        "embedding.weight".to_string(),
        make(vec![config.vocab_size, config.embedding_dim]),
    );
    for suffix in ["", "_reverse"] {
        tensors.insert(
            format!("lstm.weight_ih_l0{suffix}"),
            make(vec![gates, config.embedding_dim]),
        );
        tensors.insert(
            format!("lstm.weight_hh_l0{suffix}"),
            make(vec![gates, config.hidden_size]),
        );
        tensors.insert(format!("lstm.bias_ih_l0{suffix}"), make(vec![gates]));
        tensors.insert(format!("lstm.bias_hh_l0{suffix}"), make(vec![gates]));
    }
    tensors.insert(
        "dense.0.weight".to_string(),
        make(vec![dense, config.recurrent_output_size()]),
    );
    tensors.insert("dense.0.bias".to_string(), make(vec![dense]));
    tensors.insert(
        "classifier.weight".to_string(),
        make(vec![config.num_labels, dense]),
    );
    tensors.insert("classifier.bias".to_string(), make(vec![config.num_labels]));
    tensors
}

pub fn keras_tokenizer_json() -> String {
    let mut word_index: serde_json::Map<String, serde_json::Value> = serde_json::Map::new();
    word_index.insert("<OOV>".into(), 1.into());
    for word in WORDS {
        word_index.insert(word.into(), word_id(word).into());
    }
    // Keras stores the index as a JSON string inside the config
    let encoded = serde_json::Value::Object(word_index).to_string();
    serde_json::json!({
        "class_name": "Tokenizer",
        "config": {
            "num_words": null,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": "<OOV>",
            "document_count": 16000,
            "word_index": encoded
        }
    })
    .to_string()
}

pub fn write_artifacts(
    dir: &Path,
    config: &BiLstmConfig,
    tensors: &HashMap<String, Tensor>,
    labels: &[&str],
) -> anyhow::Result<()> {
    std::fs::write(dir.join("config.json"), serde_json::to_string(config)?)?;
    candle_core::safetensors::save(tensors, dir.join("model.safetensors"))?;
    std::fs::write(dir.join("tokenizer.json"), keras_tokenizer_json())?;
    std::fs::write(
        dir.join("label_encoder.json"),
        serde_json::json!({ "classes": labels }).to_string(),
    )?;
    Ok(())
}

/// A complete artifact directory; keep the `TempDir` alive while in use.
pub fn artifact_dir(kind: Weights) -> anyhow::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let config = config();
    write_artifacts(dir.path(), &config, &weights(&config, kind), &LABELS)?;
    Ok(dir)
}

pub fn context(kind: Weights) -> anyhow::Result<(TempDir, InferenceContext<BiLstmClassifier>)> {
    let dir = artifact_dir(kind)?;
    let context = InferenceContextBuilder::from_dir(dir.path()).cpu().build()?;
    Ok((dir, context))
}
