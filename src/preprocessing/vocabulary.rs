//! Fitted vocabularies mapping text to token ids.
//!
//! Two artifact kinds are understood:
//! - the JSON written by a Keras word `Tokenizer` (`tokenizer.to_json()`),
//! - a Hugging Face `tokenizer.json`, loaded with the `tokenizers` crate.
//!
//! The tokenization rule (casing, punctuation, out-of-vocabulary handling)
//! always comes from the artifact itself.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Artifact, EmotionError, Result};

/// Maps raw text to the ids the model was trained on.
pub trait Vocabulary: Send + Sync {
    /// Tokenizes `text` and maps every token to its id.
    ///
    /// Never fails: tokens the vocabulary cannot represent are mapped or
    /// dropped according to the artifact's own policy.
    fn text_to_ids(&self, text: &str) -> Vec<u32>;

    /// Number of entries in the vocabulary.
    fn len(&self) -> usize;

    /// Largest id [`text_to_ids`](Vocabulary::text_to_ids) can return.
    fn max_id(&self) -> Option<u32>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_split() -> String {
    " ".to_string()
}

fn default_true() -> bool {
    true
}

/// Text normalisation options of a Keras word tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KerasTokenizerOptions {
    /// Only ids below this bound are kept.
    #[serde(default)]
    pub num_words: Option<u32>,
    /// Characters replaced by `split` before splitting.
    #[serde(default = "default_filters")]
    pub filters: String,
    #[serde(default = "default_true")]
    pub lower: bool,
    #[serde(default = "default_split")]
    pub split: String,
    /// Every character is a token.
    #[serde(default)]
    pub char_level: bool,
    #[serde(default)]
    pub oov_token: Option<String>,
}

impl Default for KerasTokenizerOptions {
    fn default() -> Self {
        Self {
            num_words: None,
            filters: default_filters(),
            lower: true,
            split: default_split(),
            char_level: false,
            oov_token: None,
        }
    }
}

/// `word_index` is stored either as an object or as a JSON-encoded string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWordIndex {
    Map(HashMap<String, u32>),
    Encoded(String),
}

#[derive(Deserialize)]
struct RawKerasConfig {
    #[serde(flatten)]
    options: KerasTokenizerOptions,
    word_index: RawWordIndex,
}

#[derive(Deserialize)]
struct RawKerasTokenizer {
    config: RawKerasConfig,
}

/// Word-level tokenizer fitted by Keras.
#[derive(Debug, Clone)]
pub struct KerasTokenizer {
    word_index: HashMap<String, u32>,
    options: KerasTokenizerOptions,
    oov_id: Option<u32>,
}

impl KerasTokenizer {
    pub fn new(word_index: HashMap<String, u32>, options: KerasTokenizerOptions) -> Self {
        let oov_id = options
            .oov_token
            .as_ref()
            .and_then(|token| word_index.get(token).copied());
        if options.oov_token.is_some() && oov_id.is_none() {
            warn!(
                oov_token = ?options.oov_token,
                "oov token missing from word index, unknown words will be dropped"
            );
        }
        Self {
            word_index,
            options,
            oov_id,
        }
    }

    /// Parses the JSON produced by `Tokenizer.to_json()`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| EmotionError::unavailable(Artifact::Tokenizer, e))?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self> {
        let raw: RawKerasTokenizer = serde_json::from_value(value)
            .map_err(|e| EmotionError::unavailable(Artifact::Tokenizer, e))?;
        let word_index = match raw.config.word_index {
            RawWordIndex::Map(map) => map,
            RawWordIndex::Encoded(encoded) => serde_json::from_str(&encoded).map_err(|e| {
                EmotionError::unavailable(Artifact::Tokenizer, format!("word_index: {e}"))
            })?,
        };
        if word_index.is_empty() {
            return Err(EmotionError::unavailable(
                Artifact::Tokenizer,
                "word_index is empty",
            ));
        }
        Ok(Self::new(word_index, raw.config.options))
    }

    pub fn options(&self) -> &KerasTokenizerOptions {
        &self.options
    }

    /// Id of `word`, if it was seen at fit time.
    pub fn word_id(&self, word: &str) -> Option<u32> {
        self.word_index.get(word).copied()
    }

    /// Splits text into tokens the way `text_to_word_sequence` does.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.options.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.options.char_level {
            return text.chars().map(String::from).collect();
        }

        let split = self.options.split.as_str();
        let mut filtered = String::with_capacity(text.len());
        for c in text.chars() {
            if self.options.filters.contains(c) {
                filtered.push_str(split);
            } else {
                filtered.push(c);
            }
        }

        if split.is_empty() {
            filtered.split_whitespace().map(str::to_string).collect()
        } else {
            filtered
                .split(split)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        }
    }
}

impl Vocabulary for KerasTokenizer {
    fn text_to_ids(&self, text: &str) -> Vec<u32> {
        self.tokenize(text)
            .iter()
            .filter_map(|token| match self.word_index.get(token) {
                Some(&id) if self.options.num_words.is_some_and(|limit| id >= limit) => {
                    self.oov_id
                }
                Some(&id) => Some(id),
                None => self.oov_id,
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.word_index.len()
    }

    fn max_id(&self) -> Option<u32> {
        let limit = self.options.num_words.unwrap_or(u32::MAX);
        self.word_index
            .values()
            .copied()
            .filter(|&id| id < limit)
            .chain(self.oov_id)
            .max()
    }
}

impl Vocabulary for tokenizers::Tokenizer {
    fn text_to_ids(&self, text: &str) -> Vec<u32> {
        match self.encode(text, false) {
            Ok(encoding) => encoding.get_ids().to_vec(),
            Err(e) => {
                warn!(error = %e, "tokenizer rejected input, encoding as empty");
                Vec::new()
            }
        }
    }

    fn len(&self) -> usize {
        self.get_vocab_size(true)
    }

    fn max_id(&self) -> Option<u32> {
        self.get_vocab(true).into_values().max()
    }
}

/// Detects the artifact kind from its content and builds the vocabulary.
pub fn vocabulary_from_json(content: &str) -> Result<Box<dyn Vocabulary>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| EmotionError::unavailable(Artifact::Tokenizer, e))?;

    let is_keras = value.get("class_name").and_then(Value::as_str) == Some("Tokenizer")
        || value.pointer("/config/word_index").is_some();
    if is_keras {
        let tokenizer = KerasTokenizer::from_value(value)?;
        info!(words = tokenizer.len(), "loaded keras word tokenizer");
        return Ok(Box::new(tokenizer));
    }

    if value.get("model").is_some() {
        let tokenizer = tokenizers::Tokenizer::from_str(content)
            .map_err(|e| EmotionError::unavailable(Artifact::Tokenizer, e))?;
        info!(
            words = Vocabulary::len(&tokenizer),
            "loaded hugging face tokenizer"
        );
        return Ok(Box::new(tokenizer));
    }

    Err(EmotionError::unavailable(
        Artifact::Tokenizer,
        "unrecognised tokenizer format",
    ))
}

/// Reads a tokenizer artifact from disk.
pub fn load_vocabulary(path: &Path) -> Result<Box<dyn Vocabulary>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        EmotionError::unavailable(
            Artifact::Tokenizer,
            format!("failed to read {}: {e}", path.display()),
        )
    })?;
    vocabulary_from_json(&content)
}
