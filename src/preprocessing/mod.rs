//! Text preprocessing: fitted vocabulary plus fixed-length padding.
//!
//! [`Preprocessor::encode`] turns arbitrary text into an [`InputSequence`] of
//! exactly [`MAX_SEQUENCE_LEN`] ids. It has no error conditions; the empty
//! string encodes to all padding.

pub mod padding;
pub mod vocabulary;

pub use padding::{InputSequence, Truncation, MAX_SEQUENCE_LEN, PADDING_ID};
pub use vocabulary::{
    load_vocabulary, vocabulary_from_json, KerasTokenizer, KerasTokenizerOptions, Vocabulary,
};

use tracing::trace;

pub struct Preprocessor {
    vocabulary: Box<dyn Vocabulary>,
    truncation: Truncation,
}

impl Preprocessor {
    pub fn new(vocabulary: Box<dyn Vocabulary>) -> Self {
        Self {
            vocabulary,
            truncation: Truncation::default(),
        }
    }

    pub fn with_truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn encode(&self, text: &str) -> InputSequence {
        let ids = self.vocabulary.text_to_ids(text);
        if ids.len() > MAX_SEQUENCE_LEN {
            trace!(
                tokens = ids.len(),
                truncation = ?self.truncation,
                "truncating input"
            );
        }
        InputSequence::from_ids(&ids, self.truncation)
    }

    pub fn vocabulary(&self) -> &dyn Vocabulary {
        self.vocabulary.as_ref()
    }

    pub fn truncation(&self) -> Truncation {
        self.truncation
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("truncation", &self.truncation)
            .finish()
    }
}
