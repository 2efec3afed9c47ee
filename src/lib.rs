//! Contextual emotion detection for free text.
//!
//! Text goes through a fitted word tokenizer, is padded to a fixed length of
//! [`MAX_SEQUENCE_LEN`] ids, and is classified by a bidirectional LSTM into one
//! of the labels of a fitted label encoder.
//!
//! ```rust,no_run
//! use emotion_detection::{InferenceContextBuilder, Session};
//! use emotion_detection::utils::DeviceSelectable;
//!
//! # fn main() -> emotion_detection::Result<()> {
//! let context = InferenceContextBuilder::from_dir("artifacts").cpu().build()?;
//!
//! let mut session = Session::new();
//! if let Some(prediction) = session.analyze(&context, "I stayed, even when I didn't have to.")? {
//!     println!("{} ({:.2})", prediction.label, prediction.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod labels;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod preprocessing;
pub mod session;
pub mod utils;

pub use crate::core::{Emotion, History, HistoryRecord};
pub use error::{Artifact, EmotionError, Result};
pub use labels::LabelEncoder;
pub use models::{BiLstmClassifier, BiLstmConfig, SequenceClassifier};
pub use pipelines::emotion_pipeline::{InferenceContext, InferenceContextBuilder, Prediction};
pub use preprocessing::{InputSequence, Preprocessor, Truncation, MAX_SEQUENCE_LEN};
pub use session::Session;
