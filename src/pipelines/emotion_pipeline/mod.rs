//! Emotion detection pipeline for classifying the emotional tone of text.
//!
//! This module wires a fitted vocabulary, a bidirectional LSTM and a label
//! encoder into one immutable [`InferenceContext`]. The context is built once
//! at startup and passed by reference to every request.
//!
//! ## Main Types
//!
//! - [`InferenceContext`] - Loaded artifacts, `encode` / `classify` / `predict`
//! - [`InferenceContextBuilder`] - Builder pattern for artifact and device configuration
//! - [`Prediction`] - Label, confidence and full distribution of one request
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use emotion_detection::pipelines::emotion_pipeline::*;
//! use emotion_detection::utils::DeviceSelectable;
//!
//! # fn main() -> emotion_detection::Result<()> {
//! let context = InferenceContextBuilder::from_hub("my-org/emotion-bilstm")
//!     .cpu()
//!     .build()?;
//!
//! let prediction = context.predict("That came out of nowhere.")?;
//! println!("Emotion: {} (confidence: {:.2})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod pipeline;

pub use builder::InferenceContextBuilder;
pub use pipeline::{InferenceContext, Prediction, AMBIGUITY_THRESHOLD};
