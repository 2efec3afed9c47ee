//! Sequence classifiers that turn padded id sequences into class
//! probabilities.

pub mod bilstm;
pub mod components;

pub use bilstm::{BiLstmClassifier, BiLstmConfig};

use crate::error::Result;
use crate::preprocessing::InputSequence;

/// Trait that every classifier backend must implement.
///
/// `forward` is a pure function of its input for a loaded model: the same
/// sequence always yields the same distribution.
pub trait SequenceClassifier {
    /// Length of the distribution returned by [`forward`](Self::forward).
    fn num_labels(&self) -> usize;

    /// Probability of every label, in label-encoder order.
    fn forward(&self, input: &InputSequence) -> Result<Vec<f32>>;
}

impl<M: SequenceClassifier + ?Sized> SequenceClassifier for Box<M> {
    fn num_labels(&self) -> usize {
        (**self).num_labels()
    }

    fn forward(&self, input: &InputSequence) -> Result<Vec<f32>> {
        (**self).forward(input)
    }
}
