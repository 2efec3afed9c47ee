//! One interactive session: the "Analyze" action and its history.

use tracing::debug;

use crate::core::{History, HistoryRecord};
use crate::error::Result;
use crate::models::SequenceClassifier;
use crate::pipelines::emotion_pipeline::{InferenceContext, Prediction};

/// Caller-owned session state.
///
/// The loaded [`InferenceContext`] is shared and read-only; each session
/// keeps its own append-only [`History`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `text` and records the result.
    ///
    /// Blank text (empty after trimming) is skipped: no prediction is made
    /// and nothing is recorded.
    pub fn analyze<M: SequenceClassifier>(
        &mut self,
        context: &InferenceContext<M>,
        text: &str,
    ) -> Result<Option<Prediction>> {
        if text.trim().is_empty() {
            debug!("skipping blank input");
            return Ok(None);
        }

        let prediction = context.predict(text)?;
        self.history
            .push(text, &prediction.label, prediction.confidence);
        Ok(Some(prediction))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.history.last()
    }

    /// Ends the session, handing the history to the caller.
    pub fn into_history(self) -> History {
        self.history
    }
}
