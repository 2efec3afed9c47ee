/// One analysed input, as shown in the session history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryRecord {
    pub text: String,
    pub label: String,
    /// Confidence rounded to two decimals.
    pub confidence: f32,
}

/// Append-only log of the predictions made during one session.
///
/// Nothing is persisted; the history lives as long as its owner.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns it.
    pub fn push(&mut self, text: &str, label: &str, confidence: f32) -> &HistoryRecord {
        self.records.push(HistoryRecord {
            text: text.to_string(),
            label: label.to_string(),
            confidence: round_confidence(confidence),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryRecord;
    type IntoIter = std::slice::Iter<'a, HistoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Rounds to two decimals, ties to even.
pub fn round_confidence(confidence: f32) -> f32 {
    (confidence * 100.0).round_ties_even() / 100.0
}
