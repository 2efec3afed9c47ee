//! Fixed-length id sequences fed to the classifier.

use std::fmt;

/// Number of ids in every [`InputSequence`].
pub const MAX_SEQUENCE_LEN: usize = 100;

/// Sentinel id used for padding.
pub const PADDING_ID: u32 = 0;

/// Which end of an over-long id list is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Truncation {
    /// Keep the first [`MAX_SEQUENCE_LEN`] ids.
    #[default]
    Post,
    /// Keep the last [`MAX_SEQUENCE_LEN`] ids.
    Pre,
}

/// Exactly [`MAX_SEQUENCE_LEN`] token ids, right-padded with [`PADDING_ID`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputSequence([u32; MAX_SEQUENCE_LEN]);

impl InputSequence {
    /// A sequence made only of padding.
    pub fn zeros() -> Self {
        Self([PADDING_ID; MAX_SEQUENCE_LEN])
    }

    /// Pads (at the end) or truncates `ids` to [`MAX_SEQUENCE_LEN`].
    pub fn from_ids(ids: &[u32], truncation: Truncation) -> Self {
        let kept = if ids.len() <= MAX_SEQUENCE_LEN {
            ids
        } else {
            match truncation {
                Truncation::Post => &ids[..MAX_SEQUENCE_LEN],
                Truncation::Pre => &ids[ids.len() - MAX_SEQUENCE_LEN..],
            }
        };

        let mut padded = [PADDING_ID; MAX_SEQUENCE_LEN];
        padded[..kept.len()].copy_from_slice(kept);
        Self(padded)
    }

    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    /// Number of ids that are not padding.
    pub fn token_count(&self) -> usize {
        self.0.iter().filter(|&&id| id != PADDING_ID).count()
    }

    /// True when every id is padding.
    pub fn is_padding_only(&self) -> bool {
        self.token_count() == 0
    }
}

impl AsRef<[u32]> for InputSequence {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Debug for InputSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self
            .0
            .iter()
            .rposition(|&id| id != PADDING_ID)
            .map_or(0, |i| i + 1);
        f.debug_struct("InputSequence")
            .field("ids", &&self.0[..end])
            .field("padding", &(MAX_SEQUENCE_LEN - end))
            .finish()
    }
}
