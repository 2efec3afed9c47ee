pub mod emotion;
pub mod history;

pub use emotion::{Emotion, UnknownEmotion};
pub use history::{round_confidence, History, HistoryRecord};
