// Pipeline modules organized by functionality
pub mod emotion_pipeline;

pub use emotion_pipeline::*;
