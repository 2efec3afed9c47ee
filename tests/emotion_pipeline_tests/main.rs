// Integration tests for the emotion pipeline
// This is a separate crate that tests the public API

mod basic_emotion_detection;
mod fixtures;
mod model_loading;
mod session_history;
