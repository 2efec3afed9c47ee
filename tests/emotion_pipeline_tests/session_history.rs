use emotion_detection::Session;

use crate::fixtures::{self, Weights};

#[test]
fn blank_input_is_skipped() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let mut session = Session::new();

    assert!(session.analyze(&context, "")?.is_none());
    assert!(session.analyze(&context, "   \n\t")?.is_none());
    assert!(session.history().is_empty());
    Ok(())
}

#[test]
fn predictions_are_recorded_in_order() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let mut session = Session::new();

    let texts = ["i feel so happy today", "that came out of nowhere", "i love you"];
    let mut predictions = Vec::new();
    for text in texts {
        predictions.push(session.analyze(&context, text)?.expect("non-blank input"));
    }

    let history = session.into_history();
    assert_eq!(history.len(), texts.len());
    for ((record, prediction), text) in history.iter().zip(&predictions).zip(texts) {
        assert_eq!(record.text, text);
        assert_eq!(record.label, prediction.label);
        assert!((record.confidence - prediction.confidence).abs() <= 0.005 + 1e-6);
        assert_eq!(record.confidence, (record.confidence * 100.0).round() / 100.0);
    }
    Ok(())
}

#[test]
fn sessions_do_not_share_history() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let mut first = Session::new();
    let second = Session::new();

    first.analyze(&context, "i feel scared")?;
    assert_eq!(first.history().len(), 1);
    assert!(second.history().is_empty());
    assert_eq!(first.last().map(|r| r.text.as_str()), Some("i feel scared"));
    Ok(())
}
