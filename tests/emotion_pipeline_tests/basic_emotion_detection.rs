use emotion_detection::{InputSequence, MAX_SEQUENCE_LEN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::{self, word_id, Weights, LABELS, WORDS};

fn random_text(rng: &mut StdRng, words: usize) -> String {
    const NOISE: [&str; 8] = ["!", "...", "¿qué?", "😊", "\t", "UNKNOWN", "it's", "\n"];
    (0..words)
        .map(|_| {
            if rng.random_bool(0.8) {
                WORDS[rng.random_range(0..WORDS.len())].to_string()
            } else {
                NOISE[rng.random_range(0..NOISE.len())].to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn basic_emotion_detection() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;

    let prediction = context.predict("I laughed, then realized I wanted to cry.")?;
    assert!(LABELS.contains(&prediction.label.as_str()));
    assert_eq!(prediction.distribution.len(), LABELS.len());
    assert_eq!(
        prediction.confidence,
        prediction.distribution[prediction.label_index]
    );

    let sum: f32 = prediction.distribution.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4, "sum = {sum}");
    Ok(())
}

#[test]
fn encode_always_returns_a_full_sequence() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let words = rng.random_range(0..300);
        let text = random_text(&mut rng, words);
        let input = context.encode(&text);
        assert_eq!(input.ids().len(), MAX_SEQUENCE_LEN);

        let prediction = context.classify(&input)?;
        let sum: f32 = prediction.distribution.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "sum = {sum} for {text:?}");
        assert_eq!(
            prediction.distribution[prediction.label_index],
            prediction.confidence
        );
    }
    Ok(())
}

#[test]
fn empty_input_is_all_zeros_and_deterministic() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;

    let input = context.encode("");
    assert_eq!(input, InputSequence::zeros());

    let first = context.classify(&input)?;
    let second = context.classify(&input)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn repeated_predictions_are_identical() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let text = "I stayed, even when I didn't have to.";
    assert_eq!(context.predict(text)?, context.predict(text)?);
    Ok(())
}

#[test]
fn long_input_keeps_the_first_hundred_tokens() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;

    let words: Vec<&str> = (0..200).map(|i| WORDS[i % WORDS.len()]).collect();
    let input = context.encode(&words.join(" "));

    let expected: Vec<u32> = words[..MAX_SEQUENCE_LEN].iter().map(|w| word_id(w)).collect();
    assert_eq!(input.ids(), expected.as_slice());
    Ok(())
}

#[test]
fn single_word_is_padded_with_zeros() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;

    let input = context.encode("Happy!");
    assert_eq!(input.ids()[0], word_id("happy"));
    assert_eq!(input.token_count(), 1);
    assert!(input.ids()[1..].iter().all(|&id| id == 0));
    Ok(())
}

#[test]
fn unknown_words_use_the_oov_id() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Random)?;
    let input = context.encode("i feel wonderful");
    assert_eq!(&input.ids()[..3], &[word_id("i"), word_id("feel"), 1]);
    Ok(())
}

#[test]
fn uniform_model_picks_the_first_label() -> anyhow::Result<()> {
    let (_dir, context) = fixtures::context(Weights::Zero)?;

    let prediction = context.predict("that came out of nowhere")?;
    assert_eq!(prediction.label, "anger");
    assert_eq!(prediction.label_index, 0);
    assert!((prediction.confidence - 1.0 / 6.0).abs() < 1e-6);
    assert!(prediction.is_ambiguous());
    Ok(())
}
