use emotion_detection::loaders::ArtifactFiles;
use emotion_detection::preprocessing::{vocabulary_from_json, Vocabulary};
use emotion_detection::utils::DeviceSelectable;
use emotion_detection::{Artifact, EmotionError, InferenceContextBuilder, Truncation};

use crate::fixtures::{self, word_id, Weights, LABELS, WORDS};

fn unavailable_artifact(err: EmotionError) -> Artifact {
    match err {
        EmotionError::ModelUnavailable { artifact, .. } => artifact,
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[test]
fn missing_weights_are_model_unavailable() -> anyhow::Result<()> {
    let dir = fixtures::artifact_dir(Weights::Random)?;
    std::fs::remove_file(dir.path().join("model.safetensors"))?;

    let err = InferenceContextBuilder::from_dir(dir.path())
        .cpu()
        .build()
        .unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(unavailable_artifact(err), Artifact::Weights);
    Ok(())
}

#[test]
fn malformed_tokenizer_is_model_unavailable() -> anyhow::Result<()> {
    let dir = fixtures::artifact_dir(Weights::Random)?;
    std::fs::write(dir.path().join("tokenizer.json"), "not json")?;

    let err = InferenceContextBuilder::from_dir(dir.path())
        .cpu()
        .build()
        .unwrap_err();
    assert_eq!(unavailable_artifact(err), Artifact::Tokenizer);
    Ok(())
}

#[test]
fn label_set_must_match_the_model_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixtures::config();
    let weights = fixtures::weights(&config, Weights::Random);
    fixtures::write_artifacts(dir.path(), &config, &weights, &LABELS[..5])?;

    let err = InferenceContextBuilder::from_dir(dir.path())
        .cpu()
        .build()
        .unwrap_err();
    assert_eq!(unavailable_artifact(err), Artifact::LabelEncoder);
    Ok(())
}

#[test]
fn weight_shapes_must_match_the_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixtures::config();
    let weights = fixtures::weights(&config, Weights::Random);
    let mut wider = config.clone();
    wider.hidden_size += 1;
    fixtures::write_artifacts(dir.path(), &wider, &weights, &LABELS)?;

    let err = InferenceContextBuilder::from_dir(dir.path())
        .cpu()
        .build()
        .unwrap_err();
    assert_eq!(unavailable_artifact(err), Artifact::Weights);
    Ok(())
}

#[test]
fn tokenizer_ids_must_fit_the_embedding_table() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = fixtures::config();
    config.vocab_size = 10;
    let weights = fixtures::weights(&config, Weights::Random);
    fixtures::write_artifacts(dir.path(), &config, &weights, &LABELS)?;

    let err = InferenceContextBuilder::from_dir(dir.path())
        .cpu()
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("embedding table of 10 rows"));
    assert_eq!(unavailable_artifact(err), Artifact::Tokenizer);
    Ok(())
}

#[test]
fn custom_file_names_are_honoured() -> anyhow::Result<()> {
    let dir = fixtures::artifact_dir(Weights::Random)?;
    std::fs::rename(
        dir.path().join("label_encoder.json"),
        dir.path().join("classes.json"),
    )?;

    let context = InferenceContextBuilder::from_dir(dir.path())
        .files(ArtifactFiles {
            labels: "classes.json".into(),
            ..Default::default()
        })
        .cpu()
        .build()?;
    assert_eq!(context.labels().classes(), LABELS);
    Ok(())
}

#[test]
fn pre_truncation_keeps_the_last_tokens() -> anyhow::Result<()> {
    let dir = fixtures::artifact_dir(Weights::Random)?;
    let context = InferenceContextBuilder::from_dir(dir.path())
        .truncation(Truncation::Pre)
        .cpu()
        .build()?;

    let words: Vec<&str> = (0..150).map(|i| WORDS[i % WORDS.len()]).collect();
    let input = context.encode(&words.join(" "));
    let expected: Vec<u32> = words[50..].iter().map(|w| word_id(w)).collect();
    assert_eq!(input.ids(), expected.as_slice());
    Ok(())
}

#[test]
fn hugging_face_tokenizers_are_detected() -> anyhow::Result<()> {
    let json = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": { "[UNK]": 1, "i": 2, "feel": 3, "happy": 4 },
            "unk_token": "[UNK]"
        }
    }"#;

    let vocabulary = vocabulary_from_json(json)?;
    assert_eq!(vocabulary.text_to_ids("I feel HAPPY"), [2, 3, 4]);
    assert_eq!(vocabulary.text_to_ids("I feel great"), [2, 3, 1]);
    assert_eq!(vocabulary.max_id(), Some(4));
    Ok(())
}
