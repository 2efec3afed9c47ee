use std::path::PathBuf;

use candle_core::DType;
use candle_nn::VarBuilder;
use tracing::info;

use super::pipeline::InferenceContext;
use crate::error::{Artifact, EmotionError, Result};
use crate::labels::LabelEncoder;
use crate::loaders::{load_model_config, ArtifactFiles, ArtifactLoader, ArtifactSource};
use crate::models::BiLstmClassifier;
use crate::preprocessing::{load_vocabulary, Preprocessor, Truncation, Vocabulary};
use crate::utils::{DeviceRequest, DeviceSelectable};

/// Loads the startup artifacts into an [`InferenceContext`].
///
/// Any missing or malformed artifact fails the build with
/// [`EmotionError::ModelUnavailable`]; there is no partial context.
#[derive(Debug, Clone)]
pub struct InferenceContextBuilder {
    source: ArtifactSource,
    files: ArtifactFiles,
    device_request: DeviceRequest,
    truncation: Truncation,
}

impl InferenceContextBuilder {
    pub fn new(source: ArtifactSource) -> Self {
        Self {
            source,
            files: ArtifactFiles::default(),
            device_request: DeviceRequest::Default,
            truncation: Truncation::default(),
        }
    }

    /// Artifacts stored in a local directory.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(ArtifactSource::Local(dir.into()))
    }

    /// Artifacts stored in a Hugging Face Hub model repository.
    pub fn from_hub(repo: &str) -> Self {
        Self::new(ArtifactSource::Hub {
            repo: repo.to_string(),
            revision: None,
        })
    }

    /// Pins the Hub revision. Ignored for local sources.
    pub fn revision(mut self, revision: &str) -> Self {
        if let ArtifactSource::Hub { revision: rev, .. } = &mut self.source {
            *rev = Some(revision.to_string());
        }
        self
    }

    pub fn files(mut self, files: ArtifactFiles) -> Self {
        self.files = files;
        self
    }

    pub fn truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn build(self) -> Result<InferenceContext<BiLstmClassifier>> {
        let loader = ArtifactLoader::new(self.source, self.files);

        let config = load_model_config(&loader.resolve(Artifact::ModelConfig)?)?;
        let vocabulary = load_vocabulary(&loader.resolve(Artifact::Tokenizer)?)?;
        let labels = LabelEncoder::from_file(&loader.resolve(Artifact::LabelEncoder)?)?;

        if let Some(max_id) = vocabulary.max_id() {
            if max_id as usize >= config.vocab_size {
                return Err(EmotionError::unavailable(
                    Artifact::Tokenizer,
                    format!(
                        "token id {max_id} does not fit the embedding table of {} rows",
                        config.vocab_size
                    ),
                ));
            }
        }

        let device = self.device_request.resolve()?;
        let weights = loader.resolve(Artifact::Weights)?;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&weights], DType::F32, &device)
                .map_err(|e| EmotionError::unavailable(Artifact::Weights, e))?
        };
        let model = BiLstmClassifier::load(vb, &config)
            .map_err(|e| EmotionError::unavailable(Artifact::Weights, e))?;

        let preprocessor = Preprocessor::new(vocabulary).with_truncation(self.truncation);
        let context = InferenceContext::new(preprocessor, model, labels)?;

        info!(
            source = ?loader.source(),
            labels = ?context.labels().classes(),
            location = ?device.location(),
            "emotion model loaded"
        );
        Ok(context)
    }
}

impl DeviceSelectable for InferenceContextBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}
