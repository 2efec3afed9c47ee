//! Resolution of the startup artifacts.
//!
//! An emotion model is four files: the model config, the safetensors
//! weights, the fitted tokenizer and the fitted label encoder. They are read
//! from a local directory or downloaded from a Hugging Face Hub repository.
//!
//! ## Main Types
//!
//! - [`ArtifactSource`] - Where the artifacts live
//! - [`ArtifactFiles`] - File names of the four artifacts
//! - [`HfLoader`] - Hub file loader with retry logic
//! - [`ArtifactLoader`] - Resolves every artifact to a local path
//!
//! Every failure is reported as [`EmotionError::ModelUnavailable`] naming the
//! artifact that could not be resolved.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use tracing::{debug, warn};

use crate::error::{Artifact, EmotionError, Result};
use crate::models::BiLstmConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// A local directory holding every artifact.
    Local(PathBuf),
    /// A Hugging Face Hub model repository.
    Hub {
        repo: String,
        revision: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFiles {
    pub config: String,
    pub weights: String,
    pub tokenizer: String,
    pub labels: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            config: "config.json".into(),
            weights: "model.safetensors".into(),
            tokenizer: "tokenizer.json".into(),
            labels: "label_encoder.json".into(),
        }
    }
}

impl ArtifactFiles {
    pub fn filename(&self, artifact: Artifact) -> &str {
        match artifact {
            Artifact::ModelConfig => &self.config,
            Artifact::Weights => &self.weights,
            Artifact::Tokenizer => &self.tokenizer,
            Artifact::LabelEncoder => &self.labels,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: Option<String>,
    pub filename: String,
}

impl HfLoader {
    const MAX_RETRIES: u32 = 3;

    pub fn new(repo: &str, revision: Option<&str>, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.map(str::to_string),
            filename: filename.into(),
        }
    }

    pub fn load(&self) -> Result<PathBuf> {
        let api = ApiBuilder::new().with_progress(false).build()?;
        let repo = match &self.revision {
            Some(revision) => Repo::with_revision(self.repo.clone(), RepoType::Model, revision.clone()),
            None => Repo::new(self.repo.clone(), RepoType::Model),
        };
        let api = api.repo(repo);

        // Retry logic for lock acquisition failures
        let mut attempt = 0;
        loop {
            match api.get(&self.filename) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    if error_msg.contains("Lock acquisition failed")
                        && attempt < Self::MAX_RETRIES - 1
                    {
                        // Wait before retrying, with exponential backoff
                        let wait_time = Duration::from_millis(100 * (1 << attempt));
                        warn!(file = %self.filename, ?wait_time, "hub lock busy, retrying");
                        std::thread::sleep(wait_time);
                        attempt += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

/// Resolves artifacts of one [`ArtifactSource`] to local paths.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    source: ArtifactSource,
    files: ArtifactFiles,
}

impl ArtifactLoader {
    pub fn new(source: ArtifactSource, files: ArtifactFiles) -> Self {
        Self { source, files }
    }

    pub fn source(&self) -> &ArtifactSource {
        &self.source
    }

    /// Local path of `artifact`, downloading it first for Hub sources.
    pub fn resolve(&self, artifact: Artifact) -> Result<PathBuf> {
        let filename = self.files.filename(artifact);
        let path = match &self.source {
            ArtifactSource::Local(dir) => {
                let path = dir.join(filename);
                if !path.is_file() {
                    return Err(EmotionError::unavailable(
                        artifact,
                        format!("{} not found", path.display()),
                    ));
                }
                path
            }
            ArtifactSource::Hub { repo, revision } => {
                HfLoader::new(repo, revision.as_deref(), filename)
                    .load()
                    .map_err(|e| EmotionError::unavailable(artifact, format!("{repo}/{filename}: {e}")))?
            }
        };
        debug!(%artifact, path = %path.display(), "resolved artifact");
        Ok(path)
    }
}

/// Reads the model hyper-parameters.
pub fn load_model_config(path: &Path) -> Result<BiLstmConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        EmotionError::unavailable(
            Artifact::ModelConfig,
            format!("failed to read {}: {e}", path.display()),
        )
    })?;
    let config: BiLstmConfig = serde_json::from_str(&content)
        .map_err(|e| EmotionError::unavailable(Artifact::ModelConfig, e))?;

    if config.vocab_size == 0 || config.embedding_dim == 0 || config.hidden_size == 0 {
        return Err(EmotionError::unavailable(
            Artifact::ModelConfig,
            "vocab_size, embedding_dim and hidden_size must be positive",
        ));
    }
    if config.num_labels == 0 {
        return Err(EmotionError::unavailable(
            Artifact::ModelConfig,
            "num_labels must be positive",
        ));
    }
    Ok(config)
}
