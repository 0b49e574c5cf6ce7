// Model Management - Download and cache ONNX models from HuggingFace
//
// Resolves the configured sentence-encoder repo (ONNX graph + tokenizer.json)
// through the hf-hub cache so repeated runs skip the download.

use crate::config::EmbeddingConfig;
use anyhow::{Context, Result};
use hf_hub::api::sync::{Api, ApiBuilder};
use std::path::{Path, PathBuf};
use tracing::info;

/// Paths to the downloaded model files
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Path to the ONNX model file
    pub model: PathBuf,
    /// Path to the tokenizer configuration (tokenizer.json)
    pub tokenizer: PathBuf,
}

/// Manages downloading and caching of ONNX embedding models
pub struct ModelManager {
    cache_dir: PathBuf,
    api: Api,
}

impl ModelManager {
    /// Create a new model manager with the specified cache directory
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", cache_dir))?;

        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.clone())
            .build()
            .context("Failed to create HuggingFace API client")?;

        Ok(Self { cache_dir, api })
    }

    /// Ensure the configured model is available locally and return its file paths
    ///
    /// The hub cache short-circuits files that were fetched before.
    pub fn ensure_model_downloaded(&self, config: &EmbeddingConfig) -> Result<ModelPaths> {
        if config.repo_id.trim().is_empty() {
            anyhow::bail!("Unsupported model: repo id must not be empty");
        }

        let repo_id = config.repo_id.as_str();
        info!("📥 Ensuring {} is available...", repo_id);

        let repo = self.api.model(repo_id.to_string());

        let model_path = repo
            .get(&config.model_file)
            .with_context(|| format!("Failed to download {} from {}", config.model_file, repo_id))?;

        let tokenizer_path = repo.get(&config.tokenizer_file).with_context(|| {
            format!(
                "Failed to download {} from {}",
                config.tokenizer_file, repo_id
            )
        })?;

        if !model_path.exists() {
            anyhow::bail!("Model file not found after download: {:?}", model_path);
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found after download: {:?}",
                tokenizer_path
            );
        }

        info!("✅ {} ready", repo_id);
        info!("   Model: {:?}", model_path);
        info!("   Tokenizer: {:?}", tokenizer_path);

        Ok(ModelPaths {
            model: model_path,
            tokenizer: tokenizer_path,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}
