// Runtime Configuration
//
// Read from a TOML file. Every field has a default, so an empty or missing file
// is a valid config

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_QUERY: &str =
    "AI/ML use cases for improving customer satisfaction and operations";

/// Top-level configuration for a Casebook run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CasebookConfig {
    /// JSON file holding the document log
    pub store_path: PathBuf,

    /// Directory for rolling log files
    pub log_dir: PathBuf,

    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
}

/// Which sentence encoder to load and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// HuggingFace repository id
    pub repo_id: String,
    /// ONNX graph path inside the repository
    pub model_file: String,
    pub tokenizer_file: String,
    /// Local hub cache
    pub cache_dir: PathBuf,
    /// Tokens beyond this are truncated
    pub max_length: usize,
    /// Hidden size of the model; checked against every inference
    ///
    /// The tokenizer's own pad token is used for batching, so BERT and RoBERTa
    /// vocabularies both work
    pub dimensions: usize,
    /// ONNX Runtime intra-op threads (None = runtime default)
    pub intra_threads: Option<usize>,
}

/// Chat-completion endpoint and sampling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    /// Environment variable the runner reads the API key from
    pub api_key_env: String,
    /// Whole-request HTTP timeout
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Fixed query used to pick context for generation
    pub query: String,
    pub top_k: usize,
}

impl Default for CasebookConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("document_store.json"),
            log_dir: PathBuf::from(".casebook/logs"),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            repo_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            model_file: "onnx/model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            cache_dir: PathBuf::from(".casebook/models"),
            max_length: 512,
            dimensions: 384,
            intra_threads: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            top_k: 3,
        }
    }
}

impl CasebookConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            anyhow::bail!("retrieval.top_k must be > 0");
        }
        if self.retrieval.query.trim().is_empty() {
            anyhow::bail!("retrieval.query cannot be empty");
        }
        if self.embedding.dimensions == 0 {
            anyhow::bail!("embedding.dimensions must be > 0");
        }
        if self.embedding.max_length == 0 {
            anyhow::bail!("embedding.max_length must be > 0");
        }
        if self.generation.endpoint.is_empty() {
            anyhow::bail!("generation.endpoint cannot be empty");
        }
        if self.generation.model.is_empty() {
            anyhow::bail!("generation.model cannot be empty");
        }
        Ok(())
    }
}
