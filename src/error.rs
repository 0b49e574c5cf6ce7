use std::path::PathBuf;
use thiserror::Error;

/// Failures of the JSON-backed document log
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read document store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document store {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize documents: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist document store {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document content must not be empty")]
    EmptyContent,
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Similarity index is empty")]
    Empty,

    #[error("Vector dimensions {actual} do not match expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Failed to encode text: {0:#}")]
    Encoding(anyhow::Error),
}

/// Failures talking to the chat-completion backend
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Backend response contained no completion text")]
    EmptyResponse,

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T> = std::result::Result<T, RagError>;
