// Document Log
//
// Append-only record of ingested text fragments. The whole collection lives in
// memory and is rewritten to a single JSON file on every add.

use crate::error::StoreError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Free-form document metadata (`{"type": "industry_data"}` and friends)
pub type Metadata = Map<String, Value>;

/// `{"type": kind}`
pub fn tagged(kind: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("type".to_string(), Value::String(kind.to_string()));
    metadata
}

/// One immutable text fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// ISO-8601 local time of insertion
    pub timestamp: String,
}

/// JSON-file-backed append-only document collection
///
/// Ids are dense and 0-based: the nth document added gets id `n - 1`.
/// A single process is assumed to own the backing file.
#[derive(Debug)]
pub struct DocumentLog {
    path: PathBuf,
    documents: Vec<Document>,
}

impl DocumentLog {
    /// Open the log at `path`, loading every stored document if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let documents = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str::<Vec<Document>>(&raw).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Vec::new()
        };

        info!(
            "📂 Document log opened at {} ({} documents)",
            path.display(),
            documents.len()
        );

        Ok(Self { path, documents })
    }

    /// Append a document and rewrite the backing file
    ///
    /// If the rewrite fails the append is undone, so memory and disk never disagree.
    pub fn add(&mut self, content: &str, metadata: Metadata) -> Result<u64, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }

        let id = self.documents.len() as u64;
        self.documents.push(Document {
            id,
            content: content.to_string(),
            metadata,
            timestamp: Local::now().to_rfc3339(),
        });

        if let Err(e) = self.persist() {
            self.documents.pop();
            return Err(e);
        }

        debug!("Added document {} ({} chars)", id, content.len());
        Ok(id)
    }

    /// Linear lookup by id
    pub fn get(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(&self.documents)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, payload).map_err(|source| StoreError::Persist {
            path: self.path.clone(),
            source,
        })
    }
}
