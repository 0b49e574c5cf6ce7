use super::{SearchHit, SimilarityIndex};
use crate::embeddings::{TextEncoder, cosine_similarity};
use crate::error::IndexError;
use std::sync::Arc;
use tracing::debug;

/// Brute-force cosine index over parallel `doc_ids` / `embeddings` vectors
///
/// Entries are insertion-ordered and never removed.
pub struct FlatIndex {
    encoder: Arc<dyn TextEncoder>,
    dimensions: usize,
    doc_ids: Vec<u64>,
    embeddings: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(encoder: Arc<dyn TextEncoder>) -> Self {
        Self::with_capacity(encoder, 0)
    }

    pub fn with_capacity(encoder: Arc<dyn TextEncoder>, capacity: usize) -> Self {
        let dimensions = encoder.dimensions();
        Self {
            encoder,
            dimensions,
            doc_ids: Vec::with_capacity(capacity),
            embeddings: Vec::with_capacity(capacity),
        }
    }

    /// Store a precomputed embedding
    pub fn insert_vector(&mut self, doc_id: u64, vector: Vec<f32>) -> Result<(), IndexError> {
        if vector.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: vector.len(),
            });
        }

        self.doc_ids.push(doc_id);
        self.embeddings.push(vector);
        Ok(())
    }

    /// Document ids in insertion order
    pub fn doc_ids(&self) -> &[u64] {
        &self.doc_ids
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Rank stored entries against an already-encoded query
    ///
    /// Scores are sorted ascending with a stable sort and read back from the end,
    /// so equal scores come out with the later-inserted entry first.
    pub fn search_vector(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if self.embeddings.is_empty() {
            return Err(IndexError::Empty);
        }
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, cosine_similarity(query, vector)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(scored
            .into_iter()
            .rev()
            .take(top_k)
            .map(|(idx, score)| SearchHit {
                doc_id: self.doc_ids[idx],
                score,
            })
            .collect())
    }
}

impl SimilarityIndex for FlatIndex {
    fn insert(&mut self, doc_id: u64, text: &str) -> Result<(), IndexError> {
        let vector = self.encoder.encode(text).map_err(IndexError::Encoding)?;
        self.insert_vector(doc_id, vector)?;
        debug!("Indexed document {} ({} entries)", doc_id, self.doc_ids.len());
        Ok(())
    }

    fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if self.embeddings.is_empty() {
            return Err(IndexError::Empty);
        }

        let query_vector = self.encoder.encode(query).map_err(IndexError::Encoding)?;
        let hits = self.search_vector(&query_vector, top_k)?;

        debug!(
            "Flat search over {} entries returned {} hits",
            self.embeddings.len(),
            hits.len()
        );
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.doc_ids.len()
    }
}
