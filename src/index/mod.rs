// Similarity Index Module
//
// Top-k cosine retrieval over document embeddings. `FlatIndex` is an exhaustive
// scan meant for tens to low hundreds of documents; larger corpora want an ANN
// implementation of `SimilarityIndex` instead.

use crate::error::IndexError;

pub mod flat;

pub use flat::FlatIndex;

/// One ranked search result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub doc_id: u64,
    pub score: f32,
}

pub trait SimilarityIndex {
    /// Embed `text` and remember it under `doc_id`
    fn insert(&mut self, doc_id: u64, text: &str) -> Result<(), IndexError>;

    /// The `top_k` stored documents closest to `query`, best first
    ///
    /// Returns `min(top_k, len)` hits. Searching an empty index fails with
    /// `IndexError::Empty`.
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, IndexError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
