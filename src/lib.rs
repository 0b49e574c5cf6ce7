// Casebook - Retrieval-Augmented Use-Case Generation Library
//!
//! Casebook keeps a small append-only document log, embeds every document with a
//! mean-pooled transformer encoder, and retrieves the closest documents as context
//! for a chat-completion call whose answer is written back into the log.

pub mod agent;
pub mod config;
pub mod document;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod index;


// Re-export common types
pub use agent::{RagAgent, RagSettings, SeedContext};
pub use config::CasebookConfig;
pub use document::{Document, DocumentLog};
pub use embeddings::TextEncoder;
pub use error::{GenerationError, IndexError, RagError, StoreError};
pub use generation::{GenerationBackend, HttpChatBackend};
pub use index::{FlatIndex, SearchHit, SimilarityIndex};
