// Retrieval Orchestrator
//
// Owns the document log and similarity index, seeds them with industry and
// company context, and turns a fixed query into a retrieval-augmented prompt
// for the generation backend.

use crate::config::CasebookConfig;
use crate::document::{DocumentLog, Metadata, tagged};
use crate::error::Result;
use crate::generation::{
    ChatCompletionRequest, GenerationBackend, SamplingParams, first_choice_text,
};
use crate::index::SimilarityIndex;
use chrono::Local;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Industry and company text the knowledge base starts from
#[derive(Debug, Clone, PartialEq)]
pub struct SeedContext {
    pub industry: String,
    pub company: String,
}

impl SeedContext {
    pub fn new(industry: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            company: company.into(),
        }
    }

    /// Accept research results of any JSON shape
    ///
    /// Strings are used verbatim; objects, arrays and scalars are serialized as JSON.
    pub fn from_values(industry: &Value, company: &Value) -> Self {
        Self::new(value_to_text(industry), value_to_text(company))
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// What the agent asks for and how
#[derive(Debug, Clone, PartialEq)]
pub struct RagSettings {
    /// Fixed retrieval query, never user-supplied
    pub query: String,
    pub top_k: usize,
    /// Backend model identifier
    pub model: String,
    pub sampling: SamplingParams,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self::from_config(&CasebookConfig::default())
    }
}

impl RagSettings {
    pub fn from_config(config: &CasebookConfig) -> Self {
        Self {
            query: config.retrieval.query.clone(),
            top_k: config.retrieval.top_k,
            model: config.generation.model.clone(),
            sampling: SamplingParams::from(&config.generation),
        }
    }
}

/// Wrap retrieved context in the use-case instruction template
pub fn build_prompt(context: &str) -> String {
    format!(
        "Based on the following context and data, propose specific AI/ML use cases for improving customer satisfaction and operations:

Context:
{context}

Please provide detailed use cases that leverage AI/ML technologies to address specific business needs and opportunities."
    )
}

/// Retrieval-augmented use-case generator
pub struct RagAgent {
    log: DocumentLog,
    index: Box<dyn SimilarityIndex>,
    backend: Box<dyn GenerationBackend>,
    settings: RagSettings,
}

impl RagAgent {
    /// Take ownership of the components and add the two seed documents
    ///
    /// Industry context is added before company context.
    pub fn new(
        seed: SeedContext,
        log: DocumentLog,
        index: Box<dyn SimilarityIndex>,
        backend: Box<dyn GenerationBackend>,
        settings: RagSettings,
    ) -> Result<Self> {
        let mut agent = Self {
            log,
            index,
            backend,
            settings,
        };

        agent.add_knowledge(&seed.industry, tagged("industry_data"))?;
        agent.add_knowledge(&seed.company, tagged("company_data"))?;

        info!(
            "🧠 Knowledge base seeded ({} documents, {} indexed)",
            agent.log.len(),
            agent.index.len()
        );
        Ok(agent)
    }

    /// Store a document and index its embedding
    pub fn add_knowledge(&mut self, content: &str, metadata: Metadata) -> Result<u64> {
        let doc_id = self.log.add(content, metadata)?;
        self.index.insert(doc_id, content)?;
        Ok(doc_id)
    }

    /// Generate use cases from the most relevant documents
    ///
    /// Nothing is written unless the backend returns usable text. On success the
    /// text is stored as a `generated_use_cases` document and returned. Every
    /// failure, including the final store, is logged before it is returned.
    pub fn generate(&mut self) -> Result<String> {
        let text = match self.retrieve_and_complete() {
            Ok(text) => text,
            Err(e) => {
                error!("Error generating use cases: {}", e);
                return Err(e);
            }
        };

        let mut metadata = tagged("generated_use_cases");
        metadata.insert(
            "timestamp".to_string(),
            Value::String(Local::now().to_rfc3339()),
        );
        let doc_id = match self.add_knowledge(&text, metadata) {
            Ok(doc_id) => doc_id,
            Err(e) => {
                error!("Error storing generated use cases: {}", e);
                return Err(e);
            }
        };

        info!("✅ Generated use cases stored as document {}", doc_id);
        Ok(text)
    }

    fn retrieve_and_complete(&self) -> Result<String> {
        let hits = self.index.search(&self.settings.query, self.settings.top_k)?;
        debug!("Retrieved {} documents for generation", hits.len());

        let mut sections = Vec::with_capacity(hits.len());
        for hit in &hits {
            match self.log.get(hit.doc_id) {
                Some(doc) => sections.push(doc.content.as_str()),
                None => warn!("Indexed document {} missing from the log", hit.doc_id),
            }
        }
        let context = sections.join("\n\n");

        let request = ChatCompletionRequest::single_user(
            self.settings.model.clone(),
            build_prompt(&context),
            self.settings.sampling,
        );
        let response = self.backend.complete(&request)?;

        Ok(first_choice_text(response)?)
    }

    pub fn log(&self) -> &DocumentLog {
        &self.log
    }

    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    pub fn settings(&self) -> &RagSettings {
        &self.settings
    }
}
