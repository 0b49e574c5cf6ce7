// ONNX Runtime Sentence Encoder
//
// Tokenizes with HuggingFace tokenizers, runs the transformer through ONNX Runtime
// on the CPU, mean-pools `last_hidden_state` over the attention mask and
// L2-normalizes the result.

use super::{TextEncoder, pool_batch};
use crate::config::EmbeddingConfig;
use anyhow::{Context, Result};
use ndarray::{Array2, Ix3};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection,
    TruncationParams, TruncationStrategy,
};
use tracing::{debug, info, warn};

/// ONNX Runtime embedding model with mean pooling
pub struct OrtEmbeddingModel {
    // ort needs exclusive access to run a session; callers only ever see &self
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    /// Whether the graph declares a `token_type_ids` input (BERT does, some exports don't)
    wants_token_type_ids: bool,
    dimensions: usize,
    model_name: String,
    max_length: usize,
}

impl OrtEmbeddingModel {
    /// Load tokenizer and ONNX graph from local files
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `tokenizer_path` - Path to the tokenizer config (tokenizer.json)
    /// * `config` - Model name, expected dimensions, truncation length and threading
    pub fn new(
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
        config: &EmbeddingConfig,
    ) -> Result<Self> {
        info!("🚀 Initializing OrtEmbeddingModel for {}", config.repo_id);

        let mut tokenizer = Tokenizer::from_file(tokenizer_path.as_ref()).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load tokenizer from {:?}: {}",
                tokenizer_path.as_ref(),
                e
            )
        })?;

        let padding = batch_padding(&tokenizer);
        debug!("Padding with {:?} (id {})", padding.pad_token, padding.pad_id);
        tokenizer.with_padding(Some(padding));

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        let session = Self::create_session(model_path.as_ref(), config.intra_threads)
            .context("Failed to create ONNX Runtime session")?;

        let wants_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        info!("✅ OrtEmbeddingModel initialized");
        info!("   Model: {}", config.repo_id);
        info!("   Dimensions: {}", config.dimensions);
        info!("   Max length: {}", config.max_length);

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            wants_token_type_ids,
            dimensions: config.dimensions,
            model_name: config.repo_id.clone(),
            max_length: config.max_length,
        })
    }

    fn create_session(model_path: &Path, intra_threads: Option<usize>) -> Result<Session> {
        let mut builder = Session::builder()
            .context("Failed to create SessionBuilder")?
            .with_optimization_level(GraphOptimizationLevel::Level3)?;

        if let Some(threads) = intra_threads {
            builder = builder.with_intra_threads(threads)?;
        }

        let session = builder
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {:?}", model_path))?;

        info!("✅ ONNX session created successfully");
        Ok(session)
    }

    /// Encode a batch of texts into unit-norm embeddings, one inference call
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("📝 Tokenizing {} texts...", texts.len());

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Failed to tokenize input texts: {}", e))?;

        let batch_size = encodings.len();
        let seq_length = encodings[0].len(); // padded to the longest in the batch

        let mut input_ids_vec = Vec::with_capacity(batch_size * seq_length);
        let mut attention_mask_vec = Vec::with_capacity(batch_size * seq_length);
        let mut token_type_ids_vec = Vec::with_capacity(batch_size * seq_length);

        for encoding in &encodings {
            input_ids_vec.extend(encoding.get_ids().iter().map(|&id| id as i64));
            attention_mask_vec.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
            token_type_ids_vec.extend(encoding.get_type_ids().iter().map(|&t| t as i64));
        }

        let input_ids = Array2::from_shape_vec((batch_size, seq_length), input_ids_vec)
            .context("Failed to create input_ids array")?;
        let attention_mask = Array2::from_shape_vec((batch_size, seq_length), attention_mask_vec)
            .context("Failed to create attention_mask array")?;
        let mask_rows = attention_mask.clone();

        let input_ids_tensor =
            Tensor::from_array(input_ids).context("Failed to create input_ids tensor")?;
        let attention_mask_tensor =
            Tensor::from_array(attention_mask).context("Failed to create attention_mask tensor")?;

        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("ONNX session mutex poisoned, recovering: {}", poisoned);
                poisoned.into_inner()
            }
        };

        let run_result = if self.wants_token_type_ids {
            let token_type_ids =
                Array2::from_shape_vec((batch_size, seq_length), token_type_ids_vec)
                    .context("Failed to create token_type_ids array")?;
            let token_type_ids_tensor = Tensor::from_array(token_type_ids)
                .context("Failed to create token_type_ids tensor")?;
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor,
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
        };

        let outputs = run_result.map_err(|e| {
            tracing::error!(
                "🚨 ONNX inference failed (batch {}, seq {}): {:?}",
                batch_size,
                seq_length,
                e
            );
            anyhow::anyhow!("Failed to run ONNX inference: {}", e)
        })?;

        let hidden = outputs["last_hidden_state"]
            .try_extract_array::<f32>()
            .context("Failed to extract last_hidden_state tensor")?
            .into_dimensionality::<Ix3>()
            .context("last_hidden_state is not [batch, seq, hidden]")?;

        debug!("📊 Output tensor shape: {:?}", hidden.shape());

        if hidden.shape()[0] != batch_size {
            anyhow::bail!(
                "Model {} returned {} rows for a batch of {}",
                self.model_name,
                hidden.shape()[0],
                batch_size
            );
        }

        let hidden_size = hidden.shape()[2];
        if hidden_size != self.dimensions {
            anyhow::bail!(
                "Model {} produced {}-dimensional vectors, expected {}",
                self.model_name,
                hidden_size,
                self.dimensions
            );
        }

        Ok(pool_batch(hidden, mask_rows.view()))
    }

    /// Get the maximum sequence length
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl TextEncoder for OrtEmbeddingModel {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No embedding returned from encode_batch"))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Right-padding to the longest sequence in a batch, using the tokenizer's own pad token
///
/// A tokenizer.json that already declares padding keeps its pad token and id; only
/// the strategy is forced. Otherwise `[PAD]` (BERT) or `<pad>` (RoBERTa) is looked
/// up in the vocabulary, falling back to id 0.
pub(crate) fn batch_padding(tokenizer: &Tokenizer) -> PaddingParams {
    if let Some(existing) = tokenizer.get_padding() {
        return PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_to_multiple_of: None,
            ..existing.clone()
        };
    }

    let (pad_token, pad_id) = ["[PAD]", "<pad>"]
        .iter()
        .find_map(|token| tokenizer.token_to_id(token).map(|id| (token.to_string(), id)))
        .unwrap_or_else(|| {
            warn!("Tokenizer has no pad token, padding with id 0");
            ("[PAD]".to_string(), 0)
        });

    PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        direction: PaddingDirection::Right,
        pad_id,
        pad_type_id: 0,
        pad_token,
        pad_to_multiple_of: None,
    }
}
