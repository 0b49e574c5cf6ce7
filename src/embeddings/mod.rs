// Casebook's Embeddings Module
//
// Sentence embeddings for the similarity index: a transformer backbone run through
// ONNX Runtime, mean-pooled over the attention mask and L2-normalized.

use crate::config::EmbeddingConfig;
use anyhow::Result;
use ndarray::{ArrayView2, ArrayView3, Axis};

use self::model_manager::ModelManager;
use self::ort_model::OrtEmbeddingModel;

pub mod model_manager; // Model downloading from HuggingFace
pub mod ort_model; // ONNX Runtime sentence encoder

/// Anything that turns text into a fixed-length, unit-norm vector
///
/// Implementations are shared across the index and must be deterministic for a
/// fixed model and input.
pub trait TextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Length of every vector returned by `encode`
    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Resolve the configured model through the HuggingFace cache and load it
///
/// Any failure here is fatal for the caller: there is no fallback encoder.
pub fn load_encoder(config: &EmbeddingConfig) -> Result<OrtEmbeddingModel> {
    tracing::info!("🚀 Loading sentence encoder {}", config.repo_id);

    let manager = ModelManager::new(config.cache_dir.clone())?;
    let paths = manager.ensure_model_downloaded(config)?;

    OrtEmbeddingModel::new(paths.model, paths.tokenizer, config)
}

/// Attention-mask-weighted mean over token vectors
///
/// `hidden` is `[seq_len, hidden_size]`; positions whose mask is zero are skipped.
/// The denominator is floored at 1e-9 so an all-masked input yields a zero vector.
pub fn mean_pool(hidden: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let hidden_size = hidden.ncols();
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (row, &m) in hidden.rows().into_iter().zip(attention_mask.iter()) {
        if m > 0 {
            let weight = m as f32;
            for (acc, val) in sum.iter_mut().zip(row.iter()) {
                *acc += val * weight;
            }
            count += weight;
        }
    }

    let denom = count.max(1e-9);
    sum.iter_mut().for_each(|v| *v /= denom);
    sum
}

/// Mean-pool and normalize every row of a padded `[batch, seq_len, hidden_size]` output
///
/// Row `i` of `attention_mask` belongs to row `i` of `hidden`; padded positions carry
/// a zero mask and never reach the average.
pub fn pool_batch(hidden: ArrayView3<'_, f32>, attention_mask: ArrayView2<'_, i64>) -> Vec<Vec<f32>> {
    hidden
        .axis_iter(Axis(0))
        .zip(attention_mask.axis_iter(Axis(0)))
        .map(|(tokens, mask)| {
            let mask: Vec<i64> = mask.to_vec();
            let mut pooled = mean_pool(tokens, &mask);
            l2_normalize(&mut pooled);
            pooled
        })
        .collect()
}

/// Scale `vector` to unit length in place (zero vectors are left alone)
pub fn l2_normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for val in vector.iter_mut() {
            *val /= magnitude;
        }
    }
}

pub fn cosine_similarity(vec_a: &[f32], vec_b: &[f32]) -> f32 {
    if vec_a.len() != vec_b.len() {
        return 0.0;
    }

    let dot_product: f32 = vec_a.iter().zip(vec_b.iter()).map(|(a, b)| a * b).sum();
    let norm_a: f32 = vec_a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = vec_b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
