// Deterministic stand-in for the ONNX encoder.
//
// Lowercased alphanumeric words are hashed into signed buckets and the bag is
// L2-normalized, so identical text always maps to the identical unit vector and
// texts sharing words score higher than unrelated ones.

use crate::embeddings::{TextEncoder, l2_normalize};
use anyhow::Result;

pub struct HashingEncoder {
    dimensions: usize,
}

impl HashingEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl TextEncoder for HashingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = blake3::hash(word.to_lowercase().as_bytes());
            let bytes = hash.as_bytes();
            let bucket = u64::from_le_bytes(bytes[..8].try_into()?) as usize % self.dimensions;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        l2_normalize(&mut vector);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "hashing-test"
    }
}

/// Encoder whose every call fails, for error-path tests
pub struct BrokenEncoder;

impl TextEncoder for BrokenEncoder {
    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("inference backend unavailable")
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn model_name(&self) -> &str {
        "broken-test"
    }
}
