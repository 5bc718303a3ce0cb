//! lexdb-embed
//!
//! The embedding capability consumed by the retrieval engine. Model-backed
//! embedders live behind the [`Embedder`] trait and are wired in by the
//! caller; this crate ships the deterministic hashing embedder used for
//! tests and fully offline runs.

use std::sync::Arc;

pub use lexdb_core::traits::Embedder;

/// Token-bucket hashing embedder: each whitespace token hashes into one of
/// `dim` buckets, and the vector is L2-normalized. No semantics, but fully
/// deterministic for identical input, which is all the engine contract
/// requires of an embedder within one index lifetime.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Default embedder for CLI and tests: the hashing embedder at the given
/// dimension (384 matches the MiniLM family the pipeline originally used).
pub fn default_embedder(dim: usize) -> Arc<dyn Embedder> {
    Arc::new(HashEmbedder::new(dim))
}
