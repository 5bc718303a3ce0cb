//! lexdb-semantic
//!
//! In-memory implementation of the [`SemanticIndex`] contract: an exact
//! cosine scan over upserted chunk vectors. Swapping in a real vector
//! database means implementing the same trait; the ranking logic never
//! hard-wires a backend.
//!
//! The entry map is an owned value republished whole on every mutation,
//! the same copy-then-swap discipline the keyword index follows, so a
//! reader captured before an upsert keeps answering from its snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use lexdb_core::error::Error;
pub use lexdb_core::traits::{SemanticIndex, SemanticReader};
use lexdb_core::types::{ChunkId, ScoredCandidate, SemanticEntry, Source};

pub struct CosineIndex {
    dim: usize,
    // BTreeMap keeps chunk ids ordered, which makes the ascending-id
    // tie-break fall out of a stable sort for free.
    entries: RwLock<Arc<BTreeMap<ChunkId, Vec<f32>>>>,
}

impl CosineIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, entries: RwLock::new(Arc::new(BTreeMap::new())) }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<BTreeMap<ChunkId, Vec<f32>>> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, next: BTreeMap<ChunkId, Vec<f32>>) {
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }
}

/// A captured snapshot of the entry map; unaffected by later mutation.
pub struct CosineReader {
    dim: usize,
    entries: Arc<BTreeMap<ChunkId, Vec<f32>>>,
}

impl SemanticReader for CosineReader {
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<ScoredCandidate>> {
        if query_vec.len() != self.dim {
            return Err(Error::Dimension { expected: self.dim, got: query_vec.len() }.into());
        }
        let mut hits: Vec<ScoredCandidate> = self
            .entries
            .iter()
            .map(|(id, vector)| ScoredCandidate {
                chunk_id: id.clone(),
                score: cosine(query_vec, vector),
                source: Source::Semantic,
            })
            .collect();
        // Stable sort over id-ordered input: equal scores stay in
        // ascending chunk-id order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

impl SemanticIndex for CosineIndex {
    type Reader = CosineReader;

    /// Idempotent per chunk id: re-upserting replaces the stored vector.
    fn upsert(&self, new_entries: &[SemanticEntry]) -> anyhow::Result<()> {
        for entry in new_entries {
            if entry.vector.len() != self.dim {
                return Err(Error::Dimension { expected: self.dim, got: entry.vector.len() }.into());
            }
        }
        let mut next = (*self.snapshot()).clone();
        for entry in new_entries {
            next.insert(entry.chunk_id.clone(), entry.vector.clone());
        }
        self.publish(next);
        Ok(())
    }

    fn remove(&self, chunk_ids: &[ChunkId]) -> anyhow::Result<()> {
        let mut next = (*self.snapshot()).clone();
        for id in chunk_ids {
            next.remove(id);
        }
        self.publish(next);
        Ok(())
    }

    fn reader(&self) -> CosineReader {
        CosineReader { dim: self.dim, entries: self.snapshot() }
    }
}

/// Cosine similarity in [-1, 1]; zero vectors score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
