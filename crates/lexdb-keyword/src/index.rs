//! BM25 index with snapshot reads.
//!
//! `index`/`remove_document` clone the current [`KeywordState`], apply the
//! mutation, and swap the new state in behind a lock. Queries clone the
//! `Arc` once and score against that snapshot, so an in-flight search is
//! never affected by a concurrent ingest.

use std::sync::{Arc, PoisonError, RwLock};

use lexdb_core::config::Bm25Params;
use lexdb_core::traits::{KeywordIndexer, KeywordReader};
use lexdb_core::types::{Chunk, ScoredCandidate, Source};

use crate::state::KeywordState;
use crate::tokenize::tokenize;

pub struct Bm25Index {
    params: Bm25Params,
    state: RwLock<Arc<KeywordState>>,
}

impl Bm25Index {
    pub fn new(params: Bm25Params) -> Self {
        Self { params, state: RwLock::new(Arc::new(KeywordState::new())) }
    }

    pub fn snapshot(&self) -> Arc<KeywordState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, next: KeywordState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }
}

impl Default for Bm25Index {
    fn default() -> Self {
        Self::new(Bm25Params::default())
    }
}

/// A captured snapshot plus the scoring constants: searches it answers are
/// unaffected by anything published after [`Bm25Index::reader`] returned.
pub struct Bm25Reader {
    params: Bm25Params,
    state: Arc<KeywordState>,
}

impl KeywordReader for Bm25Reader {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredCandidate>> {
        Ok(score(&self.state, &self.params, query, k))
    }
}

impl KeywordIndexer for Bm25Index {
    type Reader = Bm25Reader;

    fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()> {
        let mut next = (*self.snapshot()).clone();
        for chunk in chunks {
            next.add_chunk(chunk);
        }
        self.publish(next);
        Ok(())
    }

    fn remove_document(&self, doc_id: &str) -> anyhow::Result<()> {
        let mut next = (*self.snapshot()).clone();
        next.remove_document(doc_id);
        self.publish(next);
        Ok(())
    }

    fn reader(&self) -> Bm25Reader {
        Bm25Reader { params: self.params, state: self.snapshot() }
    }
}

/// Score every chunk sharing at least one query term, ordered by
/// descending score with ties broken by ascending chunk id. Unknown terms
/// contribute nothing; non-positive totals are excluded.
pub fn score(state: &KeywordState, params: &Bm25Params, query: &str, k: usize) -> Vec<ScoredCandidate> {
    let terms = tokenize(query);
    if terms.is_empty() || state.chunk_count() == 0 || k == 0 {
        return Vec::new();
    }

    let n = state.chunk_count() as f32;
    let avg_len = state.average_length();
    let Bm25Params { k1, b } = *params;

    let mut totals: std::collections::HashMap<u32, f32> = std::collections::HashMap::new();
    for term in &terms {
        let Some(postings) = state.postings(term) else {
            continue;
        };
        let n_t = postings.len() as f32;
        let idf = (1.0 + (n - n_t + 0.5) / (n_t + 0.5)).ln();
        for posting in postings {
            let tf = posting.tf as f32;
            let len = state.length(posting.chunk) as f32;
            let denom = tf + k1 * (1.0 - b + b * len / avg_len.max(f32::EPSILON));
            *totals.entry(posting.chunk).or_insert(0.0) += idf * (tf * (k1 + 1.0)) / denom;
        }
    }

    let mut hits: Vec<(u32, f32)> =
        totals.into_iter().filter(|&(_, score)| score > 0.0).collect();
    hits.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| state.chunk_id(a.0).cmp(state.chunk_id(b.0)))
    });
    hits.truncate(k);
    hits.into_iter()
        .map(|(internal, score)| ScoredCandidate {
            chunk_id: state.chunk_id(internal).to_string(),
            score,
            source: Source::Keyword,
        })
        .collect()
}
