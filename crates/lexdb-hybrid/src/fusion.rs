//! Reciprocal rank fusion of the two result streams.
//!
//! Rank-based rather than score-based: raw BM25 and cosine scores are not
//! on comparable scales, so scores are discarded and only each hit's
//! 1-based position in its own list matters:
//!
//! `fused(c) = w_kw / (rank_kw(c) + kappa) + w_sem / (rank_sem(c) + kappa)`
//!
//! A chunk absent from one list simply receives no contribution from it.

use std::collections::HashMap;

use lexdb_core::config::FusionParams;
use lexdb_core::types::{ChunkId, RankedResult, ScoredCandidate, SourceSet};

/// Merge the two ranked lists into at most `k` results, ordered by
/// descending fused score; ties go to chunks present in both lists, then
/// to the ascending chunk id. Empty inputs degrade to single-source
/// ranking (or an empty output), never an error.
pub fn fuse(
    keyword: &[ScoredCandidate],
    semantic: &[ScoredCandidate],
    k: usize,
    params: &FusionParams,
) -> Vec<RankedResult> {
    let mut fused: HashMap<ChunkId, (f32, SourceSet)> = HashMap::new();

    for (i, hit) in keyword.iter().enumerate() {
        let entry = fused.entry(hit.chunk_id.clone()).or_default();
        entry.0 += params.keyword_weight / (i as f32 + 1.0 + params.kappa);
        entry.1.keyword = true;
    }
    for (i, hit) in semantic.iter().enumerate() {
        let entry = fused.entry(hit.chunk_id.clone()).or_default();
        entry.0 += params.semantic_weight / (i as f32 + 1.0 + params.kappa);
        entry.1.semantic = true;
    }

    let mut merged: Vec<(ChunkId, f32, SourceSet)> =
        fused.into_iter().map(|(id, (score, sources))| (id, score, sources)).collect();
    merged.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.both().cmp(&a.2.both()))
            .then_with(|| a.0.cmp(&b.0))
    });
    merged.truncate(k);

    merged
        .into_iter()
        .enumerate()
        .map(|(i, (chunk_id, fused_score, sources))| RankedResult {
            chunk_id,
            fused_score,
            rank: i + 1,
            sources,
        })
        .collect()
}
