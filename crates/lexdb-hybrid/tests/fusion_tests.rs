use lexdb_core::config::FusionParams;
use lexdb_core::types::{ScoredCandidate, Source};
use lexdb_hybrid::fuse;

fn hit(id: &str, score: f32, source: Source) -> ScoredCandidate {
    ScoredCandidate { chunk_id: id.to_string(), score, source }
}

fn keyword_list(ids: &[&str]) -> Vec<ScoredCandidate> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| hit(id, 10.0 - i as f32, Source::Keyword))
        .collect()
}

fn semantic_list(ids: &[&str]) -> Vec<ScoredCandidate> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| hit(id, 0.9 - 0.1 * i as f32, Source::Semantic))
        .collect()
}

#[test]
fn empty_inputs_degenerate_without_error() {
    let params = FusionParams::default();
    assert!(fuse(&[], &[], 5, &params).is_empty());

    // One empty list: the other list's ordering survives unchanged, scored
    // by the single-source formula.
    let kw = keyword_list(&["a:0", "a:1", "b:0"]);
    let fused = fuse(&kw, &[], 5, &params);
    assert_eq!(fused.len(), 3);
    for (i, r) in fused.iter().enumerate() {
        assert_eq!(r.chunk_id, kw[i].chunk_id);
        assert_eq!(r.rank, i + 1);
        let expected = 0.5 / (i as f32 + 1.0 + 60.0);
        assert!((r.fused_score - expected).abs() < 1e-9);
        assert!(r.sources.keyword && !r.sources.semantic);
    }
}

#[test]
fn every_input_chunk_appears_unless_truncated() {
    let params = FusionParams::default();
    let kw = keyword_list(&["a:0", "a:1", "c:0"]);
    let sem = semantic_list(&["b:0", "a:1", "d:0"]);

    let fused = fuse(&kw, &sem, 10, &params);
    let ids: Vec<&str> = fused.iter().map(|r| r.chunk_id.as_str()).collect();
    for id in ["a:0", "a:1", "b:0", "c:0", "d:0"] {
        assert!(ids.contains(&id), "{id} missing from fused output");
    }

    for r in &fused {
        assert_eq!(r.sources.keyword, kw.iter().any(|h| h.chunk_id == r.chunk_id));
        assert_eq!(r.sources.semantic, sem.iter().any(|h| h.chunk_id == r.chunk_id));
    }

    let truncated = fuse(&kw, &sem, 2, &params);
    assert_eq!(truncated.len(), 2);
}

#[test]
fn chunk_in_both_lists_outranks_single_source_ties() {
    // With kappa = 0, rank 1 in one list scores w, and rank 2 in both
    // lists scores w/2 + w/2 = w: an exact three-way tie between "a"
    // (keyword only), "b" (both), and "c" (semantic only).
    let params = FusionParams { keyword_weight: 0.5, semantic_weight: 0.5, kappa: 0.0 };
    let kw = keyword_list(&["a:0", "b:0"]);
    let sem = semantic_list(&["c:0", "b:0"]);

    let fused = fuse(&kw, &sem, 3, &params);
    let ids: Vec<&str> = fused.iter().map(|r| r.chunk_id.as_str()).collect();
    assert_eq!(ids, vec!["b:0", "a:0", "c:0"], "both-lists first, then ascending chunk id");
    assert!(fused[0].sources.both());
}

#[test]
fn rank_one_in_each_list_ties_broken_by_ascending_chunk_id() {
    // The end-to-end scenario's fusion step: one chunk found only by
    // keyword search, another only by semantic search, both at rank 1
    // with equal weights. Each scores 0.5/61; ascending id decides.
    let params = FusionParams::default();
    let kw = keyword_list(&["case:1"]);
    let sem = semantic_list(&["case:2"]);

    let fused = fuse(&kw, &sem, 5, &params);
    assert_eq!(fused.len(), 2);
    assert_eq!(fused[0].chunk_id, "case:1");
    assert_eq!(fused[1].chunk_id, "case:2");
    assert_eq!(fused[0].rank, 1);
    assert_eq!(fused[1].rank, 2);
    let expected = 0.5 / 61.0;
    assert!((fused[0].fused_score - expected).abs() < 1e-9);
    assert!((fused[1].fused_score - expected).abs() < 1e-9);
    assert!(fused[0].sources.keyword && !fused[0].sources.semantic);
    assert!(fused[1].sources.semantic && !fused[1].sources.keyword);
}

#[test]
fn weights_shift_the_balance() {
    let params = FusionParams { keyword_weight: 0.9, semantic_weight: 0.1, kappa: 60.0 };
    let kw = keyword_list(&["kw:0"]);
    let sem = semantic_list(&["sem:0"]);

    let fused = fuse(&kw, &sem, 2, &params);
    assert_eq!(fused[0].chunk_id, "kw:0", "heavier keyword weight wins at equal rank");
}
