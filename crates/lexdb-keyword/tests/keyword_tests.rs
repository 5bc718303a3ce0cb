use lexdb_core::config::Bm25Params;
use lexdb_core::traits::KeywordIndexer;
use lexdb_core::types::{Chunk, Section, Source};
use lexdb_keyword::Bm25Index;

fn chunk(doc_id: &str, seq: usize, text: &str) -> Chunk {
    Chunk {
        id: format!("{doc_id}:{seq}"),
        doc_id: doc_id.to_string(),
        seq,
        text: text.to_string(),
        token_count: text.split_whitespace().count(),
        paragraphs: vec![0],
        section: Section::General,
    }
}

#[test]
fn search_ranks_matching_chunks_first() {
    let index = Bm25Index::default();
    index
        .index(&[
            chunk("ka", 0, "land acquisition compensation award village survey"),
            chunk("ka", 1, "bail granted pending appeal murder conviction sentence"),
            chunk("kb", 0, "writ petition dismissed costs imposed frivolous claim"),
        ])
        .expect("index");

    let hits = index.search("murder bail", 5).expect("search");
    assert_eq!(hits.len(), 1, "only chunks sharing a query term are candidates");
    assert_eq!(hits[0].chunk_id, "ka:1");
    assert_eq!(hits[0].source, Source::Keyword);
    assert!(hits[0].score > 0.0);
}

#[test]
fn higher_term_frequency_never_scores_lower() {
    // Same chunk length, identical corpus otherwise: doubling the term
    // frequency must not decrease the score.
    let index = Bm25Index::new(Bm25Params::default());
    index
        .index(&[
            chunk("m", 0, "zamindari filler1 filler2 filler3 filler4 filler5"),
            chunk("m", 1, "zamindari zamindari filler6 filler7 filler8 filler9"),
        ])
        .expect("index");

    let hits = index.search("zamindari", 5).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk_id, "m:1", "tf=2 ranks at or above tf=1");
    assert!(hits[0].score >= hits[1].score);
}

#[test]
fn out_of_vocabulary_query_returns_empty() {
    let index = Bm25Index::default();
    index.index(&[chunk("d", 0, "specific performance contract damages")]).expect("index");

    assert!(index.search("quantum entanglement", 5).expect("search").is_empty());
    assert!(index.search("", 5).expect("search").is_empty());
    // Stop words alone carry no signal either.
    assert!(index.search("the of and", 5).expect("search").is_empty());
}

#[test]
fn equal_scores_break_ties_by_ascending_chunk_id() {
    let index = Bm25Index::default();
    // Identical text in two chunks: identical BM25 totals.
    index
        .index(&[
            chunk("zz", 0, "gratuity pension superannuation dues"),
            chunk("aa", 0, "gratuity pension superannuation dues"),
        ])
        .expect("index");

    let hits = index.search("gratuity pension", 5).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk_id, "aa:0");
    assert_eq!(hits[1].chunk_id, "zz:0");
    assert_eq!(hits[0].score.to_bits(), hits[1].score.to_bits());
}

#[test]
fn remove_document_drops_its_postings() {
    let index = Bm25Index::default();
    index
        .index(&[
            chunk("gone", 0, "injunction restraining encroachment boundary"),
            chunk("kept", 0, "injunction vacated appeal allowed"),
        ])
        .expect("index");

    index.remove_document("gone").expect("remove");
    let hits = index.search("injunction", 5).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk_id, "kept:0");

    // Removing an unknown document is a no-op.
    index.remove_document("never-indexed").expect("remove unknown");
    assert_eq!(index.search("injunction", 5).expect("search").len(), 1);
}

#[test]
fn append_after_build_is_visible_to_new_searches() {
    let index = Bm25Index::default();
    index.index(&[chunk("one", 0, "arbitration clause invoked")]).expect("index");
    index.index(&[chunk("two", 0, "arbitration award challenged")]).expect("append");

    let hits = index.search("arbitration", 5).expect("search");
    let ids: Vec<&str> = hits.iter().map(|h| h.chunk_id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"one:0") && ids.contains(&"two:0"));
}

#[test]
fn truncates_to_k() {
    let index = Bm25Index::default();
    let chunks: Vec<Chunk> = (0..10)
        .map(|i| chunk("d", i, &format!("limitation period condonation delay extra{i}")))
        .collect();
    index.index(&chunks).expect("index");

    assert_eq!(index.search("limitation delay", 3).expect("search").len(), 3);
    assert!(index.search("limitation", 0).expect("search").is_empty());
}

#[test]
fn search_is_bit_identical_across_runs() {
    let build = || {
        let index = Bm25Index::default();
        index
            .index(&[
                chunk("d", 0, "tenancy eviction arrears rent deposit"),
                chunk("d", 1, "eviction decree execution stay arrears"),
                chunk("e", 0, "rent control act applicability tenancy"),
            ])
            .expect("index");
        index
    };

    let a = build().search("eviction rent arrears", 5).expect("search");
    let b = build().search("eviction rent arrears", 5).expect("search");
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.chunk_id, y.chunk_id);
        assert_eq!(x.score.to_bits(), y.score.to_bits(), "scores are bit-identical");
    }
}

#[test]
fn reindexed_chunk_with_free_form_id_is_fully_removable() {
    // Chunk ids are opaque to the index; re-adding one whose id does not
    // embed the doc id, then removing the document, must leave no live
    // postings behind.
    let index = Bm25Index::default();
    let mut c = chunk("caveat", 0, "caveat lodged registry advance notice");
    c.id = "caveat-entry".to_string();
    index.index(std::slice::from_ref(&c)).expect("index");
    index.index(std::slice::from_ref(&c)).expect("re-index");

    index.remove_document("caveat").expect("remove");
    assert!(index.search("registry notice", 5).expect("search").is_empty(), "ghost postings");
}
