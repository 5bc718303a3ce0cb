use lexdb_embed::{default_embedder, Embedder, HashEmbedder};

#[test]
fn hash_embedder_shape_and_determinism() {
    let embedder = HashEmbedder::new(384);
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 384, "embedding dim is 384");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn different_texts_produce_different_vectors() {
    let embedder = default_embedder(64);
    let a = embedder.embed("writ of habeas corpus").expect("embed");
    let b = embedder.embed("land acquisition compensation").expect("embed");
    assert_eq!(a.len(), embedder.dim());
    assert_ne!(a, b);
}
