use crate::types::{Chunk, ChunkId, Document, ResolvedChunk, ScoredCandidate, SemanticEntry};

/// Text → fixed-length vector. Must be deterministic for identical input
/// within a single index lifetime.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Point-in-time view of a keyword index. Searches run against the state
/// captured by [`KeywordIndexer::reader`] no matter what is published
/// afterwards, so a caller can hold a reader across a long lookup without
/// pinning the live index.
pub trait KeywordReader: Send + 'static {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredCandidate>>;
}

/// Lexical relevance index over chunks. Index mutation happens only at
/// ingest; `reader` captures a consistent snapshot cheaply.
pub trait KeywordIndexer: Send + Sync {
    type Reader: KeywordReader;

    fn index(&self, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn remove_document(&self, doc_id: &str) -> anyhow::Result<()>;
    fn reader(&self) -> Self::Reader;

    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredCandidate>> {
        self.reader().search(query, k)
    }
}

/// Point-in-time view of a semantic index, detached like [`KeywordReader`].
pub trait SemanticReader: Send + 'static {
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<ScoredCandidate>>;
}

/// Top-k nearest-by-cosine capability. `upsert` is idempotent per chunk id;
/// a reader must never return a chunk id that was not upserted.
pub trait SemanticIndex: Send + Sync {
    type Reader: SemanticReader;

    fn upsert(&self, entries: &[SemanticEntry]) -> anyhow::Result<()>;
    fn remove(&self, chunk_ids: &[ChunkId]) -> anyhow::Result<()>;
    fn reader(&self) -> Self::Reader;

    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<ScoredCandidate>> {
        self.reader().search(query_vec, k)
    }
}

/// Chunk/text lookup owned by the storage collaborator. `remove` returns
/// the chunk ids of the dropped document so the indices can collect them.
pub trait DocumentStore: Send + Sync {
    fn put(&self, doc: &Document, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn contains(&self, doc_id: &str) -> bool;
    fn resolve(&self, chunk_id: &str) -> anyhow::Result<Option<ResolvedChunk>>;
    fn remove(&self, doc_id: &str) -> anyhow::Result<Vec<ChunkId>>;
}
