//! lexdb-hybrid
//!
//! The only crate aware of both indices: reciprocal-rank fusion of the
//! keyword and semantic result lists, and the retrieval engine that
//! coordinates chunking, embedding, publishing, and querying.

pub mod engine;
pub mod fusion;
pub mod store;

pub use engine::{IngestReport, RetrievalEngine};
pub use fusion::fuse;
pub use store::MemoryStore;

use lexdb_core::config::RetrievalConfig;
use lexdb_embed::default_embedder;
use lexdb_keyword::Bm25Index;
use lexdb_semantic::CosineIndex;

/// Engine wired with the in-process backends shipped in this workspace.
pub type DefaultEngine = RetrievalEngine<Bm25Index, CosineIndex, MemoryStore>;

pub fn default_engine(config: RetrievalConfig) -> DefaultEngine {
    let embedder = default_embedder(config.embed_dim);
    RetrievalEngine::new(
        Bm25Index::new(config.bm25),
        CosineIndex::new(config.embed_dim),
        MemoryStore::new(),
        embedder,
        config,
    )
}
