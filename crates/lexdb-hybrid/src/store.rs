//! In-process document/chunk store.
//!
//! Fills the `DocumentStore` contract for the CLI and tests. The original
//! pipeline kept this in MongoDB; persistence across restarts stays an
//! external concern.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lexdb_core::traits::DocumentStore;
use lexdb_core::types::{Chunk, ChunkId, Document, JudgmentMeta, ResolvedChunk};

#[derive(Default)]
struct StoreInner {
    metas: HashMap<String, JudgmentMeta>,
    chunks: HashMap<ChunkId, Chunk>,
    doc_chunks: HashMap<String, Vec<ChunkId>>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, doc: &Document, chunks: &[Chunk]) -> anyhow::Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.metas.insert(doc.id.clone(), doc.meta.clone());
        let ids: Vec<ChunkId> = chunks.iter().map(|c| c.id.clone()).collect();
        for chunk in chunks {
            inner.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        inner.doc_chunks.insert(doc.id.clone(), ids);
        Ok(())
    }

    fn contains(&self, doc_id: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .metas
            .contains_key(doc_id)
    }

    fn resolve(&self, chunk_id: &str) -> anyhow::Result<Option<ResolvedChunk>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let Some(chunk) = inner.chunks.get(chunk_id) else {
            return Ok(None);
        };
        let meta = inner.metas.get(&chunk.doc_id).cloned().unwrap_or_default();
        Ok(Some(ResolvedChunk { chunk: chunk.clone(), meta }))
    }

    fn remove(&self, doc_id: &str) -> anyhow::Result<Vec<ChunkId>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.metas.remove(doc_id);
        let ids = inner.doc_chunks.remove(doc_id).unwrap_or_default();
        for id in &ids {
            inner.chunks.remove(id);
        }
        Ok(ids)
    }
}
