//! Inverted index state for BM25 scoring.
//!
//! Terms map to postings lists (internal chunk id + term frequency); chunk
//! token lengths are tracked for length normalization. The whole state is
//! an explicit owned value, cloned and republished atomically by
//! [`crate::Bm25Index`] so in-flight queries keep their snapshot.

use std::collections::HashMap;

use lexdb_core::types::{Chunk, ChunkId};

use crate::tokenize::tokenize;

/// One entry in a term's postings list.
#[derive(Debug, Clone)]
pub struct Posting {
    /// Internal u32 chunk id.
    pub chunk: u32,
    /// Number of times the term appears in the chunk.
    pub tf: u32,
}

/// Postings, corpus statistics, and the chunk-id mappings between the
/// external string ids and internal u32 ids.
#[derive(Debug, Default, Clone)]
pub struct KeywordState {
    postings: HashMap<String, Vec<Posting>>,
    /// internal id → external chunk id. Removed chunks keep a tombstone
    /// slot so internal ids are never reused.
    chunk_ids: Vec<ChunkId>,
    lookup: HashMap<ChunkId, u32>,
    /// doc id → internal ids, for document-granular removal.
    doc_chunks: HashMap<String, Vec<u32>>,
    /// internal id → token length (0 after removal).
    lengths: Vec<u32>,
    live: u32,
    total_len: u64,
}

impl KeywordState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks currently indexed.
    pub fn chunk_count(&self) -> u32 {
        self.live
    }

    pub fn contains(&self, chunk_id: &str) -> bool {
        self.lookup.contains_key(chunk_id)
    }

    pub fn chunk_id(&self, internal: u32) -> &str {
        &self.chunk_ids[internal as usize]
    }

    pub fn length(&self, internal: u32) -> u32 {
        self.lengths[internal as usize]
    }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn average_length(&self) -> f32 {
        if self.live == 0 {
            return 0.0;
        }
        self.total_len as f32 / self.live as f32
    }

    /// Append one chunk's postings. Re-adding an existing chunk id replaces
    /// its previous postings.
    pub fn add_chunk(&mut self, chunk: &Chunk) {
        if self.lookup.contains_key(&chunk.id) {
            self.remove_chunk(&chunk.doc_id, &chunk.id);
        }
        let internal = self.chunk_ids.len() as u32;
        let terms = tokenize(&chunk.text);
        let len = terms.len() as u32;

        self.chunk_ids.push(chunk.id.clone());
        self.lookup.insert(chunk.id.clone(), internal);
        self.doc_chunks.entry(chunk.doc_id.clone()).or_default().push(internal);
        self.lengths.push(len);
        self.live += 1;
        self.total_len += u64::from(len);

        let mut tf: HashMap<&str, u32> = HashMap::new();
        for term in &terms {
            *tf.entry(term.as_str()).or_insert(0) += 1;
        }
        for (term, count) in tf {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(Posting { chunk: internal, tf: count });
        }
    }

    /// Drop every chunk belonging to `doc_id`. Unknown ids are a no-op.
    pub fn remove_document(&mut self, doc_id: &str) {
        let Some(internals) = self.doc_chunks.remove(doc_id) else {
            return;
        };
        for internal in internals {
            self.drop_internal(internal);
        }
    }

    fn remove_chunk(&mut self, doc_id: &str, chunk_id: &str) {
        if let Some(&internal) = self.lookup.get(chunk_id) {
            if let Some(ids) = self.doc_chunks.get_mut(doc_id) {
                ids.retain(|&i| i != internal);
            }
            self.drop_internal(internal);
        }
    }

    fn drop_internal(&mut self, internal: u32) {
        let idx = internal as usize;
        // A stale doc_chunks entry may point at a slot whose external id
        // has since been re-registered under a newer internal id; only the
        // slot the live mapping names may be dropped.
        match self.lookup.get(self.chunk_ids[idx].as_str()) {
            Some(&mapped) if mapped == internal => {}
            _ => return,
        }
        self.lookup.remove(self.chunk_ids[idx].as_str());
        self.total_len -= u64::from(self.lengths[idx]);
        self.lengths[idx] = 0;
        self.live -= 1;
        self.postings.retain(|_, postings| {
            postings.retain(|p| p.chunk != internal);
            !postings.is_empty()
        });
    }
}
