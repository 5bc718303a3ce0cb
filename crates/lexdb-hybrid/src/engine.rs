//! The retrieval orchestrator.
//!
//! Ingestion is document-granular and atomic from a query's perspective:
//! all chunk-level artifacts (chunks, embeddings) are built *before* the
//! publish write lock is taken, and both indices plus the store are
//! updated inside it. A query captures a reader from each index under one
//! momentary read lock, so the pair it searches is always a consistent
//! union of fully-indexed documents; the lookups themselves then run
//! lock-free against those snapshots. Queries never hold the publish lock
//! across a lookup, so a query is never queued behind a pending writer
//! that is itself waiting on another query.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::ensure;
use tracing::{info, warn};

use lexdb_core::chunker;
use lexdb_core::config::RetrievalConfig;
use lexdb_core::error::Error;
use lexdb_core::traits::{
    DocumentStore, Embedder, KeywordIndexer, KeywordReader, SemanticIndex, SemanticReader,
};
use lexdb_core::types::{Document, RankedResult, ResolvedChunk, ScoredCandidate, SemanticEntry};

use crate::fusion;

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub doc_id: String,
    pub chunks_indexed: usize,
    pub replaced: bool,
}

pub struct RetrievalEngine<KI, SI, ST> {
    keyword: Arc<KI>,
    semantic: Arc<SI>,
    store: Arc<ST>,
    embedder: Arc<dyn Embedder>,
    config: RetrievalConfig,
    /// Publish gate: ingest/remove hold the write side while swapping
    /// index state, queries hold the read side only long enough to
    /// capture a reader pair.
    publish: tokio::sync::RwLock<()>,
    /// Bumped on every publish; lets a query tell a chunk removed behind
    /// its snapshot apart from an index inventing ids.
    epoch: AtomicU64,
    /// Per-document serialization of concurrent same-id ingestions.
    doc_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<KI, SI, ST> RetrievalEngine<KI, SI, ST>
where
    KI: KeywordIndexer + 'static,
    SI: SemanticIndex + 'static,
    ST: DocumentStore + 'static,
{
    pub fn new(
        keyword: KI,
        semantic: SI,
        store: ST,
        embedder: Arc<dyn Embedder>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            keyword: Arc::new(keyword),
            semantic: Arc::new(semantic),
            store: Arc::new(store),
            embedder,
            config,
            publish: tokio::sync::RwLock::new(()),
            epoch: AtomicU64::new(0),
            doc_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Render a ranked chunk id back into text plus judgment metadata.
    pub fn resolve(&self, chunk_id: &str) -> anyhow::Result<Option<ResolvedChunk>> {
        self.store.resolve(chunk_id)
    }

    /// Chunk, embed, and publish one document. Re-ingesting an id replaces
    /// the previous version wholesale (last-writer-wins).
    pub async fn ingest(&self, doc: Document) -> anyhow::Result<IngestReport> {
        let doc_lock = self.doc_lock(&doc.id);
        let _serialized = doc_lock.lock().await;

        // Build everything before publishing anything.
        let chunks = chunker::chunk(&doc.id, &doc.paragraphs, &self.config.chunker);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        for v in &vectors {
            ensure!(v.len() == self.embedder.dim(), "embedder returned wrong dimension");
        }
        let entries: Vec<SemanticEntry> = chunks
            .iter()
            .zip(vectors)
            .map(|(c, vector)| SemanticEntry { chunk_id: c.id.clone(), vector })
            .collect();

        let _publish = self.publish.write().await;
        let replaced = self.store.contains(&doc.id);
        if replaced {
            let old_chunks = self.store.remove(&doc.id)?;
            self.keyword.remove_document(&doc.id)?;
            self.semantic.remove(&old_chunks)?;
        }
        self.store.put(&doc, &chunks)?;
        self.keyword.index(&chunks)?;
        self.semantic.upsert(&entries)?;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        info!(doc_id = %doc.id, chunks = chunks.len(), replaced, "document published");

        Ok(IngestReport { doc_id: doc.id, chunks_indexed: chunks.len(), replaced })
    }

    /// Remove a document and collect its chunks from both indices.
    /// Returns the number of chunks dropped.
    pub async fn remove(&self, doc_id: &str) -> anyhow::Result<usize> {
        let doc_lock = self.doc_lock(doc_id);
        let serialized = doc_lock.lock().await;

        let removed = {
            let _publish = self.publish.write().await;
            let chunk_ids = self.store.remove(doc_id)?;
            self.keyword.remove_document(doc_id)?;
            self.semantic.remove(&chunk_ids)?;
            self.epoch.fetch_add(1, Ordering::AcqRel);
            chunk_ids.len()
        };
        info!(doc_id, chunks = removed, "document removed");

        drop(serialized);
        self.prune_doc_lock(doc_id, &doc_lock);
        Ok(removed)
    }

    /// Run the keyword and semantic lookups concurrently against one
    /// consistent snapshot pair, wait for both, and fuse. A lookup
    /// exceeding the configured timeout degrades to an empty list for
    /// that source rather than failing the query.
    pub async fn query(&self, query_text: &str, k: usize) -> anyhow::Result<Vec<RankedResult>> {
        if query_text.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed(query_text)?;
        let timeout = Duration::from_millis(self.config.lookup_timeout_ms);

        // The read lock is held only across the two reader captures, so
        // the pair reflects one publish and the lookups run lock-free.
        let (keyword_reader, semantic_reader, epoch) = {
            let _snapshot = self.publish.read().await;
            (self.keyword.reader(), self.semantic.reader(), self.epoch.load(Ordering::Acquire))
        };

        let keyword_lookup = {
            let query = query_text.to_string();
            tokio::task::spawn_blocking(move || keyword_reader.search(&query, k))
        };
        let semantic_lookup =
            tokio::task::spawn_blocking(move || semantic_reader.search(&query_vec, k));

        let (keyword_res, semantic_res) = tokio::join!(
            tokio::time::timeout(timeout, keyword_lookup),
            tokio::time::timeout(timeout, semantic_lookup),
        );
        let keyword_hits = settle(keyword_res, "keyword")?;
        let semantic_hits = settle(semantic_res, "semantic")?;

        // Contract check: the semantic index must only ever return ids it
        // was given. If the published state moved on since the snapshot
        // was captured, an unresolvable id is a chunk removed mid-flight,
        // not a collaborator bug; it is dropped from the results instead.
        let mut live_semantic = Vec::with_capacity(semantic_hits.len());
        for hit in semantic_hits {
            if self.store.resolve(&hit.chunk_id)?.is_some() {
                live_semantic.push(hit);
            } else if self.epoch.load(Ordering::Acquire) == epoch {
                return Err(Error::Integrity(format!(
                    "semantic index returned unknown chunk id '{}'",
                    hit.chunk_id
                ))
                .into());
            }
        }

        Ok(fusion::fuse(&keyword_hits, &live_semantic, k, &self.config.fusion))
    }

    /// Number of per-document serialization locks currently retained.
    pub fn doc_lock_count(&self) -> usize {
        self.doc_locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn doc_lock(&self, doc_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.doc_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(doc_id.to_string()).or_default())
    }

    fn prune_doc_lock(&self, doc_id: &str, handle: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.doc_locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Two owners (the map and this handle) means nobody is waiting on
        // this document; dropping the entry cannot break serialization.
        if Arc::strong_count(handle) == 2 {
            locks.remove(doc_id);
        }
    }
}

type LookupResult = Result<
    Result<anyhow::Result<Vec<ScoredCandidate>>, tokio::task::JoinError>,
    tokio::time::error::Elapsed,
>;

fn settle(result: LookupResult, source: &str) -> anyhow::Result<Vec<ScoredCandidate>> {
    match result {
        Ok(Ok(Ok(hits))) => Ok(hits),
        Ok(Ok(Err(err))) => Err(err),
        Ok(Err(join_err)) => Err(anyhow::anyhow!(join_err)),
        Err(_) => {
            warn!(source, "lookup timed out; degrading to empty result list");
            Ok(Vec::new())
        }
    }
}
