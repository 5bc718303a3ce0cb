//! Domain types shared by the keyword and semantic engines.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// One paragraph of a judgment, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub position: usize,
    pub text: String,
}

/// Metadata extracted from a judgment. All narrative fields are optional;
/// a judgment with no extractable ratio is valid data, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JudgmentMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub facts: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub ratio: Option<String>,
    #[serde(default)]
    pub holding: Option<String>,
    #[serde(default)]
    pub citations: Vec<String>,
}

/// A judgment as handed over by the parsing collaborator. Immutable once
/// ingested; the core only reads the paragraph sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub meta: JudgmentMeta,
    pub paragraphs: Vec<Paragraph>,
}

/// Coarse judgment section a chunk belongs to, detected by keyword probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Facts,
    Issues,
    Analysis,
    Holding,
    General,
}

/// A bounded-size retrievable unit cut from one document.
///
/// `id` is stable: `"{doc_id}:{seq}"`. `paragraphs` lists the positions of
/// the source paragraphs that contributed text to this chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub seq: usize,
    pub text: String,
    pub token_count: usize,
    pub paragraphs: Vec<usize>,
    pub section: Section,
}

/// Which engine produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Keyword,
    Semantic,
}

/// A per-query candidate from a single engine. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub chunk_id: ChunkId,
    pub score: f32,
    pub source: Source,
}

/// (chunk_id, vector) pair handed to the semantic index at ingest time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticEntry {
    pub chunk_id: ChunkId,
    pub vector: Vec<f32>,
}

/// Which result lists contained a fused chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub keyword: bool,
    pub semantic: bool,
}

impl SourceSet {
    pub fn both(&self) -> bool {
        self.keyword && self.semantic
    }

    pub fn contains(&self, source: Source) -> bool {
        match source {
            Source::Keyword => self.keyword,
            Source::Semantic => self.semantic,
        }
    }
}

/// The fused query-time output. `chunk_id` resolves back to text and
/// judgment metadata through the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub chunk_id: ChunkId,
    pub fused_score: f32,
    pub rank: usize,
    pub sources: SourceSet,
}

/// A ranked chunk rendered for the caller: text plus owning metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedChunk {
    pub chunk: Chunk,
    pub meta: JudgmentMeta,
}
