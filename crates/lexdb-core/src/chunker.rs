//! Legal-aware chunking of paragraph-structured judgments.
//!
//! Paragraphs accumulate in document order into a buffer that is closed
//! into a chunk once it reaches `max_tokens` or the next paragraph would
//! overflow it. A paragraph boundary is always a valid chunk boundary;
//! when a cut has to land inside a paragraph, the nearest preceding
//! sentence terminator within a small look-back window wins over a hard
//! token cut. Tokens are whitespace-delimited words, so chunk sizes are
//! reproducible for identical input and configuration.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{Chunk, Paragraph, Section};

/// How far back from a forced cut point to look for a sentence terminator.
const SENTENCE_LOOKBACK: usize = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { min_tokens: 200, max_tokens: 400, overlap_tokens: 0 }
    }
}

/// A paragraph, or a sentence-aligned slice of an oversized paragraph,
/// already guaranteed to fit inside `max_tokens`.
struct Unit {
    words: Vec<String>,
    para: usize,
}

/// Split `paragraphs` into chunks of `[min_tokens, max_tokens]` whitespace
/// tokens. Only the final trailing chunk may fall below `min_tokens`.
/// Empty or whitespace-only input yields an empty sequence.
pub fn chunk(doc_id: &str, paragraphs: &[Paragraph], cfg: &ChunkerConfig) -> Vec<Chunk> {
    let max = cfg.max_tokens.max(1);
    let min = cfg.min_tokens.clamp(1, max);
    // An overlap at or above min_tokens would let a reseeded buffer close
    // again without consuming fresh text; clamp below min.
    let overlap = cfg.overlap_tokens.min(min.saturating_sub(1));

    let mut queue: VecDeque<Unit> = VecDeque::new();
    for para in paragraphs {
        let words: Vec<String> = para.text.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            continue;
        }
        if words.len() <= max {
            queue.push_back(Unit { words, para: para.position });
        } else {
            for piece in split_oversized(words, min, max) {
                queue.push_back(Unit { words: piece, para: para.position });
            }
        }
    }

    let mut builder = ChunkBuilder::new(doc_id, overlap);
    while let Some(unit) = queue.pop_front() {
        if builder.buffer_len() + unit.words.len() > max {
            if builder.buffer_len() >= min {
                builder.close();
                queue.push_front(unit);
            } else {
                // The buffer is still starving and the whole unit would
                // overflow max: split the unit so the closed chunk lands
                // inside [min, max] instead of overshooting the ceiling.
                let room = max - builder.buffer_len();
                let need = min.saturating_sub(builder.buffer_len()).clamp(1, room);
                let cut = sentence_cut(&unit.words, need, room);
                let (head, tail) = unit.words.split_at(cut);
                builder.push(head, unit.para);
                builder.close();
                if !tail.is_empty() {
                    queue.push_front(Unit { words: tail.to_vec(), para: unit.para });
                }
            }
            continue;
        }
        builder.push(&unit.words, unit.para);
        if builder.buffer_len() >= max {
            builder.close();
        }
    }
    builder.finish()
}

/// Cut an oversized paragraph into pieces of at most `max` tokens,
/// preferring sentence boundaries near each forced cut point.
fn split_oversized(words: Vec<String>, min: usize, max: usize) -> Vec<Vec<String>> {
    let mut pieces = Vec::new();
    let mut rest = words.as_slice();
    while rest.len() > max {
        let cut = sentence_cut(rest, min.clamp(1, max), max);
        let (head, tail) = rest.split_at(cut);
        pieces.push(head.to_vec());
        rest = tail;
    }
    if !rest.is_empty() {
        pieces.push(rest.to_vec());
    }
    pieces
}

/// Best cut position in `[lo, hi]` (counted in words from the start of
/// `words`): the latest sentence terminator within the look-back window,
/// falling back to the hard cut at `hi`.
fn sentence_cut(words: &[String], lo: usize, hi: usize) -> usize {
    debug_assert!(lo >= 1 && lo <= hi && hi <= words.len());
    let floor = hi.saturating_sub(SENTENCE_LOOKBACK).max(lo);
    for i in (floor..=hi).rev() {
        if ends_sentence(&words[i - 1]) {
            return i;
        }
    }
    hi
}

fn ends_sentence(word: &str) -> bool {
    let trimmed = word.trim_end_matches(['"', '\'', ')', ']', '\u{2019}', '\u{201d}']);
    trimmed.ends_with('.') || trimmed.ends_with('?') || trimmed.ends_with('!')
}

/// Section detection carried over from the judgment pipeline: a cheap
/// keyword probe good enough to label chunks for display and filtering.
pub fn detect_section(text: &str) -> Section {
    let t = text.to_lowercase();
    if t.contains("facts") || t.contains("background") || t.contains("factual") {
        Section::Facts
    } else if t.contains("issue") {
        Section::Issues
    } else if t.contains("ratio") || t.contains("reasoning") || t.contains("analysis") {
        Section::Analysis
    } else if t.contains("held") || t.contains("final") || t.contains("ordered") {
        Section::Holding
    } else {
        Section::General
    }
}

struct ChunkBuilder {
    doc_id: String,
    overlap: usize,
    buffer: Vec<String>,
    paras: Vec<usize>,
    /// Whether the buffer holds anything beyond a reseeded overlap tail.
    fresh: bool,
    seq: usize,
    out: Vec<Chunk>,
}

impl ChunkBuilder {
    fn new(doc_id: &str, overlap: usize) -> Self {
        Self {
            doc_id: doc_id.to_string(),
            overlap,
            buffer: Vec::new(),
            paras: Vec::new(),
            fresh: false,
            seq: 0,
            out: Vec::new(),
        }
    }

    fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    fn push(&mut self, words: &[String], para: usize) {
        self.buffer.extend_from_slice(words);
        if self.paras.last() != Some(&para) {
            self.paras.push(para);
        }
        self.fresh = true;
    }

    fn close(&mut self) {
        let text = self.buffer.join(" ");
        let token_count = self.buffer.len();
        let section = detect_section(&text);
        self.out.push(Chunk {
            id: format!("{}:{}", self.doc_id, self.seq),
            doc_id: self.doc_id.clone(),
            seq: self.seq,
            text,
            token_count,
            paragraphs: std::mem::take(&mut self.paras),
            section,
        });
        self.seq += 1;

        let carry = self.overlap.min(token_count.saturating_sub(1));
        let last_para = self.out[self.out.len() - 1].paragraphs.last().copied();
        let tail: Vec<String> = self.buffer[token_count - carry..].to_vec();
        self.buffer = tail;
        if carry > 0 {
            if let Some(p) = last_para {
                self.paras.push(p);
            }
        }
        self.fresh = false;
    }

    fn finish(mut self) -> Vec<Chunk> {
        // A buffer holding only a reseeded overlap tail is duplicate text.
        if !self.buffer.is_empty() && self.fresh {
            self.close();
        }
        self.out
    }
}
