//! Query and chunk tokenization for the keyword engine.
//!
//! Lowercased alphanumeric runs with English stop words removed. The same
//! function runs at index time and at query time, so term extraction is
//! identical on both sides.

use std::collections::HashSet;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "or", "but", "not",
    "this", "these", "they", "them", "their", "there", "then", "than", "so", "if", "when",
    "where", "why", "how", "what", "which", "who", "whom", "whose", "can", "could", "should",
    "would", "may", "might", "must", "shall", "do", "does", "did", "have", "had", "having",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Split `text` into lowercased alphanumeric terms, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_term(&mut terms, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_term(&mut terms, current);
    }
    terms
}

fn push_term(terms: &mut Vec<String>, term: String) {
    if !stop_words().contains(term.as_str()) {
        terms.push(term);
    }
}
