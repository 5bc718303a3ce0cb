//! lexdb-keyword
//!
//! Okapi BM25 keyword engine: an inverted index over chunks with an owned,
//! copy-then-swap state so queries always read a consistent snapshot.

pub mod index;
pub mod state;
pub mod tokenize;

pub use index::{Bm25Index, Bm25Reader};
pub use state::KeywordState;
pub use tokenize::tokenize;
