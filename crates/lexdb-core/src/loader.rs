//! Plain-text judgment loading for the ingestion pipeline.
//!
//! One judgment per `.txt` file: paragraphs split on blank lines, metadata
//! taken from an optional `<stem>.meta.json` sidecar. PDF extraction and
//! LLM metadata parsing are upstream collaborators; by the time text
//! reaches this loader it is already clean.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::types::{Document, JudgmentMeta, Paragraph};

/// Load every `.txt` judgment under `root`, sorted by path for
/// reproducible ingest order.
pub fn load_directory(root: &Path) -> Result<Vec<Document>> {
    list_txt_files(root).iter().map(|p| load_document(p)).collect()
}

pub fn load_document(path: &Path) -> Result<Document> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => String::from_utf8_lossy(&fs::read(path)?).to_string(),
    };
    let doc_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| anyhow::anyhow!("bad file name: {}", path.display()))?;

    let paragraphs: Vec<Paragraph> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(position, text)| Paragraph { position, text: text.to_string() })
        .collect();

    let sidecar = path.with_extension("meta.json");
    let meta = if sidecar.exists() {
        serde_json::from_str(&fs::read_to_string(&sidecar)?)?
    } else {
        JudgmentMeta { title: doc_id.clone(), ..JudgmentMeta::default() }
    };

    Ok(Document { id: doc_id, meta, paragraphs })
}

pub fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    files
}
