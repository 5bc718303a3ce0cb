use std::fs;

use tempfile::TempDir;

use lexdb_core::loader::{load_directory, load_document};

#[test]
fn splits_paragraphs_on_blank_lines() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("kesavananda.txt");
    fs::write(&path, "First paragraph here.\n\nSecond paragraph.\n\n\n\nThird.").expect("write");

    let doc = load_document(&path).expect("load");
    assert_eq!(doc.id, "kesavananda");
    assert_eq!(doc.paragraphs.len(), 3);
    assert_eq!(doc.paragraphs[1].position, 1);
    assert_eq!(doc.paragraphs[1].text, "Second paragraph.");
    // No sidecar: the file stem stands in as the title.
    assert_eq!(doc.meta.title, "kesavananda");
}

#[test]
fn reads_metadata_sidecar_with_missing_fields() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("maneka.txt");
    fs::write(&path, "Some judgment text.").expect("write");
    // No ratio, no holding: optional metadata is valid data.
    fs::write(
        tmp.path().join("maneka.meta.json"),
        r#"{"title": "Maneka Gandhi v. Union of India", "court": "Supreme Court of India", "citations": ["AIR 1978 SC 597"]}"#,
    )
    .expect("write sidecar");

    let doc = load_document(&path).expect("load");
    assert_eq!(doc.meta.title, "Maneka Gandhi v. Union of India");
    assert_eq!(doc.meta.citations.len(), 1);
    assert!(doc.meta.ratio.is_none());
    assert!(doc.meta.holding.is_none());
}

#[test]
fn loads_directory_in_sorted_order() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("b.txt"), "beta").expect("write");
    fs::write(tmp.path().join("a.txt"), "alpha").expect("write");
    fs::write(tmp.path().join("notes.md"), "ignored").expect("write");

    let docs = load_directory(tmp.path()).expect("load");
    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"], "only .txt files, path-sorted");
}
