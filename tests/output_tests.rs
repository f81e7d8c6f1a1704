use dupefinder::duplicates::DuplicateFinder;
use dupefinder::error::ExitCode;
use dupefinder::output::{write_report, JsonOutput};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_text_report_end_to_end() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("left.txt"), b"matching bytes");
    write_file(&dir.path().join("right.txt"), b"matching bytes");
    write_file(&dir.path().join("alone.txt"), b"unaccompanied!");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &groups).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Duplicate files group #1. These files are duplicates:\n"));
    assert!(text.contains("left.txt"));
    assert!(text.contains("right.txt"));
    assert!(!text.contains("alone.txt"));
    assert!(text.ends_with("\n\n"));
}

#[test]
fn test_text_report_numbering_is_sequential() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a1"), &[b'a'; 10]);
    write_file(&dir.path().join("a2"), &[b'a'; 10]);
    write_file(&dir.path().join("b1"), &[b'b'; 20]);
    write_file(&dir.path().join("b2"), &[b'b'; 20]);
    write_file(&dir.path().join("c1"), &[b'c'; 30]);
    write_file(&dir.path().join("c2"), &[b'c'; 30]);

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(groups.len(), 3);

    let mut out = Vec::new();
    write_report(&mut out, &groups).unwrap();
    let text = String::from_utf8(out).unwrap();

    for number in 1..=3 {
        assert!(text.contains(&format!("Duplicate files group #{number}.")));
    }
    assert!(!text.contains("group #4."));
}

#[test]
fn test_json_report_end_to_end() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("j1.dat"), b"json bytes");
    write_file(&dir.path().join("j2.dat"), b"json bytes");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

    let dupes = value["duplicates"].as_array().unwrap();
    assert_eq!(dupes.len(), 1);
    assert_eq!(dupes[0]["size"], 10);
    assert_eq!(dupes[0]["files"].as_array().unwrap().len(), 2);
    // SHA-1 default: 40 hex chars
    assert_eq!(dupes[0]["digest"].as_str().unwrap().len(), 40);
    assert_eq!(value["summary"]["duplicate_groups"], 1);
    assert_eq!(value["summary"]["total_files"], 2);
    assert_eq!(value["summary"]["scan_warnings"], 0);
}
