//! Plain-text report renderer.
//!
//! Groups are numbered 1-based in the order the pipeline produced them
//! (size-bucket order, then prefix-bucket order, then full-digest order —
//! all insertion order, never sorted), each followed by its member paths
//! and a blank line.

use std::io::{self, Write};

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Write the duplicate report to the given writer.
///
/// An empty group list writes nothing: no duplicates, empty report.
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn write_report<W: Write>(writer: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
    for (number, group) in groups.iter().enumerate() {
        writeln!(
            writer,
            "Duplicate files group #{}. These files are duplicates:",
            number + 1
        )?;
        for file in &group.files {
            writeln!(writer, "{}", file.path.display())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// One-line human-readable summary of a completed scan.
#[must_use]
pub fn render_summary(summary: &ScanSummary) -> String {
    if summary.duplicate_groups == 0 {
        format!(
            "No duplicates found among {} files ({})",
            summary.total_files,
            summary.total_size_display()
        )
    } else {
        format!(
            "{} duplicate group(s), {} duplicate file(s), {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{FileEntry, HashAlgorithm, Hasher};
    use std::io::Write as _;
    use std::path::PathBuf;

    fn make_group(paths: &[&str], size: u64) -> DuplicateGroup {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"digest source").unwrap();
        let digest = Hasher::new(HashAlgorithm::Sha1, 1024)
            .full_digest(file.path())
            .unwrap();
        DuplicateGroup::new(
            digest,
            size,
            paths
                .iter()
                .map(|p| FileEntry::new(PathBuf::from(p), size))
                .collect(),
        )
    }

    #[test]
    fn test_empty_report() {
        let mut out = Vec::new();
        write_report(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_report_shape_and_numbering() {
        let groups = vec![
            make_group(&["/a", "/b"], 10),
            make_group(&["/c", "/d", "/e"], 20),
        ];

        let mut out = Vec::new();
        write_report(&mut out, &groups).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Duplicate files group #1. These files are duplicates:\n\
             /a\n\
             /b\n\
             \n\
             Duplicate files group #2. These files are duplicates:\n\
             /c\n\
             /d\n\
             /e\n\
             \n"
        );
    }

    #[test]
    fn test_summary_line() {
        let summary = ScanSummary {
            total_files: 5,
            duplicate_groups: 1,
            duplicate_files: 2,
            reclaimable_space: 1024,
            ..Default::default()
        };
        let line = render_summary(&summary);
        assert!(line.contains("1 duplicate group(s)"));
        assert!(line.contains("2 duplicate file(s)"));

        let empty = ScanSummary {
            total_files: 5,
            ..Default::default()
        };
        assert!(render_summary(&empty).starts_with("No duplicates found"));
    }
}
