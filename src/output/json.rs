//! JSON output formatter for duplicate scan results.
//!
//! Machine-readable output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "digest": "abc123...",
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_size": 1048576,
//!     "duplicate_groups": 5,
//!     "duplicate_files": 10,
//!     "reclaimable_space": 51200,
//!     "skipped_files": 0,
//!     "scan_warnings": 0,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "DF000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate group in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Full-content digest as a hexadecimal string
    pub digest: String,
    /// File size in bytes
    pub size: u64,
    /// Paths of all duplicate files, in group order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Build the JSON form of a duplicate group.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            digest: group.digest_hex(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| f.path.display().to_string())
                .collect(),
        }
    }
}

/// Summary statistics in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of files across all duplicate groups
    pub duplicate_files: usize,
    /// Space that removing all copies but one would reclaim (bytes)
    pub reclaimable_space: u64,
    /// Files skipped during hashing under the skip-and-warn policy
    pub skipped_files: usize,
    /// Per-entry walk failures recovered with a warning
    pub scan_warnings: usize,
    /// Duration of the directory walk in milliseconds
    pub walk_duration_ms: u64,
    /// Duration of the size-grouping stage in milliseconds
    pub size_duration_ms: u64,
    /// Duration of the prefix-hash stage in milliseconds
    pub chunk_duration_ms: u64,
    /// Duration of the full-hash stage in milliseconds
    pub fullhash_duration_ms: u64,
    /// Duration of the whole scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

/// Complete JSON output document.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// All confirmed duplicate groups, in report order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the output document from scan results.
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary {
                total_files: summary.total_files,
                total_size: summary.total_size,
                duplicate_groups: summary.duplicate_groups,
                duplicate_files: summary.duplicate_files,
                reclaimable_space: summary.reclaimable_space,
                skipped_files: summary.skipped_files,
                scan_warnings: summary.scan_errors.len(),
                walk_duration_ms: summary.walk_duration.as_millis() as u64,
                size_duration_ms: summary.size_duration.as_millis() as u64,
                chunk_duration_ms: summary.chunk_duration.as_millis() as u64,
                fullhash_duration_ms: summary.fullhash_duration.as_millis() as u64,
                scan_duration_ms: summary.scan_duration.as_millis() as u64,
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (should not happen for this schema).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (should not happen for this schema).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON to the given writer.
    ///
    /// # Errors
    ///
    /// Returns serialization or I/O errors.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let json = self.to_json_pretty()?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}
