//! Command-line interface definitions.
//!
//! All CLI arguments and options via the clap derive API. The tool is
//! single-purpose, so there are no subcommands: positional root paths plus
//! options controlling hashing, traversal, and output.
//!
//! # Example
//!
//! ```bash
//! # Scan one or more directories for duplicate files
//! dupefinder ~/Downloads ~/Documents
//!
//! # JSON output for scripting
//! dupefinder ~/Downloads --output json
//!
//! # Larger chunks and a faster hash
//! dupefinder ~/media --chunk-size 64KiB --algorithm blake3
//!
//! # Keep going when individual files cannot be read
//! dupefinder /mnt/flaky --skip-unreadable
//! ```

use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::duplicates::DEFAULT_IO_THREADS;
use crate::scanner::HashAlgorithm;

/// Staged duplicate file finder.
///
/// Finds groups of byte-identical files by filtering candidates in three
/// stages — equal size, equal first-chunk digest, equal full digest — so
/// that most files are ruled out before any of their bytes are read.
#[derive(Debug, Parser)]
#[command(name = "dupefinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directories to scan for duplicates
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Increase verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Chunk size for hashing (e.g. 1024, 4KiB, 1MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", default_value = "1024", value_parser = parse_chunk_size)]
    pub chunk_size: u64,

    /// Number of leading chunks hashed by the cheap prefilter stage
    #[arg(long, value_name = "N", default_value = "1")]
    pub prefilter_chunks: NonZeroUsize,

    /// Hash algorithm for both hashing stages
    #[arg(long, value_enum, default_value = "sha1")]
    pub algorithm: AlgorithmArg,

    /// Number of I/O threads for hashing
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_IO_THREADS)]
    pub io_threads: usize,

    /// Warn and skip files that fail to read instead of aborting the run
    ///
    /// Skipped files are excluded from the report and the run exits with
    /// the partial-success code.
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Output format for the duplicate report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Emit fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Minimum file size to consider (e.g. 1KB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g. 1GB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Hash algorithm choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// SHA-1 (160-bit, the classic default)
    Sha1,
    /// SHA-256
    Sha256,
    /// BLAKE3 (fastest)
    Blake3,
}

impl AlgorithmArg {
    /// Convert to the scanner's algorithm selector.
    #[must_use]
    pub fn to_algorithm(self) -> HashAlgorithm {
        match self {
            Self::Sha1 => HashAlgorithm::Sha1,
            Self::Sha256 => HashAlgorithm::Sha256,
            Self::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

/// Output format for the duplicate report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text groups on stdout
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a chunk size: like [`parse_size`] but zero is rejected.
///
/// A zero chunk size can never make read progress, so it is refused here
/// rather than surfacing later as a configuration error.
///
/// # Errors
///
/// Everything [`parse_size`] rejects, plus zero.
pub fn parse_chunk_size(s: &str) -> Result<u64, String> {
    let size = parse_size(s)?;
    if size == 0 {
        return Err("Chunk size must be greater than zero".to_string());
    }
    Ok(size)
}
