//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (stage 1)
//! - Prefix-hash comparison (stage 2)
//! - Full-hash comparison (stage 3)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    group_by_chunk_digest, group_by_full_digest, ChunkHashStats, ConfigError, DuplicateFinder,
    FinderConfig, FinderError, FullHashStats, HashFailurePolicy, HashPhaseConfig, ScanSummary,
    DEFAULT_IO_THREADS,
};
pub use groups::{group_by_size, DuplicateGroup, GroupedBy, GroupingStats};
