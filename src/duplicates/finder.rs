//! Duplicate finder implementation with staged detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Size grouping**: bucket files by size (see [`crate::duplicates::groups`])
//! 2. **Prefix hash**: hash the first chunk(s) of same-size files
//! 3. **Full hash**: hash the entire content of prefix-hash matches
//!
//! Each stage consumes its input and only buckets with two or more members
//! ever reach the next, more expensive stage. A file is therefore never
//! fully hashed unless it survived the prefix filter, and never prefix
//! hashed unless another file of the same size exists.
//!
//! # Example
//!
//! ```no_run
//! use dupefinder::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(4));
//! let (groups, summary) = finder.find_duplicates(&[PathBuf::from(".")]).unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{group_by_size, DuplicateGroup, GroupedBy, GroupingStats};
use crate::progress::ProgressCallback;
use crate::scanner::{
    Digest, FileEntry, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig,
    DEFAULT_CHUNK_SIZE,
};

/// Default number of I/O threads for the hashing stages.
///
/// Kept low to prevent disk thrashing on spinning media.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Invalid configuration values, rejected before any file is touched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The hashing chunk size was zero.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// The I/O thread count was zero.
    #[error("I/O thread count must be greater than zero")]
    ZeroIoThreads,
}

/// Policy for files that fail to read during a hashing stage.
///
/// Whatever the choice, it applies uniformly to both the prefix-hash and
/// full-hash stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFailurePolicy {
    /// Abort the whole run on the first read failure (default). A file
    /// that cannot be hashed might have been part of a duplicate group,
    /// and a silently incomplete report is worse than no report.
    #[default]
    Abort,

    /// Log a warning, exclude the file, and keep going. The run finishes
    /// with a partial-success exit code.
    SkipAndWarn,
}

/// Configuration shared by the two hashing stages.
#[derive(Clone)]
pub struct HashPhaseConfig {
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// Number of leading chunks hashed by the prefix stage.
    pub prefilter_chunks: NonZeroUsize,
    /// What to do when a file fails to read.
    pub failure_policy: HashFailurePolicy,
    /// Optional progress callback.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashPhaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashPhaseConfig")
            .field("io_threads", &self.io_threads)
            .field("prefilter_chunks", &self.prefilter_chunks)
            .field("failure_policy", &self.failure_policy)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for HashPhaseConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            prefilter_chunks: NonZeroUsize::MIN,
            failure_policy: HashFailurePolicy::default(),
            progress: None,
        }
    }
}

/// Statistics from the prefix-hash stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkHashStats {
    /// Total files that entered the stage
    pub input_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files skipped under [`HashFailurePolicy::SkipAndWarn`]
    pub skipped_files: usize,
    /// Number of unique prefix digests (eliminated)
    pub unique_digests: usize,
    /// Number of files that could still be duplicates
    pub potential_duplicates: usize,
    /// Number of prefix buckets with 2+ files
    pub duplicate_groups: usize,
}

impl ChunkHashStats {
    /// Percentage of files eliminated by the prefix comparison.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            let eliminated = self.input_files - self.potential_duplicates;
            (eliminated as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Statistics from the full-hash stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FullHashStats {
    /// Total files that entered the stage
    pub input_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files skipped under [`HashFailurePolicy::SkipAndWarn`]
    pub skipped_files: usize,
    /// Total bytes read and hashed
    pub bytes_hashed: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total files across all confirmed groups
    pub duplicate_files: usize,
    /// Space reclaimed if every copy but one were removed
    pub wasted_space: u64,
}

/// Group files by prefix digest within size buckets (stage 2).
///
/// For each size bucket, computes the digest of each member's first
/// `prefilter_chunks` chunks and sub-buckets members by that digest. Size
/// buckets arrive already pruned, so no digest is ever computed for a file
/// whose size is unique. Returns one digest mapping per input size bucket,
/// in size-bucket order, with singleton sub-buckets pruned.
///
/// # Errors
///
/// Under [`HashFailurePolicy::Abort`], the first read failure cancels the
/// stage: in-flight hashes drain, no new ones start, and the error is
/// returned once.
pub fn group_by_chunk_digest(
    size_groups: GroupedBy<u64>,
    hasher: Arc<Hasher>,
    config: &HashPhaseConfig,
) -> Result<(Vec<GroupedBy<Digest>>, ChunkHashStats), FinderError> {
    let mut stats = ChunkHashStats {
        input_files: size_groups.total_entries(),
        ..Default::default()
    };

    let buckets = size_groups.into_buckets();
    let bucket_count = buckets.len();
    let work: Vec<(usize, FileEntry)> = buckets
        .into_iter()
        .enumerate()
        .flat_map(|(i, (_, members))| members.into_iter().map(move |file| (i, file)))
        .collect();

    if work.is_empty() {
        log::debug!("Prefix hash: no files to process");
        return Ok((Vec::new(), stats));
    }

    if let Some(ref callback) = config.progress {
        callback.on_phase_start("chunk-hash", work.len());
    }
    log::info!(
        "Prefix hashing {} files in {} size groups",
        work.len(),
        bucket_count
    );

    let limit = config.prefilter_chunks;
    let results = hash_files(work, config, |file| {
        hasher.prefix_digest(&file.path, limit)
    });

    let mut grouped: Vec<GroupedBy<Digest>> = (0..bucket_count).map(|_| GroupedBy::new()).collect();
    for (bucket, file, result) in results {
        match result {
            Some(Ok(digest)) => {
                stats.hashed_files += 1;
                grouped[bucket].insert(digest, file);
            }
            Some(Err(e)) => match config.failure_policy {
                HashFailurePolicy::Abort => {
                    finish_phase(config, "chunk-hash");
                    return Err(e.into());
                }
                HashFailurePolicy::SkipAndWarn => {
                    log::warn!("Skipping unreadable file {}: {}", file.path.display(), e);
                    stats.skipped_files += 1;
                }
            },
            // cancelled before starting; the pending error entry aborts above
            None => {}
        }
    }

    for groups in &mut grouped {
        stats.unique_digests += groups.prune_singletons();
        stats.duplicate_groups += groups.len();
    }
    stats.potential_duplicates = grouped.iter().map(GroupedBy::total_entries).sum();

    finish_phase(config, "chunk-hash");
    log::info!(
        "Prefix hash complete: {} files -> {} potential duplicates ({:.1}% eliminated)",
        stats.input_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    Ok((grouped, stats))
}

/// Group files by full digest within prefix buckets (stage 3).
///
/// For each prefix bucket with 2+ members, computes each member's
/// full-content digest and buckets by it. Buckets that end up with 2+
/// members are the confirmed duplicate groups, returned in (size bucket,
/// prefix bucket, full digest) insertion order — the report order.
///
/// # Errors
///
/// Same failure handling as [`group_by_chunk_digest`].
pub fn group_by_full_digest(
    chunk_groups: Vec<GroupedBy<Digest>>,
    hasher: Arc<Hasher>,
    config: &HashPhaseConfig,
) -> Result<(Vec<DuplicateGroup>, FullHashStats), FinderError> {
    let mut stats = FullHashStats {
        input_files: chunk_groups.iter().map(GroupedBy::total_entries).sum(),
        ..Default::default()
    };

    let map_count = chunk_groups.len();
    let work: Vec<(usize, FileEntry)> = chunk_groups
        .into_iter()
        .enumerate()
        .flat_map(|(i, groups)| {
            groups
                .into_buckets()
                .into_iter()
                .filter(|(_, members)| members.len() >= 2)
                .flat_map(move |(_, members)| members.into_iter().map(move |file| (i, file)))
        })
        .collect();

    if work.is_empty() {
        log::debug!("Full hash: no files to process");
        return Ok((Vec::new(), stats));
    }

    if let Some(ref callback) = config.progress {
        callback.on_phase_start("full-hash", work.len());
    }
    log::info!("Full hashing {} files", work.len());

    let results = hash_files(work, config, |file| hasher.full_digest(&file.path));

    let mut grouped: Vec<GroupedBy<Digest>> = (0..map_count).map(|_| GroupedBy::new()).collect();
    for (bucket, file, result) in results {
        match result {
            Some(Ok(digest)) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                grouped[bucket].insert(digest, file);
            }
            Some(Err(e)) => match config.failure_policy {
                HashFailurePolicy::Abort => {
                    finish_phase(config, "full-hash");
                    return Err(e.into());
                }
                HashFailurePolicy::SkipAndWarn => {
                    log::warn!("Skipping unreadable file {}: {}", file.path.display(), e);
                    stats.skipped_files += 1;
                }
            },
            None => {}
        }
    }

    let mut duplicate_groups = Vec::new();
    for groups in grouped {
        for (digest, files) in groups.into_buckets() {
            if files.len() >= 2 {
                let size = files.first().map_or(0, |f| f.size);
                stats.duplicate_files += files.len();
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    digest,
                    files.len(),
                    size
                );
                duplicate_groups.push(DuplicateGroup::new(digest, size, files));
            }
        }
    }
    stats.duplicate_groups = duplicate_groups.len();
    stats.wasted_space = duplicate_groups.iter().map(DuplicateGroup::wasted_space).sum();

    finish_phase(config, "full-hash");
    log::info!(
        "Full hash complete: {} groups, {} duplicate files, {} bytes reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.wasted_space
    );

    Ok((duplicate_groups, stats))
}

/// Hash a flat work list on a bounded thread pool, preserving input order.
///
/// The returned vector lines up with `work`, so the single-threaded fold
/// that follows sees files in encounter order and bucket insertion stays
/// deterministic. Under the abort policy, the first failure flips a shared
/// flag that stops the remaining workers from opening new files; in-flight
/// reads drain normally.
fn hash_files<F>(
    work: Vec<(usize, FileEntry)>,
    config: &HashPhaseConfig,
    hash_fn: F,
) -> Vec<(usize, FileEntry, Option<Result<Digest, HashError>>)>
where
    F: Fn(&FileEntry) -> Result<Digest, HashError> + Sync,
{
    let pool = build_pool(config.io_threads);
    let abort = config.failure_policy == HashFailurePolicy::Abort;
    let failed = AtomicBool::new(false);
    let progress = config.progress.clone();

    pool.install(|| {
        work.into_par_iter()
            .enumerate()
            .map(|(idx, (bucket, file))| {
                if abort && failed.load(Ordering::Relaxed) {
                    return (bucket, file, None);
                }
                if let Some(ref callback) = progress {
                    callback.on_progress(idx + 1, file.path.to_string_lossy().as_ref());
                }
                let result = hash_fn(&file);
                if abort && result.is_err() {
                    failed.store(true, Ordering::Relaxed);
                }
                (bucket, file, Some(result))
            })
            .collect()
    })
}

fn build_pool(io_threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(io_threads)
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create custom thread pool, using global pool with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        })
}

fn finish_phase(config: &HashPhaseConfig, phase: &str) {
    if let Some(ref callback) = config.progress {
        callback.on_phase_end(phase);
    }
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Digest algorithm for both hashing stages.
    pub algorithm: HashAlgorithm,
    /// Chunk size in bytes for both hashing stages.
    pub chunk_size: usize,
    /// Number of leading chunks hashed by the prefix stage.
    pub prefilter_chunks: NonZeroUsize,
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// What to do when a file fails to read during hashing.
    pub failure_policy: HashFailurePolicy,
    /// Configuration for the directory walk.
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("prefilter_chunks", &self.prefilter_chunks)
            .field("io_threads", &self.io_threads)
            .field("failure_policy", &self.failure_policy)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            prefilter_chunks: NonZeroUsize::MIN,
            io_threads: DEFAULT_IO_THREADS,
            failure_policy: HashFailurePolicy::default(),
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hashing chunk size in bytes.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the number of leading chunks for the prefix stage.
    #[must_use]
    pub fn with_prefilter_chunks(mut self, chunks: NonZeroUsize) -> Self {
        self.prefilter_chunks = chunks;
        self
    }

    /// Set the I/O thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads;
        self
    }

    /// Set the hash failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: HashFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Reject configurations that could never hash a file correctly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero chunk size or thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.io_threads == 0 {
            return Err(ConfigError::ZeroIoThreads);
        }
        Ok(())
    }

    fn phase_config(&self) -> HashPhaseConfig {
        HashPhaseConfig {
            io_threads: self.io_threads,
            prefilter_chunks: self.prefilter_chunks,
            failure_policy: self.failure_policy,
            progress: self.progress_callback.clone(),
        }
    }
}

/// Summary statistics for a completed scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files discovered by the walk
    pub total_files: usize,
    /// Total size of all discovered files in bytes
    pub total_size: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total files across all confirmed groups
    pub duplicate_files: usize,
    /// Space reclaimed if every copy but one were removed
    pub reclaimable_space: u64,
    /// Files skipped by the skip-and-warn policy during hashing
    pub skipped_files: usize,
    /// Per-entry walk failures, recovered with a warning
    pub scan_errors: Vec<ScanError>,
    /// Statistics from the size-grouping stage
    pub grouping: GroupingStats,
    /// Duration of the directory walk
    pub walk_duration: Duration,
    /// Duration of the size-grouping stage
    pub size_duration: Duration,
    /// Duration of the prefix-hash stage
    pub chunk_duration: Duration,
    /// Duration of the full-hash stage
    pub fullhash_duration: Duration,
    /// Duration of the whole scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any file was excluded from the result by a warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.scan_errors.is_empty() || self.skipped_files > 0
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Total scanned size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that abort a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// A root path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file failed to read during hashing under the abort policy.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Duplicate finder that orchestrates the staged detection pipeline.
///
/// Runs walk → size grouping → prefix hash → full hash, consuming each
/// stage's output as the next stage's input, and returns the confirmed
/// duplicate groups with a scan summary.
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given root directories.
    ///
    /// Roots are walked in the given order and their files merged into one
    /// candidate set before grouping. Walk failures (including failed size
    /// queries) are logged and recorded in the summary but never fatal;
    /// hash failures follow the configured [`HashFailurePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the configuration is invalid, a root is
    /// missing or not a directory, or hashing fails under the abort policy.
    pub fn find_duplicates(
        &self,
        roots: &[PathBuf],
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start = Instant::now();
        self.config.validate()?;

        for root in roots {
            if !root.exists() {
                return Err(FinderError::PathNotFound(root.clone()));
            }
            if !root.is_dir() {
                return Err(FinderError::NotADirectory(root.clone()));
            }
        }

        let mut summary = ScanSummary::default();

        let walk_start = Instant::now();
        let mut files = Vec::new();
        for root in roots {
            log::info!("Scanning {}", root.display());
            let walker = Walker::new(root, self.config.walker_config.clone());
            for entry in walker.walk() {
                match entry {
                    Ok(file) => {
                        summary.total_files += 1;
                        summary.total_size += file.size;
                        files.push(file);
                    }
                    Err(e) => {
                        log::warn!("{e}");
                        summary.scan_errors.push(e);
                    }
                }
            }
        }
        summary.walk_duration = walk_start.elapsed();

        let size_start = Instant::now();
        let (size_groups, grouping) = group_by_size(files);
        summary.grouping = grouping;
        summary.size_duration = size_start.elapsed();

        let hasher = Arc::new(Hasher::new(self.config.algorithm, self.config.chunk_size));
        let phase_config = self.config.phase_config();

        let chunk_start = Instant::now();
        let (chunk_groups, chunk_stats) =
            group_by_chunk_digest(size_groups, Arc::clone(&hasher), &phase_config)?;
        summary.chunk_duration = chunk_start.elapsed();
        summary.skipped_files += chunk_stats.skipped_files;

        let full_start = Instant::now();
        let (groups, full_stats) = group_by_full_digest(chunk_groups, hasher, &phase_config)?;
        summary.fullhash_duration = full_start.elapsed();
        summary.skipped_files += full_stats.skipped_files;

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = full_stats.duplicate_files;
        summary.reclaimable_space = full_stats.wasted_space;
        summary.scan_duration = start.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} reclaimable",
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &[u8]) {
        File::create(path).unwrap().write_all(content).unwrap();
    }

    fn run(dir: &Path) -> (Vec<DuplicateGroup>, ScanSummary) {
        DuplicateFinder::with_defaults()
            .find_duplicates(&[dir.to_path_buf()])
            .unwrap()
    }

    #[test]
    fn test_staged_filter_scenario() {
        // A and B are duplicates; C matches their size only; D is unique.
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("a.txt"), b"helloworld");
        write_file(&dir.path().join("b.txt"), b"helloworld");
        write_file(&dir.path().join("c.txt"), b"goodbyexxx");
        write_file(&dir.path().join("d.txt"), b"helloworld1234567890");

        let (groups, summary) = run(dir.path());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].size, 10);
        let mut names: Vec<String> = groups[0]
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(summary.total_files, 4);
        assert!(!summary.has_warnings());
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let (groups, summary) = run(dir.path());

        assert!(groups.is_empty());
        assert_eq!(summary.total_files, 0);
        assert!(summary.scan_errors.is_empty());
    }

    #[test]
    fn test_equal_prefix_different_tail_not_merged() {
        // First chunk equal, tails differ: survives the prefix filter but
        // the full hash must split them.
        let dir = tempdir().unwrap();
        let mut content_a = vec![b'p'; 2048];
        let mut content_b = content_a.clone();
        content_a.push(b'a');
        content_b.push(b'b');
        write_file(&dir.path().join("a.bin"), &content_a);
        write_file(&dir.path().join("b.bin"), &content_b);

        let (groups, _) = run(dir.path());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_multiple_roots_merged() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();
        write_file(&dir_a.path().join("one.txt"), b"shared content");
        write_file(&dir_b.path().join("two.txt"), b"shared content");

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder
            .find_duplicates(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()])
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(summary.total_files, 2);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let finder = DuplicateFinder::with_defaults();
        let err = finder
            .find_duplicates(&[PathBuf::from("/nonexistent/dupefinder-finder-test")])
            .unwrap_err();
        assert!(matches!(err, FinderError::PathNotFound(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FinderConfig::default().with_chunk_size(0);
        let dir = tempdir().unwrap();
        let err = DuplicateFinder::new(config)
            .find_duplicates(&[dir.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(
            err,
            FinderError::Config(ConfigError::ZeroChunkSize)
        ));

        let config = FinderConfig::default().with_io_threads(0);
        let err = DuplicateFinder::new(config)
            .find_duplicates(&[dir.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(
            err,
            FinderError::Config(ConfigError::ZeroIoThreads)
        ));
    }

    #[test]
    fn test_report_order_is_insertion_order() {
        // Two duplicate pairs of different sizes: the pair whose size was
        // encountered first must be reported first. Walkdir yields a
        // deterministic order; use subdirectories to pin it.
        let dir = tempdir().unwrap();
        write_file(&dir.path().join("a_first.bin"), &[b'x'; 300]);
        write_file(&dir.path().join("b_second.bin"), &[b'y'; 200]);
        write_file(&dir.path().join("c_third.bin"), &[b'x'; 300]);
        write_file(&dir.path().join("d_fourth.bin"), &[b'y'; 200]);

        let (groups, _) = run(dir.path());
        assert_eq!(groups.len(), 2);

        // Recover the walk order from the walker itself so the assertion
        // does not depend on platform readdir order.
        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let first_size = walker.walk().find_map(Result::ok).unwrap().size;
        assert_eq!(groups[0].size, first_size);
    }

    #[test]
    fn test_three_way_duplicates_single_group() {
        let dir = tempdir().unwrap();
        for name in ["x1.txt", "x2.txt", "x3.txt"] {
            write_file(&dir.path().join(name), b"same bytes everywhere");
        }

        let (groups, summary) = run(dir.path());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files.len(), 3);
        assert_eq!(groups[0].duplicate_count(), 2);
        assert_eq!(summary.duplicate_files, 3);
        assert_eq!(
            summary.reclaimable_space,
            2 * "same bytes everywhere".len() as u64
        );
    }

    /// Make a file unreadable, or return false when permissions don't
    /// apply (running as root).
    #[cfg(unix)]
    fn lock_file(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)).unwrap();
        File::open(path).is_err()
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_aborts_by_default() {
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked.txt");
        write_file(&locked, b"same size!");
        write_file(&dir.path().join("open.txt"), b"same size!");
        if !lock_file(&locked) {
            return;
        }

        let result = DuplicateFinder::with_defaults().find_duplicates(&[dir.path().to_path_buf()]);
        assert!(matches!(result, Err(FinderError::Hash(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_skipped_under_policy() {
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked.txt");
        write_file(&locked, b"same size!");
        write_file(&dir.path().join("open1.txt"), b"duplicated");
        write_file(&dir.path().join("open2.txt"), b"duplicated");
        if !lock_file(&locked) {
            return;
        }

        let config = FinderConfig::default().with_failure_policy(HashFailurePolicy::SkipAndWarn);
        let (groups, summary) = DuplicateFinder::new(config)
            .find_duplicates(&[dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(summary.skipped_files, 1);
        assert!(summary.has_warnings());
    }

    #[cfg(unix)]
    #[test]
    fn test_unique_size_never_hashed() {
        // The unreadable file has a unique size, so no stage may touch its
        // bytes; under the abort policy the run still succeeds.
        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked-unique.txt");
        write_file(&locked, b"nobody else is this long....");
        write_file(&dir.path().join("pair1.txt"), b"twin");
        write_file(&dir.path().join("pair2.txt"), b"twin");
        if !lock_file(&locked) {
            return;
        }

        let (groups, _) = DuplicateFinder::with_defaults()
            .find_duplicates(&[dir.path().to_path_buf()])
            .unwrap();
        assert_eq!(groups.len(), 1);
    }
}
