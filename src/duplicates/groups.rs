//! Grouping containers and size-based file organization.
//!
//! # Overview
//!
//! Every pipeline stage buckets files by a grouping key (size, then prefix
//! digest, then full digest). Report order is defined as insertion order at
//! every stage, so the buckets live in [`GroupedBy`], an explicitly
//! insertion-ordered container, instead of a bare `HashMap` whose iteration
//! order would leak into the output.
//!
//! Size grouping is the first stage: files with different sizes cannot be
//! duplicates, which typically eliminates the bulk of the input before any
//! byte is read.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;

use crate::scanner::{Digest, FileEntry};

/// Insertion-ordered buckets of file entries keyed by a grouping key.
///
/// Buckets iterate in the order their keys were first inserted; members
/// within a bucket keep the order they were pushed. Lookup stays O(1) via
/// a side index into the bucket list.
#[derive(Debug, Clone, Default)]
pub struct GroupedBy<K> {
    index: HashMap<K, usize>,
    buckets: Vec<(K, Vec<FileEntry>)>,
}

impl<K: Eq + Hash + Clone> GroupedBy<K> {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            buckets: Vec::new(),
        }
    }

    /// Append an entry to the bucket for `key`, creating the bucket at the
    /// end of the order if the key is new.
    pub fn insert(&mut self, key: K, entry: FileEntry) {
        match self.index.get(&key) {
            Some(&i) => self.buckets[i].1.push(entry),
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push((key, vec![entry]));
            }
        }
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of entries across all buckets.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.buckets.iter().map(|(_, members)| members.len()).sum()
    }

    /// Members of the bucket for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&[FileEntry]> {
        self.index
            .get(key)
            .map(|&i| self.buckets[i].1.as_slice())
    }

    /// Iterate buckets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[FileEntry])> {
        self.buckets
            .iter()
            .map(|(key, members)| (key, members.as_slice()))
    }

    /// Consume into the ordered bucket list.
    #[must_use]
    pub fn into_buckets(self) -> Vec<(K, Vec<FileEntry>)> {
        self.buckets
    }

    /// Drop every bucket with fewer than two members, preserving the order
    /// of the survivors. Returns the number of buckets removed.
    ///
    /// Singletons cannot be duplicates; pruning them here keeps the next,
    /// more expensive stage from ever touching their bytes.
    pub fn prune_singletons(&mut self) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|(_, members)| members.len() >= 2);
        self.index.clear();
        for (i, (key, _)) in self.buckets.iter().enumerate() {
            self.index.insert(key.clone(), i);
        }
        before - self.buckets.len()
    }
}

/// Statistics from the size-grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes seen
    pub unique_sizes: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of files that could still be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by exact size (stage 1 of duplicate detection).
///
/// Returns only the buckets with 2+ files, in the order each size was
/// first encountered, along with grouping statistics. Metadata only, no
/// file I/O.
///
/// # Example
///
/// ```
/// use dupefinder::scanner::FileEntry;
/// use dupefinder::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups.get(&100).unwrap().len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (GroupedBy<u64>, GroupingStats) {
    let mut groups: GroupedBy<u64> = GroupedBy::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        groups.insert(file.size, file);
    }

    stats.unique_sizes = groups.len();
    stats.eliminated_unique = groups.prune_singletons();
    stats.duplicate_groups = groups.len();
    stats.potential_duplicates = groups.total_entries();

    log::info!(
        "Size grouping complete: {} files -> {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (groups, stats)
}

/// Confirmed duplicate group of files.
///
/// Every member has the same size, the same prefix digest, and the same
/// full digest; digest equality is taken as content equality.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Full-content digest shared by all members
    pub digest: Digest,
    /// File size in bytes shared by all members
    pub size: u64,
    /// Member files, in pipeline encounter order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: Digest, size: u64, files: Vec<FileEntry>) -> Self {
        Self {
            digest,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.files.len() as u64
    }

    /// Space reclaimed if all copies but one were removed.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        if self.files.len() > 1 {
            self.size * (self.files.len() as u64 - 1)
        } else {
            0
        }
    }

    /// Number of redundant copies (total minus one original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Full digest as a hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// Just the member paths, in group order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}
