//! Chunked file hashing with a selectable digest algorithm.
//!
//! # Overview
//!
//! The [`Hasher`] reads a file sequentially in fixed-size chunks and feeds
//! them into a fresh digest state. An optional chunk limit bounds the read
//! to the first N chunks, which is how the cheap prefix signature of the
//! duplicate pipeline is computed; without a limit the whole file is
//! consumed. A file shorter than the limit is read to end-of-file and the
//! bytes actually read are hashed, so a short file still produces a valid
//! digest (including the empty file).
//!
//! A new digest state is created per invocation. The algorithm selector is
//! a plain `Copy` enum, so concurrent hashes never share mutable state.

use std::fs::File;
use std::io::{BufReader, Read};
use std::num::NonZeroUsize;
use std::path::Path;

use sha1::Sha1;
use sha2::{Digest as _, Sha256};

use super::HashError;

/// Default chunk size in bytes for both hashing stages.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Read buffer capacity for streaming hash computation (64 KiB).
const BUF_SIZE: usize = 64 * 1024;

/// Digest algorithm used for both the prefix and full hashing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-1, the classic 160-bit dedup default.
    Sha1,
    /// SHA-256.
    Sha256,
    /// BLAKE3, fastest on large trees.
    Blake3,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha1
    }
}

impl HashAlgorithm {
    /// Digest length in bytes for this algorithm.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 | Self::Blake3 => 32,
        }
    }

    /// Lowercase algorithm name as shown in logs and JSON output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }

    fn new_state(self) -> DigestState {
        match self {
            Self::Sha1 => DigestState::Sha1(Sha1::new()),
            Self::Sha256 => DigestState::Sha256(Sha256::new()),
            Self::Blake3 => DigestState::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// In-flight digest state, created fresh for every hashed file.
enum DigestState {
    Sha1(Sha1),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl DigestState {
    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(bytes),
            Self::Sha256(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Sha1(h) => Digest::from_vec(h.finalize().to_vec()),
            Self::Sha256(h) => Digest::from_vec(h.finalize().to_vec()),
            Self::Blake3(h) => Digest::from_vec(h.finalize().as_bytes().to_vec()),
        }
    }
}

/// Fixed-length output of a cryptographic hash over file content.
///
/// Digest equality is treated as proof of content equality. The length
/// depends on the algorithm (20 bytes for SHA-1, 32 for SHA-256/BLAKE3),
/// so the bytes are held behind a boxed slice rather than a fixed array.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Box<[u8]>);

impl Digest {
    fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest is empty (never true for a computed digest).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digest as a lowercase hexadecimal string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(self.0.len() * 2);
        for byte in self.0.iter() {
            hex.push_str(&format!("{byte:02x}"));
        }
        hex
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Chunked streaming file hasher.
///
/// # Example
///
/// ```no_run
/// use dupefinder::scanner::{HashAlgorithm, Hasher};
/// use std::num::NonZeroUsize;
/// use std::path::Path;
///
/// let hasher = Hasher::new(HashAlgorithm::Sha1, 1024);
/// let prefix = hasher.prefix_digest(Path::new("a.bin"), NonZeroUsize::MIN).unwrap();
/// let full = hasher.full_digest(Path::new("a.bin")).unwrap();
/// assert_eq!(prefix.len(), full.len());
/// ```
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl Hasher {
    /// Create a hasher for the given algorithm and chunk size.
    ///
    /// The chunk size must be positive; [`crate::duplicates::FinderConfig`]
    /// validates this before any hashing starts.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            algorithm,
            chunk_size,
        }
    }

    /// The configured digest algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest of the first `limit` chunks of the file.
    ///
    /// Reads at most `limit * chunk_size` bytes. A file shorter than that
    /// is read to end-of-file and whatever was read is hashed, so two files
    /// of equal size share a prefix digest iff their compared windows are
    /// byte-identical.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// mid-stream.
    pub fn prefix_digest(&self, path: &Path, limit: NonZeroUsize) -> Result<Digest, HashError> {
        self.digest_file(path, Some(limit))
    }

    /// Digest of the entire file content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// mid-stream.
    pub fn full_digest(&self, path: &Path) -> Result<Digest, HashError> {
        self.digest_file(path, None)
    }

    fn digest_file(&self, path: &Path, limit: Option<NonZeroUsize>) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut reader = BufReader::with_capacity(BUF_SIZE.max(self.chunk_size), file);

        let mut state = self.algorithm.new_state();
        let mut chunk = vec![0u8; self.chunk_size];
        let mut chunks_read = 0usize;

        loop {
            if limit.is_some_and(|l| chunks_read == l.get()) {
                break;
            }
            let n = read_chunk(&mut reader, &mut chunk).map_err(|e| HashError::from_io(path, e))?;
            state.update(&chunk[..n]);
            if n < chunk.len() {
                // short read means end-of-file
                break;
            }
            chunks_read += 1;
        }

        Ok(state.finalize())
    }
}

/// Fill `buf` from the reader, stopping early only at end-of-file.
///
/// Returns the number of bytes read, which is less than `buf.len()` only
/// when the stream ended.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
