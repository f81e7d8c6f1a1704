//! Benchmarks for the staged duplicate detection pipeline.
//!
//! Compares the staged pipeline against the selectable hash algorithms on
//! a synthetic tree with a realistic mix of unique sizes, size collisions,
//! and true duplicates.

use criterion::{criterion_group, criterion_main, Criterion};
use dupefinder::duplicates::{DuplicateFinder, FinderConfig};
use dupefinder::scanner::HashAlgorithm;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Build a tree where roughly a third of the files are duplicates, a
/// third collide on size only, and a third have unique sizes.
fn build_tree(files_per_kind: usize) -> TempDir {
    let dir = TempDir::new().unwrap();

    for i in 0..files_per_kind {
        // true duplicates, shared content
        write_file(
            &dir.path().join(format!("dup_{i}")),
            &vec![b'd'; 4096],
        );
        // size collision, content diverges after the first chunk
        let mut collider = vec![b'd'; 4096];
        collider[4000] = (i % 256) as u8;
        write_file(&dir.path().join(format!("near_{i}")), &collider);
        // unique size
        write_file(
            &dir.path().join(format!("uniq_{i}")),
            &vec![b'u'; 1000 + i],
        );
    }

    dir
}

fn write_file(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn bench_pipeline(c: &mut Criterion) {
    let tree = build_tree(40);
    let roots = [tree.path().to_path_buf()];

    let mut group = c.benchmark_group("pipeline");
    for algorithm in [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Blake3,
    ] {
        group.bench_function(algorithm.name(), |b| {
            b.iter(|| {
                let config = FinderConfig::default().with_algorithm(algorithm);
                let (groups, _) = DuplicateFinder::new(config)
                    .find_duplicates(&roots)
                    .unwrap();
                assert_eq!(groups.len(), 1);
                groups
            });
        });
    }
    group.finish();
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let tree = build_tree(40);
    let roots = [tree.path().to_path_buf()];

    let mut group = c.benchmark_group("chunk_size");
    for chunk_size in [1024usize, 4096, 65536] {
        group.bench_function(format!("{chunk_size}"), |b| {
            b.iter(|| {
                let config = FinderConfig::default().with_chunk_size(chunk_size);
                DuplicateFinder::new(config).find_duplicates(&roots).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_chunk_sizes);
criterion_main!(benches);
