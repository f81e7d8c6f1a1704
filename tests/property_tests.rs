//! Property-based tests for the staged duplicate pipeline.
//!
//! The pipeline's contract is simple enough to state exactly: two files
//! land in the same group iff their contents are byte-identical, every
//! reported group has at least two members, and running the pipeline twice
//! over an unchanged tree yields the same grouping.

use dupefinder::duplicates::{DuplicateFinder, FinderConfig};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

/// Write the generated contents as files `f0..fN` and scan the directory.
fn scan_contents(
    contents: &[Vec<u8>],
    config: FinderConfig,
) -> Vec<dupefinder::duplicates::DuplicateGroup> {
    let dir = tempdir().unwrap();
    for (i, content) in contents.iter().enumerate() {
        File::create(dir.path().join(format!("f{i}")))
            .unwrap()
            .write_all(content)
            .unwrap();
    }
    let (groups, _) = DuplicateFinder::new(config)
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    groups
}

/// Expected duplicate partition: file indices grouped by exact content.
fn expected_groups(contents: &[Vec<u8>]) -> Vec<Vec<String>> {
    let mut by_content: HashMap<&[u8], Vec<String>> = HashMap::new();
    for (i, content) in contents.iter().enumerate() {
        by_content
            .entry(content.as_slice())
            .or_default()
            .push(format!("f{i}"));
    }
    let mut expected: Vec<Vec<String>> = by_content
        .into_values()
        .filter(|names| names.len() >= 2)
        .collect();
    for names in &mut expected {
        names.sort();
    }
    expected.sort();
    expected
}

/// Normalize reported groups to sorted member-name sets.
fn actual_groups(groups: &[dupefinder::duplicates::DuplicateGroup]) -> Vec<Vec<String>> {
    let mut actual: Vec<Vec<String>> = groups
        .iter()
        .map(|g| {
            let mut names: Vec<String> = g
                .files
                .iter()
                .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        })
        .collect();
    actual.sort();
    actual
}

/// File contents drawn from a tiny alphabet and short lengths, so that
/// size collisions and shared prefixes are common and all three stages do
/// real work.
fn content_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    vec(vec(prop_oneof![Just(b'a'), Just(b'b')], 0..6), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_grouping_matches_content_equality(contents in content_strategy()) {
        let groups = scan_contents(&contents, FinderConfig::default());
        prop_assert_eq!(actual_groups(&groups), expected_groups(&contents));
    }

    #[test]
    fn prop_no_singleton_groups(contents in content_strategy()) {
        let groups = scan_contents(&contents, FinderConfig::default());
        for group in &groups {
            prop_assert!(group.len() >= 2);
        }
    }

    #[test]
    fn prop_group_members_share_size_and_digest(contents in content_strategy()) {
        let groups = scan_contents(&contents, FinderConfig::default());
        for group in &groups {
            for file in &group.files {
                prop_assert_eq!(file.size, group.size);
            }
        }
    }

    #[test]
    fn prop_chunk_size_does_not_change_grouping(
        contents in content_strategy(),
        chunk_size in 1usize..16,
    ) {
        let baseline = scan_contents(&contents, FinderConfig::default());
        let chunked = scan_contents(
            &contents,
            FinderConfig::default().with_chunk_size(chunk_size),
        );
        prop_assert_eq!(actual_groups(&baseline), actual_groups(&chunked));
    }

    #[test]
    fn prop_idempotent(contents in content_strategy()) {
        let dir = tempdir().unwrap();
        for (i, content) in contents.iter().enumerate() {
            File::create(dir.path().join(format!("f{i}")))
                .unwrap()
                .write_all(content)
                .unwrap();
        }

        let roots = [dir.path().to_path_buf()];
        let (first, _) = DuplicateFinder::with_defaults().find_duplicates(&roots).unwrap();
        let (second, _) = DuplicateFinder::with_defaults().find_duplicates(&roots).unwrap();

        prop_assert_eq!(actual_groups(&first), actual_groups(&second));
    }
}

/// Deterministic no-false-merge check kept out of proptest: equal size and
/// equal prefix must still split on differing tails.
#[test]
fn test_no_false_merge_on_shared_prefix() {
    let shared_prefix = vec![b'p'; 1024];
    let mut a = shared_prefix.clone();
    a.extend_from_slice(b"tail-one");
    let mut b = shared_prefix;
    b.extend_from_slice(b"tail-two");

    let groups = scan_contents(&[a, b], FinderConfig::default());
    assert!(groups.is_empty());
}

#[test]
fn test_paths_only_appear_once_across_groups() {
    let contents: Vec<Vec<u8>> = vec![
        b"one".to_vec(),
        b"one".to_vec(),
        b"two".to_vec(),
        b"two".to_vec(),
        "два".as_bytes().to_vec(),
    ];
    let groups = scan_contents(&contents, FinderConfig::default());

    let mut seen = std::collections::HashSet::new();
    for group in &groups {
        for path in group.paths() {
            assert!(seen.insert(path));
        }
    }
}
