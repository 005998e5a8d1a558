use super::common::{write, Sandbox};
use dupesift::duplicates::{DuplicateFinder, DuplicateIndex, FinderConfig, SimilarFiles};
use dupesift::scanner::{BucketKey, KeyPolicy};
use filetime::{set_file_mtime, FileTime};
use tempfile::tempdir;

fn scan_all(sources: &[std::path::PathBuf], config: FinderConfig) -> DuplicateIndex {
    let finder = DuplicateFinder::new(config);
    let mut index = DuplicateIndex::new();
    for source in sources {
        finder.scan(source, &mut index).unwrap();
    }
    index
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let mut index = DuplicateIndex::new();

    let summary = DuplicateFinder::with_defaults()
        .scan(dir.path(), &mut index)
        .unwrap();

    assert!(index.is_empty());
    assert_eq!(summary.files_scanned, 0);
    assert_eq!(index.count_duplicate_groups(), 0);
    assert_eq!(index.count_unique_groups(), 0);
}

#[test]
fn test_scan_across_sources() {
    let sandbox = Sandbox::new();
    let index = scan_all(&sandbox.sources(), FinderConfig::default());

    assert_eq!(index.path_count(), 6);
    // x.txt and n.md are duplicated; the two y.txt share a size only.
    assert_eq!(index.count_duplicate_groups(), 2);
    assert_eq!(index.count_unique_groups(), 4);

    let groups: Vec<Vec<_>> = index
        .duplicate_groups()
        .map(|view| view.group.paths().map(|p| p.to_path_buf()).collect())
        .collect();
    assert!(groups.contains(&vec![sandbox.a.join("x.txt"), sandbox.b.join("x.txt")]));
    assert!(groups.contains(&vec![
        sandbox.a.join("docs").join("n.md"),
        sandbox.b.join("deep").join("er").join("n.md"),
    ]));
}

#[test]
fn test_first_source_holds_the_original() {
    let sandbox = Sandbox::new();
    let index = scan_all(&[sandbox.b.clone(), sandbox.a.clone()], FinderConfig::default());

    for view in index.duplicate_groups() {
        let first = view.group.first().unwrap();
        assert!(first.original.starts_with(&sandbox.b));
    }
}

#[test]
fn test_singleton_bucket_stays_unhashed() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("alone.bin"), b"nobody else is this long");
    write(&dir.path().join("p.bin"), b"12");
    write(&dir.path().join("q.bin"), b"34");

    let index = scan_all(&[dir.path().to_path_buf()], FinderConfig::default());

    let mut hashed = 0;
    for (key, bucket) in index.buckets() {
        match bucket {
            SimilarFiles::Unhashed(group) => {
                assert_eq!(key, &BucketKey::from_size(24));
                assert_eq!(group.len(), 1);
            }
            SimilarFiles::Hashed(map) => {
                assert_eq!(key.size, 2);
                assert_eq!(map.len(), 2);
                hashed += 1;
            }
        }
    }
    assert_eq!(hashed, 1);
    assert_eq!(index.count_duplicate_groups(), 0);
}

#[test]
fn test_modified_time_splits_buckets() {
    let dir = tempdir().unwrap();
    let older = dir.path().join("older.txt");
    let newer = dir.path().join("newer.txt");
    write(&older, b"same");
    write(&newer, b"same");
    set_file_mtime(&older, FileTime::from_unix_time(1_565_258_359, 0)).unwrap();
    set_file_mtime(&newer, FileTime::from_unix_time(1_565_258_400, 0)).unwrap();

    let by_size = scan_all(&[dir.path().to_path_buf()], FinderConfig::default());
    assert_eq!(by_size.count_duplicate_groups(), 1);

    let by_time = scan_all(
        &[dir.path().to_path_buf()],
        FinderConfig::default().with_key_policy(KeyPolicy::SizeAndModified),
    );
    assert_eq!(by_time.count_duplicate_groups(), 0);
    assert_eq!(by_time.bucket_count(), 2);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("e1"), b"");
    write(&dir.path().join("e2"), b"");

    let index = scan_all(&[dir.path().to_path_buf()], FinderConfig::default());
    assert_eq!(index.count_duplicate_groups(), 1);
    let view = index.duplicate_groups().next().unwrap();
    assert_eq!(view.key.size, 0);
}
