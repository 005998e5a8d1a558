use super::common::write;
use dupesift::actions::purge_empty_subdirs;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_purge_removes_nested_empty_dirs() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("a").join("b").join("c")).unwrap();
    fs::create_dir_all(root.join("d")).unwrap();

    let summary = purge_empty_subdirs(&[root.clone()]);

    assert!(summary.is_complete());
    assert_eq!(summary.removed.len(), 4);
    assert!(root.is_dir());
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
}

#[test]
fn test_purge_keeps_ancestors_of_files() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    let leaf = root.join("keep").join("deeper").join("file.txt");
    write(&leaf, b"still here");
    fs::create_dir_all(root.join("keep").join("empty")).unwrap();

    let summary = purge_empty_subdirs(&[root.clone()]);

    assert_eq!(summary.removed, vec![root.join("keep").join("empty")]);
    assert!(leaf.is_file());
    assert!(root.join("keep").join("deeper").is_dir());
}

#[test]
fn test_purge_never_removes_roots() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(second.join("inner")).unwrap();

    let summary = purge_empty_subdirs(&[first.clone(), second.clone()]);

    assert!(first.is_dir());
    assert!(second.is_dir());
    assert!(!second.join("inner").exists());
    assert_eq!(summary.removed.len(), 1);
}
