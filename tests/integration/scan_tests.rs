use dupsweep::duplicates::{DuplicateFinder, FinderConfig, FinderError, SortOrder};
use dupsweep::scanner::{hash_to_hex, Hasher, ScanError, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_scan_concrete_scenario() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"XXXXXXXXXX");
    let b = write(dir.path(), "b.txt", b"XXXXXXXXXX");
    let c = write(dir.path(), "c.txt", b"YYYYYYYYYY");
    write(dir.path(), "d.txt", b"ZZZZZ");

    let finder = DuplicateFinder::with_defaults();
    let (buckets, summary) = finder.scan(dir.path()).unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[&10], vec![a.clone(), b.clone(), c]);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.potential_duplicates, 3);
    assert_eq!(summary.skipped(), 0);

    let (catalog, hashed) = finder.group(buckets, SortOrder::Descending).unwrap();
    assert_eq!(catalog.group_count(), 1);
    assert_eq!(hashed.hashed_files, 3);
    assert_eq!(hashed.unique_files, 1);

    let entry = &catalog.entries()[0];
    assert_eq!(entry.size, 10);
    assert_eq!(entry.groups[0].files, vec![a.clone(), b.clone()]);

    let expected = hash_to_hex(&Hasher::new().full_hash(&a).unwrap());
    assert_eq!(entry.groups[0].hash_hex(), expected);

    let indexed: Vec<_> = catalog.indexed().map(|f| (f.index, f.path.to_path_buf())).collect();
    assert_eq!(indexed, vec![(1, a), (2, b)]);
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (catalog, scan, hashed) = finder
        .find_duplicates(dir.path(), SortOrder::Ascending)
        .unwrap();

    assert!(catalog.is_empty());
    assert_eq!(scan.total_files, 0);
    assert_eq!(hashed.duplicate_groups, 0);
}

#[test]
fn test_scan_suffix_filter() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.log", b"same");
    write(dir.path(), "two.log", b"same");
    write(dir.path(), "one.txt", b"same");
    write(dir.path(), "notlog", b"same");

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_suffix(Some(".log".into())));
    let finder = DuplicateFinder::new(config);

    let (buckets, summary) = finder.scan(dir.path()).unwrap();
    assert_eq!(summary.total_files, 2);
    let paths = &buckets[&4];
    assert!(paths.iter().all(|p| p.to_string_lossy().ends_with(".log")));
}

#[test]
fn test_scan_suffix_is_literal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"1");
    write(dir.path(), "b.txt", b"1");

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_suffix(Some("*.txt".into())));
    let (buckets, _) = DuplicateFinder::new(config).scan(dir.path()).unwrap();
    assert!(buckets.is_empty());
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.bin", b"payload");
    write(dir.path(), "x/y/deep.bin", b"payload");
    write(dir.path(), "x/other.bin", b"payloaD");

    let finder = DuplicateFinder::with_defaults();
    let (catalog, _, _) = finder
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    assert_eq!(catalog.file_count(), 2);
    let names: Vec<_> = catalog
        .indexed()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"top.bin".to_string()));
    assert!(names.contains(&"deep.bin".to_string()));
}

#[test]
fn test_sort_order_of_catalog() {
    let dir = tempdir().unwrap();
    write(dir.path(), "s1", b"ab");
    write(dir.path(), "s2", b"ab");
    write(dir.path(), "l1", b"abcdef");
    write(dir.path(), "l2", b"abcdef");

    let finder = DuplicateFinder::with_defaults();

    let (desc, _, _) = finder
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();
    let sizes: Vec<u64> = desc.entries().iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![6, 2]);

    let (asc, _, _) = finder
        .find_duplicates(dir.path(), SortOrder::Ascending)
        .unwrap();
    let sizes: Vec<u64> = asc.entries().iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![2, 6]);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        write(dir.path(), &format!("f{i}.dat"), format!("{}", i % 2).as_bytes());
    }
    write(dir.path(), "sub/g.dat", b"0");

    let finder = DuplicateFinder::with_defaults();
    let (first, _, _) = finder
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();
    let (second, _, _) = finder
        .find_duplicates(dir.path(), SortOrder::Descending)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.group_count(), 2);
}

#[test]
fn test_parallel_hashing_matches_sequential() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        write(dir.path(), &format!("f{i:02}"), format!("{:04}", i % 5).as_bytes());
    }

    let sequential = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), SortOrder::Ascending)
        .unwrap()
        .0;
    let parallel = DuplicateFinder::new(FinderConfig::default().with_io_threads(4))
        .find_duplicates(dir.path(), SortOrder::Ascending)
        .unwrap()
        .0;

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.group_count(), 5);
}

#[test]
fn test_missing_root_fails_before_walking() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = DuplicateFinder::with_defaults().scan(&missing).unwrap_err();
    assert!(err.is_invalid_root());
    assert!(matches!(err, FinderError::Scan(ScanError::NotFound(_))));
}

#[test]
fn test_file_as_root_is_rejected() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "plain.txt", b"x");

    let err = DuplicateFinder::with_defaults().scan(&file).unwrap_err();
    assert!(matches!(err, FinderError::Scan(ScanError::NotADirectory(_))));
}

#[test]
fn test_vanished_file_is_left_out() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"same");
    write(dir.path(), "b", b"same");
    let gone = write(dir.path(), "c", b"same");

    let finder = DuplicateFinder::with_defaults();
    let (buckets, _) = finder.scan(dir.path()).unwrap();
    fs::remove_file(&gone).unwrap();

    let (catalog, hashed) = finder.group(buckets, SortOrder::Descending).unwrap();
    assert_eq!(hashed.failed_files, 1);
    assert_eq!(hashed.errors[0].path(), gone.as_path());
    assert_eq!(catalog.file_count(), 2);
    assert!(catalog.indexed().all(|f| f.path != gone.as_path()));
}
