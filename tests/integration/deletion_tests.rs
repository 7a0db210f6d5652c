use dupsweep::actions::{
    delete_selected, parse_selection, DeleteConfig, DeleteError, NoDeleteCallback,
    SelectionError,
};
use dupsweep::duplicates::{DuplicateCatalog, DuplicateFinder, SortOrder};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn catalog_for(root: &Path) -> DuplicateCatalog {
    DuplicateFinder::with_defaults()
        .find_duplicates(root, SortOrder::Descending)
        .unwrap()
        .0
}

fn delete(catalog: &DuplicateCatalog, input: &str) -> dupsweep::actions::BatchDeleteResult {
    let selection = parse_selection(input, catalog.file_count()).unwrap();
    delete_selected::<NoDeleteCallback>(catalog, &selection, &DeleteConfig::permanent(), None)
        .unwrap()
}

#[test]
fn test_delete_second_copy_frees_bucket_size() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("b.txt"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("c.txt"), b"YYYYYYYYYY").unwrap();
    fs::write(dir.path().join("d.txt"), b"ZZZZZ").unwrap();

    let catalog = catalog_for(dir.path());
    let result = delete(&catalog, "2");

    assert_eq!(result.bytes_freed, 10);
    assert!(result.all_succeeded());
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());
    assert!(dir.path().join("d.txt").exists());
}

#[test]
fn test_out_of_range_selection_deletes_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();

    let catalog = catalog_for(dir.path());
    assert_eq!(catalog.file_count(), 2);

    let err = parse_selection("3", catalog.file_count()).unwrap_err();
    assert_eq!(err, SelectionError::OutOfRange { index: 3, max: 2 });

    let bad: dupsweep::actions::Selection = [1, 3].into_iter().collect();
    let err =
        delete_selected::<NoDeleteCallback>(&catalog, &bad, &DeleteConfig::permanent(), None)
            .unwrap_err();
    assert!(matches!(err, SelectionError::OutOfRange { index: 3, .. }));

    assert!(dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_delete_across_groups_and_sizes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("big1"), b"0123456789").unwrap();
    fs::write(dir.path().join("big2"), b"0123456789").unwrap();
    fs::write(dir.path().join("big3"), b"0123456789").unwrap();
    fs::write(dir.path().join("small1"), b"abc").unwrap();
    fs::write(dir.path().join("small2"), b"abc").unwrap();

    let catalog = catalog_for(dir.path());
    // big1..big3 are 1..3, small1..small2 are 4..5
    let result = delete(&catalog, "2 3 5");

    assert_eq!(result.bytes_freed, 10 + 10 + 3);
    assert_eq!(result.success_count(), 3);
    assert!(dir.path().join("big1").exists());
    assert!(!dir.path().join("big2").exists());
    assert!(!dir.path().join("big3").exists());
    assert!(dir.path().join("small1").exists());
    assert!(!dir.path().join("small2").exists());
}

#[test]
fn test_failed_deletion_is_not_counted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"same!").unwrap();
    fs::write(dir.path().join("b"), b"same!").unwrap();
    fs::write(dir.path().join("c"), b"same!").unwrap();

    let catalog = catalog_for(dir.path());
    fs::remove_file(dir.path().join("b")).unwrap();

    let result = delete(&catalog, "2 3");

    assert_eq!(result.bytes_freed, 5);
    assert_eq!(result.success_count(), 1);
    assert_eq!(result.failure_count(), 1);
    assert_eq!(result.failures[0].index, 2);
    assert!(matches!(result.failures[0].error, DeleteError::NotFound(_)));
    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("c").exists());
}

#[test]
fn test_deleting_every_copy_is_allowed_without_keep_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"gone").unwrap();
    fs::write(dir.path().join("b"), b"gone").unwrap();

    let catalog = catalog_for(dir.path());
    let result = delete(&catalog, "1 2");

    assert_eq!(result.bytes_freed, 8);
    assert!(!dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
}
