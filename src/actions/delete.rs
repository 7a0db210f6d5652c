//! Deletion of selected duplicates with freed-space accounting.
//!
//! # Overview
//!
//! This module provides:
//! - Permanent removal (default) or move to the system trash
//! - Batch deletion of catalog selections, one independent attempt per file
//! - Freed-byte accounting from the catalog's bucket sizes
//!
//! # Accounting
//!
//! A file counts toward [`BatchDeleteResult::bytes_freed`] only once its
//! removal succeeded, and it counts with the size of the bucket it was found
//! in. The file is never re-read after removal.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::delete::{delete_file, DeleteConfig};
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt"), &DeleteConfig::default()) {
//!     Ok(()) => println!("Deleted"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::selection::{validate, Selection, SelectionError};
use crate::duplicates::DuplicateCatalog;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// File that could not be moved
        path: PathBuf,
        /// Message from the trash backend
        message: String,
    },

    /// The path exists but is not a regular file.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// A file that was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Selection number of the file.
    pub index: usize,
    /// Path that was deleted.
    pub path: PathBuf,
    /// Bucket size credited to the freed total.
    pub size: u64,
}

/// A selected file that could not be removed.
#[derive(Debug)]
pub struct DeleteFailure {
    /// Selection number of the file.
    pub index: usize,
    /// Why removal failed.
    pub error: DeleteError,
}

/// Results of a batch deletion operation.
#[derive(Debug, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions with their errors.
    pub failures: Vec<DeleteFailure>,
    /// Total bytes freed by successful deletions.
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Move files to the system trash instead of removing them.
    pub use_trash: bool,
}

impl DeleteConfig {
    /// Config for permanent removal.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Config for moving files to the trash.
    #[must_use]
    pub fn trash() -> Self {
        Self { use_trash: true }
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback {
    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, error: &DeleteError);
}

/// Delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `NotAFile` if the path is a directory or other non-file
/// - `PermissionDenied` if deletion is not allowed
/// - `TrashFailed` if the trash operation fails
pub fn delete_file(path: &Path, config: &DeleteConfig) -> Result<(), DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }

    if config.use_trash {
        trash::delete(path).map_err(|e| {
            log::error!("Trash operation failed for {}: {}", path.display(), e);
            DeleteError::TrashFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        log::info!("Moved to trash: {}", path.display());
    } else {
        fs::remove_file(path).map_err(|e| {
            log::error!("Delete failed for {}: {}", path.display(), e);
            DeleteError::from_io(path, e)
        })?;
        log::info!("Deleted: {}", path.display());
    }

    Ok(())
}

/// Delete every catalog file whose number is in `indices`.
///
/// The selection is validated against the catalog first, so nothing is
/// touched when it is invalid. Afterwards each file is attempted
/// independently: a failure is recorded and the batch moves on.
///
/// # Errors
///
/// [`SelectionError`] if `indices` is empty or out of range.
///
/// # Example
///
/// ```no_run
/// use dupsweep::actions::delete::{delete_selected, DeleteConfig, DeleteProgressCallback, DeleteError};
/// use dupsweep::actions::selection::parse_selection;
/// use dupsweep::duplicates::{DuplicateFinder, SortOrder};
/// use std::path::Path;
///
/// struct NoCallback;
/// impl DeleteProgressCallback for NoCallback {
///     fn on_delete_success(&self, _: &Path, _: u64) {}
///     fn on_delete_failure(&self, _: &DeleteError) {}
/// }
///
/// let finder = DuplicateFinder::with_defaults();
/// let (catalog, _, _) = finder.find_duplicates(Path::new("."), SortOrder::Descending).unwrap();
/// let selection = parse_selection("2", catalog.file_count()).unwrap();
///
/// let result = delete_selected::<NoCallback>(&catalog, &selection, &DeleteConfig::default(), None).unwrap();
/// println!("{}", result.summary());
/// ```
pub fn delete_selected<C: DeleteProgressCallback>(
    catalog: &DuplicateCatalog,
    indices: &Selection,
    config: &DeleteConfig,
    callback: Option<&C>,
) -> Result<BatchDeleteResult, SelectionError> {
    validate(indices, catalog.file_count())?;

    let mut result = BatchDeleteResult::default();

    for file in catalog.indexed().filter(|f| indices.contains(&f.index)) {
        match delete_file(file.path, config) {
            Ok(()) => {
                result.bytes_freed += file.size;
                if let Some(cb) = callback {
                    cb.on_delete_success(file.path, file.size);
                }
                result.successes.push(DeleteResult {
                    index: file.index,
                    path: file.path.to_path_buf(),
                    size: file.size,
                });
            }
            Err(error) => {
                log::warn!("Failed to delete #{}: {}", file.index, error);
                if let Some(cb) = callback {
                    cb.on_delete_failure(&error);
                }
                result.failures.push(DeleteFailure {
                    index: file.index,
                    error,
                });
            }
        }
    }

    log::info!("{}", result.summary());

    Ok(result)
}
