//! File actions module.
//!
//! This module provides functionality for:
//! - Mapping selection numbers onto catalog files
//! - Validating user selections (all-or-nothing)
//! - Deleting selected duplicates with freed-space accounting
//!
//! ```no_run
//! use dupsweep::actions::{delete_selected, parse_selection, DeleteConfig, NoDeleteCallback};
//! use dupsweep::duplicates::{DuplicateFinder, SortOrder};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (catalog, _, _) = finder.find_duplicates(Path::new("."), SortOrder::Ascending).unwrap();
//!
//! let selection = parse_selection("1 3", catalog.file_count()).unwrap();
//! let result = delete_selected::<NoDeleteCallback>(&catalog, &selection, &DeleteConfig::default(), None).unwrap();
//! println!("{}", result.summary());
//! ```

pub mod delete;
pub mod selection;

use std::path::Path;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_selected, BatchDeleteResult, DeleteConfig, DeleteError, DeleteFailure,
    DeleteProgressCallback, DeleteResult,
};
pub use selection::{
    assign_indices, parse_selection, validate, validate_preserves_copy, Selection, SelectionError,
};

/// Callback that ignores deletion events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeleteCallback;

impl DeleteProgressCallback for NoDeleteCallback {
    fn on_delete_success(&self, _path: &Path, _size: u64) {}

    fn on_delete_failure(&self, _error: &DeleteError) {}
}
