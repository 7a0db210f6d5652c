//! Mapping user-entered numbers onto catalog files.
//!
//! Selection numbers come from [`DuplicateCatalog::indexed`]; the functions
//! here never re-derive the ordering themselves. Validation is
//! all-or-nothing: one bad token rejects the whole input.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::duplicates::{DuplicateCatalog, IndexedFile};

/// A validated set of 1-based selection numbers.
pub type Selection = BTreeSet<usize>;

/// Error type for rejected selections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing was entered.
    #[error("no file numbers given")]
    Empty,

    /// A token is not a non-negative integer.
    #[error("not a file number: {0:?}")]
    InvalidToken(String),

    /// A number lies outside `1..=max`.
    #[error("file number {index} is out of range 1..={max}")]
    OutOfRange {
        /// The offending number
        index: usize,
        /// Largest valid number
        max: usize,
    },

    /// Every copy of a duplicate group was selected.
    #[error("all copies selected: at least one of {} must be kept", .0.display())]
    AllCopiesSelected(PathBuf),
}

/// Assign selection numbers to every file in the catalog.
#[must_use]
pub fn assign_indices(catalog: &DuplicateCatalog) -> Vec<IndexedFile<'_>> {
    catalog.indexed().collect()
}

/// Check every number against `1..=max`.
///
/// # Errors
///
/// [`SelectionError::Empty`] for an empty set, otherwise
/// [`SelectionError::OutOfRange`] for the first number outside the range.
pub fn validate(indices: &Selection, max: usize) -> Result<(), SelectionError> {
    if indices.is_empty() {
        return Err(SelectionError::Empty);
    }
    match indices.iter().find(|&&i| i == 0 || i > max) {
        Some(&index) => Err(SelectionError::OutOfRange { index, max }),
        None => Ok(()),
    }
}

/// Parse whitespace-separated numbers and validate them against `1..=max`.
///
/// Repeated numbers collapse into one.
///
/// # Errors
///
/// See [`SelectionError`].
///
/// # Example
///
/// ```
/// use dupsweep::actions::selection::{parse_selection, SelectionError};
///
/// let selection = parse_selection("2 1 2", 3).unwrap();
/// assert_eq!(selection.into_iter().collect::<Vec<_>>(), vec![1, 2]);
///
/// assert!(matches!(parse_selection("3", 2), Err(SelectionError::OutOfRange { .. })));
/// assert!(matches!(parse_selection("1 x", 2), Err(SelectionError::InvalidToken(_))));
/// ```
pub fn parse_selection(input: &str, max: usize) -> Result<Selection, SelectionError> {
    let indices = input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| SelectionError::InvalidToken(token.to_string()))
        })
        .collect::<Result<Selection, _>>()?;

    validate(&indices, max)?;
    Ok(indices)
}

/// Reject selections that would remove every copy of some group.
///
/// # Errors
///
/// [`SelectionError::AllCopiesSelected`] naming the first file of the
/// first fully selected group.
pub fn validate_preserves_copy(
    catalog: &DuplicateCatalog,
    indices: &Selection,
) -> Result<(), SelectionError> {
    let mut index = 1;
    for group in catalog.groups() {
        let range = index..index + group.len();
        if range.clone().all(|i| indices.contains(&i)) {
            log::debug!("Selection removes every copy of {}", group.hash_hex());
            return Err(SelectionError::AllCopiesSelected(group.files[0].clone()));
        }
        index = range.end;
    }
    Ok(())
}
