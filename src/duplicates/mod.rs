//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file bucketing (Phase 1)
//! - Content hash grouping (Phase 2)
//! - The numbered duplicate catalog used for selection

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, HashSummary, ScanSummary};
pub use groups::{
    group_by_size, sorted_buckets, DuplicateCatalog, GroupingStats, HashGroup, IndexedFile,
    SizeBuckets, SizeEntry, SortOrder,
};
