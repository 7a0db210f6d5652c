//! Size buckets, hash groups and the duplicate catalog.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection: files with
//! different sizes cannot be duplicates, so every file is placed in a bucket
//! keyed by its exact byte size and buckets holding a single file are
//! dropped.
//!
//! The second phase (see [`crate::duplicates::finder`]) splits each bucket
//! by content hash into [`HashGroup`]s. The surviving groups are collected
//! into a [`DuplicateCatalog`], whose traversal order is the one and only
//! source of selection numbering: [`DuplicateCatalog::indexed`] is used both
//! when printing the listing and when mapping a selected number back to a
//! file.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::FileEntry;
//! use dupsweep::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(buckets.len(), 1);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::{hash_to_hex, FileEntry, Hash};

/// Files keyed by exact byte size. Every bucket holds at least two paths.
pub type SizeBuckets = HashMap<u64, Vec<PathBuf>>;

/// Direction in which size entries are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Largest files first.
    #[default]
    Descending,
    /// Smallest files first.
    Ascending,
}

impl SortOrder {
    /// Compare two sizes according to this order.
    #[must_use]
    pub fn compare(self, a: u64, b: u64) -> Ordering {
        match self {
            Self::Descending => b.cmp(&a),
            Self::Ascending => a.cmp(&b),
        }
    }

    /// Whether this order lists the largest sizes first.
    #[must_use]
    pub fn is_descending(self) -> bool {
        self == Self::Descending
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Descending => write!(f, "descending"),
            Self::Ascending => write!(f, "ascending"),
        }
    }
}

/// Statistics from the size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in buckets of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of size buckets with 2+ files
    pub duplicate_buckets: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Within a bucket, paths keep the order in which `files` yielded them.
///
/// # Example
///
/// ```
/// use dupsweep::scanner::FileEntry;
/// use dupsweep::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (buckets, stats) = group_by_size(files);
///
/// assert_eq!(buckets.len(), 1);
/// assert_eq!(buckets[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileEntry>) -> (SizeBuckets, GroupingStats) {
    let mut all_buckets: SizeBuckets = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        all_buckets.entry(file.size).or_default().push(file.path);
    }

    stats.unique_sizes = all_buckets.len();

    let buckets: SizeBuckets = all_buckets
        .into_iter()
        .filter(|(size, paths)| {
            if paths.len() < 2 {
                stats.eliminated_unique += paths.len();
                log::trace!("Eliminated unique size {}: {}", size, paths[0].display());
                false
            } else {
                stats.potential_duplicates += paths.len();
                stats.duplicate_buckets += 1;
                log::debug!("Size bucket {} bytes: {} files", size, paths.len());
                true
            }
        })
        .collect();

    log::info!(
        "Size grouping complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (buckets, stats)
}

/// Size buckets as an ordered list, for display.
#[must_use]
pub fn sorted_buckets(buckets: &SizeBuckets, order: SortOrder) -> Vec<(u64, &[PathBuf])> {
    let mut sorted: Vec<(u64, &[PathBuf])> = buckets
        .iter()
        .map(|(size, paths)| (*size, paths.as_slice()))
        .collect();
    sorted.sort_by(|a, b| order.compare(a.0, b.0));
    sorted
}

/// Files sharing both size and content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashGroup {
    /// BLAKE3 hash of the file content
    pub hash: Hash,
    /// File size in bytes (shared by every file in the group)
    pub size: u64,
    /// Paths in first-encountered order
    pub files: Vec<PathBuf>,
}

impl HashGroup {
    /// Create a new hash group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<PathBuf>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// Number of redundant copies (total minus one original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// All hash groups sharing one file size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    /// File size in bytes
    pub size: u64,
    /// Hash groups in the order hashing produced them
    pub groups: Vec<HashGroup>,
}

impl SizeEntry {
    /// Number of files across all groups of this size.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(HashGroup::len).sum()
    }
}

/// A catalog file together with its selection number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedFile<'a> {
    /// 1-based selection number
    pub index: usize,
    /// Path of the file
    pub path: &'a Path,
    /// Size of the bucket the file belongs to
    pub size: u64,
    /// The hash group containing the file
    pub group: &'a HashGroup,
}

/// Confirmed duplicates, ordered by size.
///
/// The constructor enforces the catalog invariants: groups with fewer than
/// two files and sizes with no remaining groups are dropped, and entries are
/// sorted by size in the requested order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCatalog {
    entries: Vec<SizeEntry>,
    order: SortOrder,
}

impl DuplicateCatalog {
    /// Build a catalog from size entries.
    #[must_use]
    pub fn new(entries: Vec<SizeEntry>, order: SortOrder) -> Self {
        let mut entries: Vec<SizeEntry> = entries
            .into_iter()
            .filter_map(|mut entry| {
                entry.groups.retain(|g| g.len() >= 2);
                (!entry.groups.is_empty()).then_some(entry)
            })
            .collect();
        entries.sort_by(|a, b| order.compare(a.size, b.size));

        Self { entries, order }
    }

    /// Size entries in presentation order.
    #[must_use]
    pub fn entries(&self) -> &[SizeEntry] {
        &self.entries
    }

    /// Order the entries are sorted in.
    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hash groups across all sizes.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.entries.iter().map(|e| e.groups.len()).sum()
    }

    /// Total number of files, i.e. the largest valid selection number.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().map(SizeEntry::file_count).sum()
    }

    /// Bytes reclaimable by keeping one copy of every group.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups().map(HashGroup::wasted_space).sum()
    }

    /// All hash groups in presentation order.
    pub fn groups(&self) -> impl Iterator<Item = &HashGroup> {
        self.entries.iter().flat_map(|e| e.groups.iter())
    }

    /// Every file with its selection number: sizes in catalog order, groups
    /// in entry order, files in group order, numbered from 1.
    pub fn indexed(&self) -> impl Iterator<Item = IndexedFile<'_>> {
        self.groups()
            .flat_map(|group| group.files.iter().map(move |path| (group, path)))
            .enumerate()
            .map(|(i, (group, path))| IndexedFile {
                index: i + 1,
                path: path.as_path(),
                size: group.size,
                group,
            })
    }

    /// Look up the file for a selection number.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<IndexedFile<'_>> {
        if index == 0 {
            return None;
        }
        self.indexed().nth(index - 1)
    }
}
