//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Scan**: Validate the root, walk it, and bucket matching files by
//!    size (see [`crate::duplicates::groups`]). [`DuplicateFinder::scan`]
//! 2. **Group**: Hash every file of every bucket and split buckets by
//!    digest into a [`DuplicateCatalog`]. [`DuplicateFinder::group`]
//!
//! The two phases are separate calls so the caller can show the size
//! buckets and ask before spending time on hashing.
//!
//! # Failure policy
//!
//! - An entry below the root that cannot be read is skipped; the scan
//!   continues and the error is kept in [`ScanSummary::errors`].
//! - A file that cannot be hashed is left out of its bucket; grouping
//!   continues and the error is kept in [`HashSummary::errors`].
//! - A set shutdown flag aborts either phase with
//!   [`FinderError::Interrupted`].
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig, SortOrder};
//! use dupsweep::scanner::WalkerConfig;
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_walker_config(WalkerConfig::default().with_suffix(Some(".jpg".into())));
//! let finder = DuplicateFinder::new(config);
//!
//! let (buckets, _summary) = finder.scan(Path::new("/photos")).unwrap();
//! let (catalog, stats) = finder.group(buckets, SortOrder::Descending).unwrap();
//! println!("{} duplicate groups, {} unreadable files", catalog.group_count(), stats.failed_files);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{
    group_by_size, DuplicateCatalog, HashGroup, SizeBuckets, SizeEntry, SortOrder,
};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{Hash, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration (suffix filter, symlinks, hidden files).
    pub walker_config: WalkerConfig,
    /// Number of threads hashing files of one bucket concurrently.
    /// 1 hashes sequentially on the calling thread.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            io_threads: 1,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the number of hashing threads (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that abort a finder phase.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The scan root is unusable.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl FinderError {
    /// Whether the error is a missing or non-directory root.
    #[must_use]
    pub fn is_invalid_root(&self) -> bool {
        matches!(self, Self::Scan(e) if e.is_invalid_root())
    }
}

/// Statistics from the scan phase.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of matching regular files found
    pub total_files: usize,
    /// Total size of matching files in bytes
    pub total_size: u64,
    /// Files left in buckets of 2+ after size grouping
    pub potential_duplicates: usize,
    /// Number of size buckets with 2+ files
    pub buckets: usize,
    /// Entries that could not be read and were skipped
    pub errors: Vec<ScanError>,
    /// Wall time of the scan
    pub duration: Duration,
}

impl ScanSummary {
    /// Number of skipped entries.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Default)]
pub struct HashSummary {
    /// Files that entered the grouping phase
    pub input_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be hashed and were excluded
    pub failed_files: usize,
    /// Hash failures, one per excluded file
    pub errors: Vec<HashError>,
    /// Same-size files whose content matched no other file
    pub unique_files: usize,
    /// Number of hash groups with 2+ files
    pub duplicate_groups: usize,
    /// Files in those groups
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per group
    pub reclaimable_space: u64,
    /// Wall time of the grouping phase
    pub duration: Duration,
}

/// Runs the scan and grouping phases.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Replace the hasher (e.g. to use a different chunk size).
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Check that `root` exists and is a directory.
    ///
    /// # Errors
    ///
    /// [`ScanError::NotFound`] or [`ScanError::NotADirectory`].
    pub fn validate_root(root: &Path) -> Result<(), ScanError> {
        match std::fs::metadata(root) {
            Ok(m) if m.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(root.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScanError::NotFound(root.to_path_buf()))
            }
            Err(e) => Err(ScanError::from_io(root, e)),
        }
    }

    /// Walk `root` and bucket matching files by size.
    ///
    /// The root is validated before any traversal starts. Only buckets with
    /// at least two files are returned.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Scan`] if the root does not exist or is not a directory
    /// - [`FinderError::Interrupted`] if the shutdown flag is set
    pub fn scan(&self, root: &Path) -> Result<(SizeBuckets, ScanSummary), FinderError> {
        let start = Instant::now();
        Self::validate_root(root)?;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!("Scanning {}", root.display());
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }

        let mut summary = ScanSummary::default();
        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => files.push(file),
                Err(e) => summary.errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted by shutdown signal");
            return Err(FinderError::Interrupted);
        }

        let (buckets, stats) = group_by_size(files);
        summary.total_files = stats.total_files;
        summary.total_size = stats.total_size;
        summary.potential_duplicates = stats.potential_duplicates;
        summary.buckets = stats.duplicate_buckets;
        summary.duration = start.elapsed();

        if !summary.errors.is_empty() {
            log::warn!("Skipped {} unreadable entries", summary.errors.len());
        }

        Ok((buckets, summary))
    }

    /// Hash every file in `buckets` and build the duplicate catalog.
    ///
    /// Within a size, hash groups appear in the order their first file was
    /// met, and files keep their bucket order, so repeated runs over the
    /// same tree produce the same catalog.
    ///
    /// # Errors
    ///
    /// [`FinderError::Interrupted`] if the shutdown flag is set.
    pub fn group(
        &self,
        buckets: SizeBuckets,
        order: SortOrder,
    ) -> Result<(DuplicateCatalog, HashSummary), FinderError> {
        let start = Instant::now();
        let mut summary = HashSummary {
            input_files: buckets.values().map(Vec::len).sum(),
            ..Default::default()
        };

        let mut sorted: Vec<(u64, Vec<PathBuf>)> = buckets.into_iter().collect();
        sorted.sort_by(|a, b| order.compare(a.0, b.0));

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_HASHING, summary.input_files);
        }
        log::info!("Hashing {} files", summary.input_files);

        let pool = self.build_pool();
        let done = AtomicUsize::new(0);
        let mut entries = Vec::with_capacity(sorted.len());

        for (size, paths) in sorted {
            let results = match pool {
                Some(ref pool) => pool.install(|| self.hash_parallel(paths, &done)),
                None => self.hash_sequential(paths, &done),
            };

            if self.config.is_shutdown_requested() {
                log::info!("Grouping interrupted by shutdown signal");
                if let Some(ref callback) = self.config.progress_callback {
                    callback.on_phase_end(PHASE_HASHING);
                }
                return Err(FinderError::Interrupted);
            }

            let groups = split_by_hash(size, results, &mut summary);
            if !groups.is_empty() {
                entries.push(SizeEntry { size, groups });
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_HASHING);
        }

        let catalog = DuplicateCatalog::new(entries, order);
        summary.duplicate_groups = catalog.group_count();
        summary.duplicate_files = catalog.file_count();
        summary.reclaimable_space = catalog.reclaimable_space();
        summary.duration = start.elapsed();

        log::info!(
            "Grouping complete: {} duplicate groups, {} files, {} unreadable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.failed_files
        );

        Ok((catalog, summary))
    }

    /// Run both phases.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::scan`] and [`DuplicateFinder::group`].
    pub fn find_duplicates(
        &self,
        root: &Path,
        order: SortOrder,
    ) -> Result<(DuplicateCatalog, ScanSummary, HashSummary), FinderError> {
        let (buckets, scan_summary) = self.scan(root)?;
        let (catalog, hash_summary) = self.group(buckets, order)?;
        Ok((catalog, scan_summary, hash_summary))
    }

    /// Build a bounded thread pool when more than one I/O thread is configured.
    fn build_pool(&self) -> Option<rayon::ThreadPool> {
        if self.config.io_threads <= 1 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Failed to create hashing thread pool, hashing sequentially: {}", e);
                None
            }
        }
    }

    fn report(&self, done: &AtomicUsize, path: &Path) {
        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(current, path.to_string_lossy().as_ref());
        }
    }

    fn hash_sequential(
        &self,
        paths: Vec<PathBuf>,
        done: &AtomicUsize,
    ) -> Vec<(PathBuf, Result<Hash, HashError>)> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            if self.config.is_shutdown_requested() {
                break;
            }
            let hash = self.hasher.full_hash(&path);
            self.report(done, &path);
            results.push((path, hash));
        }
        results
    }

    /// Hash a bucket on the pool. `collect` keeps input order, so the
    /// result is identical to the sequential path.
    fn hash_parallel(
        &self,
        paths: Vec<PathBuf>,
        done: &AtomicUsize,
    ) -> Vec<(PathBuf, Result<Hash, HashError>)> {
        paths
            .into_par_iter()
            .filter_map(|path| {
                if self.config.is_shutdown_requested() {
                    return None;
                }
                let hash = self.hasher.full_hash(&path);
                self.report(done, &path);
                Some((path, hash))
            })
            .collect()
    }
}

/// Split one size bucket into hash groups of 2+ files.
fn split_by_hash(
    size: u64,
    results: Vec<(PathBuf, Result<Hash, HashError>)>,
    summary: &mut HashSummary,
) -> Vec<HashGroup> {
    let mut groups: Vec<HashGroup> = Vec::new();
    let mut positions: HashMap<Hash, usize> = HashMap::new();

    for (path, result) in results {
        match result {
            Ok(hash) => {
                summary.hashed_files += 1;
                match positions.entry(hash) {
                    Entry::Occupied(slot) => groups[*slot.get()].files.push(path),
                    Entry::Vacant(slot) => {
                        slot.insert(groups.len());
                        groups.push(HashGroup::new(hash, size, vec![path]));
                    }
                }
            }
            Err(e) => {
                log::warn!("Excluding unreadable file: {}", e);
                summary.failed_files += 1;
                summary.errors.push(e);
            }
        }
    }

    groups.retain(|group| {
        if group.len() < 2 {
            summary.unique_files += 1;
            log::trace!(
                "Eliminated unique content {}: {}",
                group.hash_hex(),
                group.files[0].display()
            );
            false
        } else {
            log::debug!(
                "Hash group {} ({} bytes): {} files",
                group.hash_hex(),
                size,
                group.len()
            );
            true
        }
    });

    groups
}
