//! Plain-text rendering of scan results.
//!
//! Every function writes to a caller-supplied [`Write`], so the same code
//! prints to stdout in the shell and to a buffer in tests.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::actions::BatchDeleteResult;
use crate::duplicates::{
    sorted_buckets, DuplicateCatalog, HashGroup, HashSummary, ScanSummary, SizeBuckets, SortOrder,
};

/// Print every size bucket: a `"{size} bytes"` header, then one path per line.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_size_buckets<W: Write>(
    out: &mut W,
    buckets: &SizeBuckets,
    order: SortOrder,
) -> io::Result<()> {
    for (size, paths) in sorted_buckets(buckets, order) {
        writeln!(out, "\n{size} bytes")?;
        for path in paths {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}

/// Print the numbered duplicate listing and return the number of files.
///
/// Numbers come from [`DuplicateCatalog::indexed`], the same traversal
/// deletion uses.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_catalog<W: Write>(out: &mut W, catalog: &DuplicateCatalog) -> io::Result<usize> {
    let mut count = 0;
    let mut current_size = None;
    let mut current_group: Option<&HashGroup> = None;

    for file in catalog.indexed() {
        if current_size != Some(file.size) {
            writeln!(out, "\n{} bytes", file.size)?;
            current_size = Some(file.size);
        }
        if !current_group.is_some_and(|g| std::ptr::eq(g, file.group)) {
            writeln!(out, "Hash: {}", file.group.hash_hex())?;
            current_group = Some(file.group);
        }
        writeln!(out, "{}. {}", file.index, file.path.display())?;
        count = file.index;
    }

    Ok(count)
}

/// One-line description of the scan phase.
#[must_use]
pub fn scan_summary_line(summary: &ScanSummary) -> String {
    let mut line = format!(
        "Found {} file(s) ({}), {} in {} same-size bucket(s)",
        summary.total_files,
        ByteSize::b(summary.total_size),
        summary.potential_duplicates,
        summary.buckets
    );
    if summary.skipped() > 0 {
        line.push_str(&format!("; skipped {} unreadable entries", summary.skipped()));
    }
    line
}

/// One-line description of the grouping phase.
#[must_use]
pub fn hash_summary_line(summary: &HashSummary) -> String {
    let mut line = format!(
        "{} duplicate group(s), {} file(s), {} reclaimable",
        summary.duplicate_groups,
        summary.duplicate_files,
        ByteSize::b(summary.reclaimable_space)
    );
    if summary.failed_files > 0 {
        line.push_str(&format!(
            "; {} file(s) could not be read and were left out",
            summary.failed_files
        ));
    }
    line
}

/// Print per-file failures followed by the freed-space total.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_delete_result<W: Write>(out: &mut W, result: &BatchDeleteResult) -> io::Result<()> {
    for failure in &result.failures {
        writeln!(out, "Could not delete #{}: {}", failure.index, failure.error)?;
    }
    writeln!(out, "\nTotal freed up space: {} bytes", result.bytes_freed)
}
