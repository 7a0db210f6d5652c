//! Command-line interface definitions for dupsweep.
//!
//! Everything the interactive session asks can be pre-answered here, which
//! makes scripted runs possible:
//!
//! ```bash
//! # Fully interactive
//! dupsweep ~/Pictures
//!
//! # Only .jpg files, largest first, trash instead of delete
//! dupsweep ~/Pictures --ext .jpg --sort desc --trash
//!
//! # Debug logging
//! dupsweep -v ~/Pictures
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::SortOrder;

/// Find duplicate files by size and content hash and delete the copies you pick.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Only consider files whose name ends with SUFFIX (skips the format prompt)
    ///
    /// Plain suffix match, not a glob: `.jpg` matches `a.jpg` but not `a.JPG`.
    #[arg(short, long = "ext", value_name = "SUFFIX")]
    pub ext: Option<String>,

    /// Size sort order (skips the sorting prompt)
    #[arg(short, long, value_enum, value_name = "ORDER")]
    pub sort: Option<SortArg>,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Number of threads hashing same-size files
    ///
    /// 1 hashes sequentially. Higher values help on SSDs.
    #[arg(long, value_name = "N", default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: u16,

    /// Move selected files to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Refuse selections that would delete every copy of a file
    #[arg(long)]
    pub keep_one: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress bars and all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Sort order as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Largest files first
    Desc,
    /// Smallest files first
    Asc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Desc => SortOrder::Descending,
            SortArg::Asc => SortOrder::Ascending,
        }
    }
}
