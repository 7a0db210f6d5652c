//! dupsweep - interactive duplicate file finder
//!
//! Walks a directory tree, buckets files by size, confirms duplicates by
//! BLAKE3 content hash and deletes the copies the user picks by number.
//!
//! The pipeline is usable as a library:
//!
//! ```no_run
//! use dupsweep::actions::{delete_selected, parse_selection, DeleteConfig, NoDeleteCallback};
//! use dupsweep::duplicates::{DuplicateFinder, SortOrder};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (buckets, _) = finder.scan(Path::new("/data")).unwrap();
//! let (catalog, _) = finder.group(buckets, SortOrder::Descending).unwrap();
//!
//! let selection = parse_selection("2", catalog.file_count()).unwrap();
//! let result = delete_selected::<NoDeleteCallback>(&catalog, &selection, &DeleteConfig::default(), None).unwrap();
//! println!("Total freed up space: {} bytes", result.bytes_freed);
//! ```

pub mod actions;
pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod shell;
pub mod signal;

use std::io;
use std::sync::Arc;

use anyhow::Result;

use crate::actions::DeleteConfig;
use crate::cli::Cli;
use crate::duplicates::FinderConfig;
use crate::error::{ExitCode, UsageError};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;
use crate::shell::{SessionOutcome, Shell, ShellOptions};

/// Run one interactive session on stdin/stdout as configured by `cli`.
///
/// # Errors
///
/// - [`UsageError::DirectoryNotSpecified`] without a path argument
/// - a [`scanner::ScanError`] if the path is missing or not a directory
/// - [`duplicates::FinderError::Interrupted`] after Ctrl+C
///
/// [`ExitCode::for_error`] maps each to its exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let Some(root) = cli.path.clone() else {
        return Err(UsageError::DirectoryNotSpecified.into());
    };

    let handler = signal::install_handler()?;

    let config = finder_config(&cli)
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(Arc::new(Progress::new(cli.quiet)));
    let options = shell_options(&cli);
    log::debug!("Finder config: {:?}", config);

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout().lock(), config, options);
    let outcome = shell.run(&root)?;

    Ok(exit_code(&outcome))
}

/// Finder settings from the CLI, without shutdown flag or progress.
#[must_use]
pub fn finder_config(cli: &Cli) -> FinderConfig {
    let walker = WalkerConfig::default()
        .with_follow_symlinks(cli.follow_symlinks)
        .with_skip_hidden(cli.skip_hidden);
    FinderConfig::default()
        .with_walker_config(walker)
        .with_io_threads(usize::from(cli.io_threads))
}

/// Prompt presets and deletion mode from the CLI.
#[must_use]
pub fn shell_options(cli: &Cli) -> ShellOptions {
    ShellOptions {
        suffix: cli.ext.clone(),
        order: cli.sort.map(Into::into),
        keep_one: cli.keep_one,
        delete_config: if cli.trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        },
    }
}

/// Exit code for a session that ran to an end.
#[must_use]
pub fn exit_code(outcome: &SessionOutcome) -> ExitCode {
    if outcome.failed_deletions > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}
