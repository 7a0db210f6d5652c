//! Interactive session driving the duplicate pipeline.
//!
//! The [`Shell`] owns every prompt and every line of user-facing output.
//! It reads answers from any [`BufRead`] and writes to any [`Write`], so
//! the whole session can be replayed from an in-memory script.
//!
//! A session moves through [`SessionState`] in order:
//! `Init -> Scanned -> Grouped -> Deleted`. Answering "no" at a gate, or
//! closing the input, ends it in the state it has reached.

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};

use crate::actions::{
    delete_selected, parse_selection, validate_preserves_copy, DeleteConfig, DeleteError,
    DeleteProgressCallback, Selection,
};
use crate::duplicates::{
    DuplicateCatalog, DuplicateFinder, FinderConfig, FinderError, SortOrder,
};
use crate::output;
use crate::progress::{ProgressCallback, PHASE_DELETING};

/// How far a session got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing scanned yet.
    Init,
    /// Size buckets were printed.
    Scanned,
    /// The duplicate catalog was printed.
    Grouped,
    /// Selected files were deleted.
    Deleted,
}

/// Answers that skip the matching prompts when set.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// File-name suffix; `Some("")` means all files.
    pub suffix: Option<String>,
    /// Size sort order.
    pub order: Option<SortOrder>,
    /// Reject selections that remove every copy of a group.
    pub keep_one: bool,
    /// How selected files are removed.
    pub delete_config: DeleteConfig,
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Last state reached.
    pub state: SessionState,
    /// Bytes freed by confirmed deletions.
    pub freed: u64,
    /// Selected files that could not be deleted.
    pub failed_deletions: usize,
}

impl SessionOutcome {
    fn at(state: SessionState) -> Self {
        Self {
            state,
            freed: 0,
            failed_deletions: 0,
        }
    }
}

/// Forwards deletion events to a progress bar.
struct DeleteReporter<'a> {
    callback: Option<&'a dyn ProgressCallback>,
    done: Cell<usize>,
}

impl DeleteReporter<'_> {
    fn tick(&self, path: &Path) {
        self.done.set(self.done.get() + 1);
        if let Some(cb) = self.callback {
            cb.on_progress(self.done.get(), path.to_string_lossy().as_ref());
        }
    }
}

impl DeleteProgressCallback for DeleteReporter<'_> {
    fn on_delete_success(&self, path: &Path, _size: u64) {
        self.tick(path);
    }

    fn on_delete_failure(&self, error: &DeleteError) {
        self.tick(error.path());
    }
}

/// Prompt-driven front end over [`DuplicateFinder`] and the deletion engine.
pub struct Shell<R, W> {
    input: R,
    output: W,
    config: FinderConfig,
    options: ShellOptions,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell reading answers from `input` and printing to `output`.
    pub fn new(input: R, output: W, config: FinderConfig, options: ShellOptions) -> Self {
        Self {
            input,
            output,
            config,
            options,
        }
    }

    /// Consume the shell and return its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one session over `root`.
    ///
    /// # Errors
    ///
    /// - a [`crate::scanner::ScanError`] if `root` is missing or not a directory;
    ///   no prompt is shown in that case
    /// - [`FinderError::Interrupted`] after Ctrl+C
    /// - I/O errors on the output
    pub fn run(&mut self, root: &Path) -> Result<SessionOutcome> {
        DuplicateFinder::validate_root(root)?;

        let Some(suffix) = self.file_format()? else {
            return Ok(SessionOutcome::at(SessionState::Init));
        };
        let Some(order) = self.sort_order()? else {
            return Ok(SessionOutcome::at(SessionState::Init));
        };

        let walker_config = self.config.walker_config.clone().with_suffix(Some(suffix));
        let finder = DuplicateFinder::new(self.config.clone().with_walker_config(walker_config));

        let (buckets, scan_summary) = finder.scan(root)?;
        log::info!("{}", output::scan_summary_line(&scan_summary));
        output::write_size_buckets(&mut self.output, &buckets, order)?;
        if scan_summary.skipped() > 0 {
            writeln!(
                self.output,
                "\nSkipped {} unreadable entries",
                scan_summary.skipped()
            )?;
        }

        if !self.ask_yes_no("Check for duplicates?")? {
            return Ok(SessionOutcome::at(SessionState::Scanned));
        }

        let (catalog, hash_summary) = finder.group(buckets, order)?;
        log::info!("{}", output::hash_summary_line(&hash_summary));
        let count = output::write_catalog(&mut self.output, &catalog)?;
        if hash_summary.failed_files > 0 {
            writeln!(
                self.output,
                "\n{} file(s) could not be read and were left out",
                hash_summary.failed_files
            )?;
        }

        if catalog.is_empty() {
            writeln!(self.output, "\nNo duplicates found")?;
            self.output.flush()?;
            return Ok(SessionOutcome::at(SessionState::Grouped));
        }

        if !self.ask_yes_no("Delete files?")? {
            return Ok(SessionOutcome::at(SessionState::Grouped));
        }

        let Some(selection) = self.read_selection(&catalog, count)? else {
            return Ok(SessionOutcome::at(SessionState::Grouped));
        };

        let callback = self.config.progress_callback.as_deref();
        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_DELETING, selection.len());
        }
        let reporter = DeleteReporter {
            callback,
            done: Cell::new(0),
        };
        let result = delete_selected(
            &catalog,
            &selection,
            &self.options.delete_config,
            Some(&reporter),
        )?;
        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_DELETING);
        }

        output::write_delete_result(&mut self.output, &result)?;
        self.output.flush()?;

        Ok(SessionOutcome {
            state: SessionState::Deleted,
            freed: result.bytes_freed,
            failed_deletions: result.failure_count(),
        })
    }

    fn file_format(&mut self) -> Result<Option<String>> {
        if let Some(ref suffix) = self.options.suffix {
            return Ok(Some(suffix.clone()));
        }
        self.read_answer("Enter file format:")
    }

    fn sort_order(&mut self) -> Result<Option<SortOrder>> {
        if let Some(order) = self.options.order {
            return Ok(Some(order));
        }

        writeln!(self.output, "Size sorting options:\n1. Descending\n2. Ascending")?;
        loop {
            let Some(answer) = self.read_answer("Enter a sorting option:")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return Ok(Some(SortOrder::Descending)),
                "2" => return Ok(Some(SortOrder::Ascending)),
                _ => writeln!(self.output, "Wrong option")?,
            }
        }
    }

    /// Ask until the answer is exactly `yes` or `no`. End of input counts as `no`.
    fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        loop {
            let Some(answer) = self.read_answer(&format!("\n{question}"))? else {
                return Ok(false);
            };
            match answer.as_str() {
                "yes" => return Ok(true),
                "no" => return Ok(false),
                _ => writeln!(self.output, "Wrong option")?,
            }
        }
    }

    fn read_selection(
        &mut self,
        catalog: &DuplicateCatalog,
        count: usize,
    ) -> Result<Option<Selection>> {
        loop {
            let Some(answer) = self.read_answer("\nEnter file numbers to delete:")? else {
                return Ok(None);
            };

            let parsed = parse_selection(&answer, count).and_then(|selection| {
                if self.options.keep_one {
                    validate_preserves_copy(catalog, &selection)?;
                }
                Ok(selection)
            });

            match parsed {
                Ok(selection) => return Ok(Some(selection)),
                Err(e) => {
                    log::debug!("Rejected selection {:?}: {}", answer, e);
                    writeln!(self.output, "Wrong format")?;
                }
            }
        }
    }

    /// Print `prompt` on its own line and read one answer.
    ///
    /// Returns `None` at end of input. The line ending is stripped, nothing else.
    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;

        if self.is_interrupted() {
            return Err(FinderError::Interrupted.into());
        }
        if read == 0 {
            log::debug!("Input closed at prompt {:?}", prompt.trim());
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    fn is_interrupted(&self) -> bool {
        self.config
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

impl<R, W> std::fmt::Debug for Shell<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
