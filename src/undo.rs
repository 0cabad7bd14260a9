/// Undo functionality for reverting file organization runs.
///
/// This module moves files back to where they were before an organize run,
/// replaying a [`MoveLog`] from its last record to its first.
use crate::file_organizer::{
    MoveLog, MoveRecord, OrganizeError, OrganizeResult, move_file, unique_destination,
};
use crate::reporter::{Event, Reporter, display_name};
use std::fs;
use std::path::PathBuf;

/// What happened to a single move record during undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The file was moved back; the path may differ from the recorded
    /// origin if that spot had been taken in the meantime.
    Restored(PathBuf),
    /// The file was no longer at its recorded destination.
    Missing,
}

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Paths files were restored to.
    pub restored: Vec<PathBuf>,
    /// Files that were gone from their recorded destination.
    pub skipped: Vec<PathBuf>,
    /// Files that could not be moved back, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Returns the total number of records processed.
    pub fn total_processed(&self) -> usize {
        self.restored.len() + self.skipped.len() + self.failed.len()
    }

    /// Returns true if every record was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Reverses organize runs.
pub struct UndoManager;

impl UndoManager {
    /// Undoes an organize run, consuming its move log.
    ///
    /// Records are processed last-first. Per record the reporter receives
    /// one event and then progress `i / total`. Missing files and failed
    /// restores are reported and skipped; they never stop the sweep. An
    /// empty log reports [`Event::NothingToUndo`] and does nothing else.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_organizer::FileOrganizer;
    /// use dirsort::reporter::Silent;
    /// use dirsort::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// let log = FileOrganizer::default()
    ///     .organize(Path::new("/path/to/downloads"), None, Silent)
    ///     .expect("organize failed");
    /// let report = UndoManager::undo(log, Silent);
    /// println!("Restored {} files", report.restored.len());
    /// ```
    pub fn undo<R: Reporter>(log: MoveLog, mut reporter: R) -> UndoReport {
        let mut report = UndoReport::default();

        if log.is_empty() {
            reporter.event(Event::NothingToUndo);
            return report;
        }

        let total = log.len();
        reporter.event(Event::UndoStarted { total });

        for (index, record) in log.into_iter().rev().enumerate() {
            match Self::restore_one(&record) {
                Ok(RestoreOutcome::Restored(path)) => {
                    reporter.event(Event::Restored {
                        file_name: display_name(&path),
                        folder: record
                            .origin
                            .parent()
                            .map(display_name)
                            .unwrap_or_default(),
                    });
                    report.restored.push(path);
                }
                Ok(RestoreOutcome::Missing) => {
                    reporter.event(Event::SkippedMissing {
                        file_name: display_name(&record.destination),
                    });
                    report.skipped.push(record.destination);
                }
                Err(e) => {
                    let error = e.to_string();
                    reporter.event(Event::RestoreFailed {
                        file_name: display_name(&record.destination),
                        error: error.clone(),
                    });
                    report.failed.push((record.destination, error));
                }
            }

            reporter.progress((index + 1) as f64 / total as f64);
        }

        report
    }

    /// Moves one recorded file back to its origin.
    ///
    /// The origin's parent directory is recreated if it was removed, and if
    /// something now occupies the origin path the file is restored under a
    /// `"name (k).ext"` variant instead of overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be moved.
    pub fn restore_one(record: &MoveRecord) -> OrganizeResult<RestoreOutcome> {
        if fs::symlink_metadata(&record.destination).is_err() {
            return Ok(RestoreOutcome::Missing);
        }

        if let Some(parent) = record.origin.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let target = unique_destination(&record.origin);
        move_file(&record.destination, &target).map_err(|e| OrganizeError::FileMoveFailed {
            from: record.destination.clone(),
            to: target.clone(),
            source: e,
        })?;

        Ok(RestoreOutcome::Restored(target))
    }
}
