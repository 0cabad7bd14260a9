//! Progress and event reporting for organize and undo runs.
//!
//! The engine never formats messages. It publishes a progress fraction and
//! one [`Event`] per file to a [`Reporter`]; turning events into text (and
//! picking a language) is up to whoever implements the reporter.

use std::path::Path;

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The source directory held no regular files.
    NoFiles,
    /// A file was moved into a category listed in the table.
    Moved { file_name: String, category: String },
    /// A file matched no category and was moved into `Others`.
    MovedToOthers { file_name: String },
    /// A file could not be moved and the run was told to keep going.
    MoveFailed { file_name: String, error: String },
    /// Undo was requested with an empty move log.
    NothingToUndo,
    /// Undo is about to restore `total` entries.
    UndoStarted { total: usize },
    /// A file was moved back into `folder` (possibly under a new name).
    Restored { file_name: String, folder: String },
    /// The file recorded in the move log is gone; the entry was skipped.
    SkippedMissing { file_name: String },
    /// Moving a file back failed; undo carried on with the next entry.
    RestoreFailed { file_name: String, error: String },
}

impl Event {
    /// Returns true for events that describe a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::MoveFailed { .. } | Event::RestoreFailed { .. }
        )
    }
}

/// Receives progress and events from a running organize or undo pass.
///
/// Both methods are called synchronously on the thread doing the work,
/// `progress` with non-decreasing values that end at exactly `1.0`.
pub trait Reporter {
    /// Reports the completed fraction of the run, in `(0, 1]`.
    fn progress(&mut self, fraction: f64);

    /// Reports a single event.
    fn event(&mut self, event: Event);
}

/// Adapts a pair of closures to the [`Reporter`] interface.
///
/// # Examples
///
/// ```
/// use dirsort::reporter::{Callbacks, Event, Reporter};
///
/// let mut seen = Vec::new();
/// let mut events = Vec::new();
/// {
///     let mut reporter = Callbacks::new(|p| seen.push(p), |e| events.push(e));
///     reporter.progress(1.0);
///     reporter.event(Event::NoFiles);
/// }
/// assert_eq!(seen, vec![1.0]);
/// assert_eq!(events, vec![Event::NoFiles]);
/// ```
pub struct Callbacks<P, L> {
    on_progress: P,
    on_log: L,
}

impl<P, L> Callbacks<P, L>
where
    P: FnMut(f64),
    L: FnMut(Event),
{
    pub fn new(on_progress: P, on_log: L) -> Self {
        Self {
            on_progress,
            on_log,
        }
    }
}

impl<P, L> Reporter for Callbacks<P, L>
where
    P: FnMut(f64),
    L: FnMut(Event),
{
    fn progress(&mut self, fraction: f64) {
        (self.on_progress)(fraction);
    }

    fn event(&mut self, event: Event) {
        (self.on_log)(event);
    }
}

/// A reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {
    fn progress(&mut self, _fraction: f64) {}

    fn event(&mut self, _event: Event) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn progress(&mut self, fraction: f64) {
        (**self).progress(fraction);
    }

    fn event(&mut self, event: Event) {
        (**self).event(event);
    }
}

/// Returns the final component of `path` as a displayable string.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
