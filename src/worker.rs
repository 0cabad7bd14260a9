//! Runs organize and undo passes on a background thread.
//!
//! The engine itself is synchronous. A [`Job`] moves a run onto its own
//! thread and forwards every progress value and event through a channel, in
//! the order the engine produced them, so an interactive caller can keep
//! drawing while files move.

use crate::file_organizer::{FileOrganizer, MoveLog, OrganizeFailure};
use crate::reporter::{Event, Reporter};
use crate::undo::{UndoManager, UndoReport};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// A message from a running job.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Progress(f64),
    Event(Event),
}

/// Reporter that forwards everything into a channel.
pub struct ChannelReporter {
    sender: Sender<Update>,
}

impl ChannelReporter {
    pub fn new(sender: Sender<Update>) -> Self {
        Self { sender }
    }
}

impl Reporter for ChannelReporter {
    fn progress(&mut self, fraction: f64) {
        // A dropped receiver only means nobody is watching; the run goes on.
        let _ = self.sender.send(Update::Progress(fraction));
    }

    fn event(&mut self, event: Event) {
        let _ = self.sender.send(Update::Event(event));
    }
}

/// A run executing on a background thread.
pub struct Job<T> {
    updates: Receiver<Update>,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Job<T> {
    fn spawn<F>(run: F) -> Self
    where
        F: FnOnce(ChannelReporter) -> T + Send + 'static,
    {
        let (sender, updates) = mpsc::channel();
        let handle = thread::spawn(move || run(ChannelReporter::new(sender)));
        Self { updates, handle }
    }

    /// Blocks for each update until the run finishes.
    pub fn updates(&self) -> mpsc::Iter<'_, Update> {
        self.updates.iter()
    }

    /// Waits for the run and returns its result.
    ///
    /// A panic on the worker thread is propagated to the caller.
    pub fn join(self) -> T {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Starts [`FileOrganizer::organize`] on a background thread.
pub fn spawn_organize(
    organizer: FileOrganizer,
    source_dir: PathBuf,
    dest_dir: Option<PathBuf>,
) -> Job<Result<MoveLog, OrganizeFailure>> {
    Job::spawn(move |reporter| organizer.organize(&source_dir, dest_dir.as_deref(), reporter))
}

/// Starts [`UndoManager::undo`] on a background thread.
pub fn spawn_undo(log: MoveLog) -> Job<UndoReport> {
    Job::spawn(move |reporter| UndoManager::undo(log, reporter))
}
