//! dirsort - sort the files of a directory into category folders
//!
//! This library classifies files by extension, moves them into category
//! subfolders without overwriting anything, records every move, and can
//! replay that record backwards to put each file back where it was.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod reporter;
pub mod undo;
pub mod worker;

pub use config::{CompiledFilters, Config, ConfigError, FailurePolicy};
pub use file_category::{Category, CategoryTable, Classification, OTHERS};
pub use file_organizer::{
    FileOrganizer, MoveLog, MoveRecord, OrganizeError, OrganizeFailure, OrganizeResult,
    unique_destination,
};
pub use reporter::{Callbacks, Event, Reporter, Silent};
pub use undo::{RestoreOutcome, UndoManager, UndoReport};

pub use cli::{Cli, run_cli};
