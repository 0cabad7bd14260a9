/// File organization: moving files into category directories.
///
/// This module enumerates the regular files directly inside a source
/// directory, moves each one into the subfolder of its category under a
/// destination root, and records every move in a [`MoveLog`] so the run can
/// be undone later with [`crate::undo::UndoManager`].
use crate::config::{CompiledFilters, Config, ConfigError, FailurePolicy};
use crate::file_category::CategoryTable;
use crate::reporter::{Event, Reporter, display_name};
use fs_extra::error::ErrorKind;
use fs_extra::file::CopyOptions;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file ended up.
    pub destination: PathBuf,
    /// Where the file was before the organize run touched it.
    pub origin: PathBuf,
    /// The category folder the file was filed under.
    pub category: String,
}

/// Ordered record of the moves made by one organize run.
///
/// Records are appended only after their file has been moved, in processing
/// order. The log is handed to the caller by value and consumed by
/// [`crate::undo::UndoManager::undo`], which replays it backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog {
    records: Vec<MoveRecord>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Returns the records in the order the moves happened.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Counts moved files per category.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for record in &self.records {
            *counts.entry(record.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<MoveRecord> for MoveLog {
    fn from_iter<I: IntoIterator<Item = MoveRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MoveLog {
    type Item = MoveRecord;
    type IntoIter = std::vec::IntoIter<MoveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory is missing, not a directory, or unreadable.
    InvalidSourceDir { path: PathBuf, source: io::Error },
    /// Failed to create a category (or restore) directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file.
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The path has no final file name component.
    MissingFileName { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSourceDir { path, source } => {
                write!(f, "Cannot read source directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::MissingFileName { path } => {
                write!(f, "Path has no file name: {}", path.display())
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSourceDir { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::FileMoveFailed { source, .. } => Some(source),
            Self::MissingFileName { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// An organize run that stopped early.
///
/// `completed` holds every move made before the failure, so the caller can
/// still undo them.
#[derive(Debug)]
pub struct OrganizeFailure {
    pub error: OrganizeError,
    pub completed: MoveLog,
}

impl std::fmt::Display for OrganizeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for OrganizeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A move that [`FileOrganizer::plan`] predicts without performing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// The file as it currently sits in the source directory.
    pub source: PathBuf,
    /// Category the file would be filed under.
    pub category: String,
    /// Folder the file would be moved into.
    pub folder: PathBuf,
    /// True when no table entry matched and the file would go to `Others`.
    pub is_fallback: bool,
}

/// Returns `path` if nothing exists there, otherwise the first free
/// `"stem (k).ext"` sibling for `k = 1, 2, ...`.
///
/// Nothing is reserved: two callers racing on the same directory can pick
/// the same name.
///
/// # Examples
///
/// ```
/// use dirsort::file_organizer::unique_destination;
/// use std::path::Path;
///
/// // Nothing lives at this path, so it comes back unchanged.
/// let path = Path::new("/non/existent/dir/photo.jpg");
/// assert_eq!(unique_destination(path), path);
/// ```
pub fn unique_destination(path: &Path) -> PathBuf {
    if !is_taken(path) {
        return path.to_path_buf();
    }

    let stem = path.file_stem().unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| {
            let mut suffix = OsString::from(".");
            suffix.push(ext);
            suffix
        })
        .unwrap_or_default();

    let mut k: u64 = 1;
    loop {
        let mut name = stem.to_os_string();
        name.push(format!(" ({})", k));
        name.push(&suffix);
        let candidate = path.with_file_name(name);
        if !is_taken(&candidate) {
            return candidate;
        }
        k += 1;
    }
}

/// True if any filesystem entry, dangling symlinks included, sits at `path`.
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves a file, falling back to copy-and-delete across filesystems.
pub(crate) fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => move_across_devices(from, to),
        Err(e) => Err(e),
    }
}

/// Copies `from` to `to` and removes `from`.
///
/// `to` must be free. On failure, whatever was written at `to` is removed
/// again as long as `from` still exists, so exactly one copy survives.
fn move_across_devices(from: &Path, to: &Path) -> io::Result<()> {
    let existed = fs::symlink_metadata(to).is_ok();
    let options = CopyOptions::new();
    match fs_extra::file::move_file(from, to, &options) {
        Ok(_) => Ok(()),
        Err(e) => {
            if !existed && from.exists() {
                let _ = fs::remove_file(to);
            }
            Err(into_io_error(e))
        }
    }
}

fn into_io_error(err: fs_extra::error::Error) -> io::Error {
    match err.kind {
        ErrorKind::Io(source) => source,
        _ => io::Error::other(err),
    }
}

/// Organizes files by moving them into category subdirectories.
///
/// The organizer owns its category table, the file filter and the failure
/// policy; build one with [`FileOrganizer::new`] or from a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    table: CategoryTable,
    filters: CompiledFilters,
    on_error: FailurePolicy,
}

impl FileOrganizer {
    /// Creates an organizer with the given table, accepting every file and
    /// aborting on the first failure.
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            filters: CompiledFilters::default(),
            on_error: FailurePolicy::Abort,
        }
    }

    /// Builds an organizer from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the category table or filters are invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            table: config.category_table()?,
            filters: config.compile_filters()?,
            on_error: config.organize.on_error,
        })
    }

    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_failure_policy(mut self, on_error: FailurePolicy) -> Self {
        self.on_error = on_error;
        self
    }

    /// Lists the regular files directly inside `source_dir`, sorted by name.
    fn collect_files(&self, source_dir: &Path) -> OrganizeResult<Vec<PathBuf>> {
        let invalid = |source: io::Error| OrganizeError::InvalidSourceDir {
            path: source_dir.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(source_dir).map_err(invalid)?;
        if !metadata.is_dir() {
            return Err(invalid(io::Error::new(
                io::ErrorKind::NotADirectory,
                "not a directory",
            )));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(source_dir).map_err(invalid)? {
            let path = entry.map_err(invalid)?.path();
            if path.is_file() && self.filters.should_include(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Describes what [`FileOrganizer::organize`] would do, without moving anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory cannot be read.
    pub fn plan(
        &self,
        source_dir: &Path,
        dest_dir: Option<&Path>,
    ) -> OrganizeResult<Vec<PlannedMove>> {
        let dest_root = dest_dir.unwrap_or(source_dir);
        Ok(self
            .collect_files(source_dir)?
            .into_iter()
            .map(|source| {
                let classification = self.table.classify(&source);
                PlannedMove {
                    category: classification.name().to_string(),
                    folder: dest_root.join(classification.name()),
                    is_fallback: classification.is_fallback(),
                    source,
                }
            })
            .collect())
    }

    /// Moves every regular file in `source_dir` into its category folder.
    ///
    /// Category folders are created under `dest_dir`, or under `source_dir`
    /// itself when no destination is given. Files are processed in name
    /// order; for each one the reporter receives exactly one event followed
    /// by the progress fraction `i / total`. An empty source reports a single
    /// [`Event::NoFiles`] and progress `1.0`.
    ///
    /// # Errors
    ///
    /// Fails if the source directory cannot be read. A file that cannot be
    /// moved also fails the run unless the organizer was configured with
    /// [`FailurePolicy::Continue`]. Either way the returned
    /// [`OrganizeFailure`] carries the moves completed so far.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_organizer::FileOrganizer;
    /// use dirsort::reporter::Silent;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::default();
    /// match organizer.organize(Path::new("/path/to/downloads"), None, Silent) {
    ///     Ok(log) => println!("Moved {} files", log.len()),
    ///     Err(failure) => {
    ///         eprintln!("Stopped after {} files: {}", failure.completed.len(), failure)
    ///     }
    /// }
    /// ```
    pub fn organize<R: Reporter>(
        &self,
        source_dir: &Path,
        dest_dir: Option<&Path>,
        mut reporter: R,
    ) -> Result<MoveLog, OrganizeFailure> {
        let mut log = MoveLog::new();

        let files = match self.collect_files(source_dir) {
            Ok(files) => files,
            Err(error) => {
                return Err(OrganizeFailure {
                    error,
                    completed: log,
                });
            }
        };

        if files.is_empty() {
            reporter.event(Event::NoFiles);
            reporter.progress(1.0);
            return Ok(log);
        }

        let dest_root = dest_dir.unwrap_or(source_dir);
        let total = files.len();

        for (index, file_path) in files.iter().enumerate() {
            let classification = self.table.classify(file_path);

            match Self::move_to_category(dest_root, file_path, classification.name()) {
                Ok(record) => {
                    let file_name = display_name(&record.destination);
                    log.push(record);
                    reporter.event(if classification.is_fallback() {
                        Event::MovedToOthers { file_name }
                    } else {
                        Event::Moved {
                            file_name,
                            category: classification.name().to_string(),
                        }
                    });
                }
                Err(error) => match self.on_error {
                    FailurePolicy::Abort => {
                        return Err(OrganizeFailure {
                            error,
                            completed: log,
                        });
                    }
                    FailurePolicy::Continue => reporter.event(Event::MoveFailed {
                        file_name: display_name(file_path),
                        error: error.to_string(),
                    }),
                },
            }

            reporter.progress((index + 1) as f64 / total as f64);
        }

        Ok(log)
    }

    /// Moves one file into `dest_root/category`, renaming it on collision,
    /// and returns the record of the move.
    ///
    /// The category directory is created (with any missing parents) if it
    /// doesn't exist yet.
    pub fn move_to_category(
        dest_root: &Path,
        file_path: &Path,
        category: &str,
    ) -> OrganizeResult<MoveRecord> {
        let category_path = dest_root.join(category);
        fs::create_dir_all(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::MissingFileName {
                path: file_path.to_path_buf(),
            })?;

        let destination = unique_destination(&category_path.join(file_name));
        move_file(file_path, &destination).map_err(|e| OrganizeError::FileMoveFailed {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(MoveRecord {
            destination,
            origin: file_path.to_path_buf(),
            category: category.to_string(),
        })
    }
}
