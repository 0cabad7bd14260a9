//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Organization and dry-run orchestration
//! - Offering to undo a run before the process exits

use crate::config::Config;
use crate::file_organizer::{FileOrganizer, MoveLog};
use crate::output::{Language, Messages, OutputFormatter};
use crate::reporter::{Event, display_name};
use crate::worker::{self, Job, Update};
use clap::Parser;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Sort the files of a directory into category folders by extension.
#[derive(Parser, Debug, Clone)]
#[command(name = "dirsort", version, about)]
pub struct Cli {
    /// Directory whose files are sorted (subdirectories are left alone)
    pub source: PathBuf,

    /// Create the category folders here instead of inside SOURCE
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Show what would be moved without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (defaults to ./.dirsortrc.toml, then ~/.config/dirsort/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language of the log messages
    #[arg(long, value_enum, default_value_t = Language::En)]
    pub lang: Language,

    /// Only print failures and the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Keep the result without asking whether to undo it
    #[arg(short, long)]
    pub yes: bool,
}

/// Runs the CLI, reading the undo answer from stdin.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use dirsort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["dirsort", "/path/to/downloads", "--yes"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    run_cli_with_input(cli, io::stdin().lock())
}

/// Runs the CLI, reading the undo answer from `input`.
pub fn run_cli_with_input<R: BufRead>(cli: &Cli, input: R) -> Result<(), String> {
    let messages = Messages::new(cli.lang);

    let config = Config::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let organizer = FileOrganizer::from_config(&config)
        .map_err(|e| format!("Error in configuration: {}", e))?;

    if cli.dry_run {
        organize_directory_dry_run(cli, &organizer, &messages)
    } else {
        organize_directory(cli, organizer, &messages, input)
    }
}

/// Organizes the source directory, then offers to undo the run.
///
/// The move log only lives in this process, so this is the one chance to
/// reverse the run. A run that stopped on an error still offers to undo
/// whatever it moved before failing.
fn organize_directory<R: BufRead>(
    cli: &Cli,
    organizer: FileOrganizer,
    messages: &Messages,
    input: R,
) -> Result<(), String> {
    OutputFormatter::info(&messages.organizing(&cli.source));

    let job = worker::spawn_organize(organizer, cli.source.clone(), cli.dest.clone());
    follow(&job, messages, cli.quiet);

    let (log, outcome) = match job.join() {
        Ok(log) => {
            if !log.is_empty() {
                OutputFormatter::success(messages.done());
                OutputFormatter::summary_table(&log.category_counts(), log.len(), messages);
            }
            (log, Ok(()))
        }
        Err(failure) => {
            if !failure.completed.is_empty() {
                OutputFormatter::warning(&messages.aborted(failure.completed.len()));
            }
            (failure.completed, Err(failure.error.to_string()))
        }
    };

    if !log.is_empty() && !cli.yes && ask_undo(messages, input) {
        undo_moves(log, messages, cli.quiet);
    }

    outcome
}

/// Prints what an organize run would do.
fn organize_directory_dry_run(
    cli: &Cli,
    organizer: &FileOrganizer,
    messages: &Messages,
) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&messages.dry_run(&cli.source));

    let plan = organizer
        .plan(&cli.source, cli.dest.as_deref())
        .map_err(|e| e.to_string())?;

    if plan.is_empty() {
        OutputFormatter::info(&messages.describe(&Event::NoFiles));
        return Ok(());
    }

    let mut category_counts: HashMap<String, usize> = HashMap::new();
    for planned in &plan {
        OutputFormatter::plain(&format!(
            " - {}",
            messages.would_move(&display_name(&planned.source), &planned.category)
        ));
        *category_counts.entry(planned.category.clone()).or_insert(0) += 1;
    }

    OutputFormatter::summary_table(&category_counts, plan.len(), messages);
    OutputFormatter::success(messages.dry_run_done());
    Ok(())
}

/// Moves every file of `log` back and prints the tally.
fn undo_moves(log: MoveLog, messages: &Messages, quiet: bool) {
    let job = worker::spawn_undo(log);
    follow(&job, messages, quiet);
    let report = job.join();

    let summary = messages.undo_done(
        report.restored.len(),
        report.skipped.len(),
        report.failed.len(),
    );
    if report.failed.is_empty() {
        OutputFormatter::success(&summary);
    } else {
        OutputFormatter::warning(&summary);
    }
}

/// Draws a job's updates until it finishes.
fn follow<T: Send + 'static>(job: &Job<T>, messages: &Messages, quiet: bool) {
    let pb = OutputFormatter::create_progress_bar();
    for update in job.updates() {
        match update {
            Update::Progress(fraction) => OutputFormatter::set_progress(&pb, fraction),
            Update::Event(event) => {
                if !quiet || event.is_failure() {
                    OutputFormatter::event_line(&pb, messages, &event);
                }
            }
        }
    }
    pb.finish_and_clear();
}

/// Asks whether to undo the run just made.
fn ask_undo<R: BufRead>(messages: &Messages, mut input: R) -> bool {
    print!("{}", messages.undo_prompt());
    let _ = io::stdout().flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => messages.is_yes(&answer),
        Err(e) => {
            OutputFormatter::warning(&format!("Could not read answer: {}", e));
            false
        }
    }
}
