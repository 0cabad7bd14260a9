//! Output formatting and styling module.
//!
//! Everything the user reads goes through here: coloured status lines, the
//! progress bar, summary tables, and the message catalogue that turns the
//! engine's [`Event`]s into text in the selected [`Language`].

use crate::reporter::Event;
use clap::ValueEnum;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;

/// Languages the message catalogue knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[default]
    En,
    Es,
}

/// Message catalogue for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages {
    lang: Language,
}

impl Messages {
    pub fn new(lang: Language) -> Self {
        Self { lang }
    }

    /// Renders one engine event as a log line.
    ///
    /// # Example
    ///
    /// ```
    /// use dirsort::output::{Language, Messages};
    /// use dirsort::reporter::Event;
    ///
    /// let event = Event::Moved { file_name: "a.jpg".into(), category: "Images".into() };
    /// assert_eq!(Messages::new(Language::En).describe(&event), "✅ Moved a.jpg → Images");
    /// assert_eq!(Messages::new(Language::Es).describe(&event), "✅ Movido a.jpg → Images");
    /// ```
    pub fn describe(&self, event: &Event) -> String {
        match (self.lang, event) {
            (Language::En, Event::NoFiles) => "No files to organize.".to_string(),
            (Language::Es, Event::NoFiles) => "No hay archivos para organizar.".to_string(),

            (Language::En, Event::Moved { file_name, category }) => {
                format!("✅ Moved {} → {}", file_name, category)
            }
            (Language::Es, Event::Moved { file_name, category }) => {
                format!("✅ Movido {} → {}", file_name, category)
            }

            (Language::En, Event::MovedToOthers { file_name }) => {
                format!("📁 Moved {} → Others", file_name)
            }
            (Language::Es, Event::MovedToOthers { file_name }) => {
                format!("📁 Movido {} → Others", file_name)
            }

            (Language::En, Event::MoveFailed { file_name, error }) => {
                format!("Could not move {}: {}", file_name, error)
            }
            (Language::Es, Event::MoveFailed { file_name, error }) => {
                format!("No se pudo mover {}: {}", file_name, error)
            }

            (Language::En, Event::NothingToUndo) => "Nothing to undo.".to_string(),
            (Language::Es, Event::NothingToUndo) => "No hay nada que deshacer.".to_string(),

            (Language::En, Event::UndoStarted { total }) => {
                format!("Undoing {} moves...", total)
            }
            (Language::Es, Event::UndoStarted { total }) => {
                format!("Deshaciendo {} movimientos...", total)
            }

            (Language::En, Event::Restored { file_name, folder }) => {
                format!("↩ Restored {} → {}", file_name, folder)
            }
            (Language::Es, Event::Restored { file_name, folder }) => {
                format!("↩ Restaurado {} → {}", file_name, folder)
            }

            (Language::En, Event::SkippedMissing { file_name }) => {
                format!("Skipped {}: it is no longer where it was organized", file_name)
            }
            (Language::Es, Event::SkippedMissing { file_name }) => {
                format!("Omitido {}: ya no está donde se organizó", file_name)
            }

            (Language::En, Event::RestoreFailed { file_name, error }) => {
                format!("Error restoring {}: {}", file_name, error)
            }
            (Language::Es, Event::RestoreFailed { file_name, error }) => {
                format!("Error al restaurar {}: {}", file_name, error)
            }
        }
    }

    pub fn organizing(&self, source: &Path) -> String {
        match self.lang {
            Language::En => format!("Organizing contents of: {}", source.display()),
            Language::Es => format!("Organizando el contenido de: {}", source.display()),
        }
    }

    pub fn dry_run(&self, source: &Path) -> String {
        match self.lang {
            Language::En => format!("Analyzing contents of: {}", source.display()),
            Language::Es => format!("Analizando el contenido de: {}", source.display()),
        }
    }

    pub fn would_move(&self, file_name: &str, category: &str) -> String {
        match self.lang {
            Language::En => format!("{} → would move to {}/", file_name, category),
            Language::Es => format!("{} → se movería a {}/", file_name, category),
        }
    }

    pub fn dry_run_done(&self) -> &'static str {
        match self.lang {
            Language::En => "Dry run complete. No files were modified.",
            Language::Es => "Simulación completa. No se modificó ningún archivo.",
        }
    }

    pub fn done(&self) -> &'static str {
        match self.lang {
            Language::En => "Organization complete!",
            Language::Es => "¡Organización completa!",
        }
    }

    pub fn aborted(&self, moved: usize) -> String {
        match self.lang {
            Language::En => format!("Organization stopped after {} moved files.", moved),
            Language::Es => format!("La organización se detuvo tras mover {} archivos.", moved),
        }
    }

    pub fn undo_prompt(&self) -> &'static str {
        match self.lang {
            Language::En => "Undo these moves now? [y/N] ",
            Language::Es => "¿Deshacer estos movimientos ahora? [s/N] ",
        }
    }

    /// Returns true if `answer` to [`Messages::undo_prompt`] means yes.
    pub fn is_yes(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        match self.lang {
            Language::En => answer == "y" || answer == "yes",
            Language::Es => answer == "s" || answer == "si" || answer == "sí",
        }
    }

    pub fn undo_done(&self, restored: usize, skipped: usize, failed: usize) -> String {
        match self.lang {
            Language::En => format!(
                "Undo complete: {} restored, {} skipped, {} failed.",
                restored, skipped, failed
            ),
            Language::Es => format!(
                "Deshacer completado: {} restaurados, {} omitidos, {} fallidos.",
                restored, skipped, failed
            ),
        }
    }

    /// Header, column and total labels of the summary table.
    fn summary_labels(&self) -> SummaryLabels {
        match self.lang {
            Language::En => SummaryLabels {
                header: "SUMMARY",
                category: "Category",
                files: "Files",
                total: "Total",
            },
            Language::Es => SummaryLabels {
                header: "RESUMEN",
                category: "Categoría",
                files: "Archivos",
                total: "Total",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SummaryLabels {
    header: &'static str,
    category: &'static str,
    files: &'static str,
    total: &'static str,
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for runs
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar counting percent of a run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar();
    /// OutputFormatter::set_progress(&pb, 0.5);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}",
        )
        .map(|style| style.progress_chars("█▓░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    /// Moves the bar to `fraction` of the way through.
    pub fn set_progress(pb: &ProgressBar, fraction: f64) {
        pb.set_position((fraction.clamp(0.0, 1.0) * 100.0).round() as u64);
    }

    /// Prints one event line above the progress bar, coloured by kind.
    pub fn event_line(pb: &ProgressBar, messages: &Messages, event: &Event) {
        let line = messages.describe(event);
        let styled = match event {
            Event::MoveFailed { .. } | Event::RestoreFailed { .. } => line.red().to_string(),
            Event::SkippedMissing { .. } => line.yellow().to_string(),
            Event::NoFiles | Event::NothingToUndo | Event::UndoStarted { .. } => {
                line.cyan().to_string()
            }
            _ => line,
        };
        pb.println(styled);
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::{Messages, OutputFormatter};
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23, &Messages::default());
    /// ```
    pub fn summary_table(
        category_counts: &HashMap<String, usize>,
        total_files: usize,
        messages: &Messages,
    ) {
        let SummaryLabels {
            header,
            category: category_label,
            files: files_label,
            total: total_label,
        } = messages.summary_labels();
        Self::header(header);

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(category_label.chars().count());

        println!(
            "{:<width$} | {}",
            category_label.bold(),
            files_label.bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {}",
                category,
                count.to_string().green(),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            total_label.bold(),
            total_files.to_string().green().bold(),
            width = width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_matches_fallback_wording() {
        let messages = Messages::new(Language::En);
        assert_eq!(
            messages.describe(&Event::MovedToOthers {
                file_name: "c.xyz".to_string()
            }),
            "📁 Moved c.xyz → Others"
        );
        assert_eq!(messages.describe(&Event::NoFiles), "No files to organize.");
    }

    #[test]
    fn test_describe_includes_error_detail() {
        let event = Event::RestoreFailed {
            file_name: "a.jpg".to_string(),
            error: "permission denied".to_string(),
        };
        assert_eq!(
            Messages::new(Language::En).describe(&event),
            "Error restoring a.jpg: permission denied"
        );
        assert_eq!(
            Messages::new(Language::Es).describe(&event),
            "Error al restaurar a.jpg: permission denied"
        );
    }

    #[test]
    fn test_is_yes_per_language() {
        let en = Messages::new(Language::En);
        let es = Messages::new(Language::Es);
        assert!(en.is_yes("Y\n"));
        assert!(en.is_yes(" yes "));
        assert!(!en.is_yes(""));
        assert!(!en.is_yes("s"));
        assert!(es.is_yes("S"));
        assert!(es.is_yes("sí"));
        assert!(!es.is_yes("n"));
    }

    #[test]
    fn test_summary_labels_follow_language() {
        assert_eq!(Messages::new(Language::En).summary_labels().header, "SUMMARY");
        let es = Messages::new(Language::Es).summary_labels();
        assert_eq!(es.header, "RESUMEN");
        assert_eq!(es.category, "Categoría");
        assert_eq!(es.files, "Archivos");
    }

    #[test]
    fn test_set_progress_scales_fraction() {
        let pb = ProgressBar::hidden();
        pb.set_length(100);
        OutputFormatter::set_progress(&pb, 1.0 / 3.0);
        assert_eq!(pb.position(), 33);
        OutputFormatter::set_progress(&pb, 1.0);
        assert_eq!(pb.position(), 100);
    }
}
