//! Configuration loading: category table, file filters and failure policy.
//!
//! Configuration is optional. Without a file the organizer uses the built-in
//! category table, accepts every regular file and aborts on the first move
//! failure.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", "png"]
//!
//! [organize]
//! on_error = "continue"
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Categories are matched in the order they are listed. When the list is
//! absent or empty the default table is used.

use crate::file_category::{Category, CategoryTable, OTHERS};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A category tried to claim the name of the fallback category.
    ReservedCategory(String),
    /// A category was declared without a name.
    EmptyCategoryName,
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::ReservedCategory(name) => {
                write!(f, "Category name '{}' is reserved for unmatched files", name)
            }
            ConfigError::EmptyCategoryName => write!(f, "Category name must not be empty"),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Category table in lookup order. Empty means the built-in table.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,

    /// Behaviour of the organize pass.
    #[serde(default)]
    pub organize: OrganizeSettings,

    /// Rules deciding which files are picked up at all.
    #[serde(default)]
    pub filters: FilterRules,
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeSettings {
    #[serde(default)]
    pub on_error: FailurePolicy,
}

/// What the organize pass does when a single file cannot be moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run and hand back what was moved so far.
    #[default]
    Abort,
    /// Report the failure as an event and move on to the next file.
    Continue,
}

/// Filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to pick up hidden files (starting with "."). Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dirsortrc.toml` in the current directory
    /// 3. Look for `~/.config/dirsort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is malformed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Build the category table described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a category has an empty name or uses the reserved
    /// fallback name.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::default());
        }

        let mut table = CategoryTable::new(Vec::new());
        for entry in &self.categories {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyCategoryName);
            }
            if name.eq_ignore_ascii_case(OTHERS) {
                return Err(ConfigError::ReservedCategory(name.to_string()));
            }
            table.push(Category::new(name, &entry.extensions));
        }
        Ok(table)
    }

    /// Compile the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Filter rules with every pattern compiled up front.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check if a file should be organized.
    ///
    /// Only the file name is inspected. Checks are performed in this order,
    /// with early termination:
    /// 1. Include patterns - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

impl Default for CompiledFilters {
    /// Accepts every file.
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(toml: &str) -> CompiledFilters {
        Config::from_toml_str(toml)
            .expect("config should parse")
            .compile_filters()
            .expect("filters should compile")
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.categories.is_empty());
        assert_eq!(config.organize.on_error, FailurePolicy::Abort);
        assert!(config.filters.enable_hidden_files);
        assert_eq!(
            config.category_table().unwrap(),
            CategoryTable::default()
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.categories.is_empty());
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_categories_keep_declared_order() {
        let config = Config::from_toml_str(
            r#"
            [[categories]]
            name = "Raw"
            extensions = ["CR2", ".nef", ".jpg"]

            [[categories]]
            name = "Images"
            extensions = [".jpg", ".png"]
            "#,
        )
        .unwrap();
        let table = config.category_table().unwrap();

        assert_eq!(table.categories().len(), 2);
        assert_eq!(table.category_for_extension("cr2"), Some("Raw"));
        assert_eq!(table.category_for_extension("jpg"), Some("Raw"));
        assert_eq!(table.category_for_extension("png"), Some("Images"));
        assert_eq!(table.category_for_extension("pdf"), None);
    }

    #[test]
    fn test_reserved_category_rejected() {
        let config = Config::from_toml_str(
            r#"
            [[categories]]
            name = "others"
            extensions = [".bin"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.category_table(),
            Err(ConfigError::ReservedCategory(_))
        ));
    }

    #[test]
    fn test_empty_category_name_rejected() {
        let config = Config::from_toml_str(
            r#"
            [[categories]]
            name = "  "
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.category_table(),
            Err(ConfigError::EmptyCategoryName)
        ));
    }

    #[test]
    fn test_failure_policy_parses() {
        let config = Config::from_toml_str("[organize]\non_error = \"continue\"\n").unwrap();
        assert_eq!(config.organize.on_error, FailurePolicy::Continue);

        let bad = Config::from_toml_str("[organize]\non_error = \"retry\"\n");
        assert!(matches!(bad, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_toml_str("[[categories]\nname = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_missing_explicit_file_returns_error() {
        let result = Config::load(Some(Path::new("/non/existent/dirsort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[filters]\nenable_hidden_files = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.filters.enable_hidden_files);
    }

    #[test]
    fn test_default_filters_include_everything() {
        let compiled = CompiledFilters::default();
        assert!(compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("a.jpg")));
        assert!(compiled.should_include(Path::new("Makefile")));
    }

    #[test]
    fn test_hidden_files_excluded_when_disabled() {
        let compiled = filters("[filters]\nenable_hidden_files = false\n");
        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("visible.txt")));
    }

    #[test]
    fn test_exclude_filenames_and_extensions() {
        let compiled = filters(
            r#"
            [filters.exclude]
            filenames = ["Thumbs.db"]
            extensions = ["tmp", ".BAK"]
            "#,
        );
        assert!(!compiled.should_include(Path::new("Thumbs.db")));
        assert!(!compiled.should_include(Path::new("draft.tmp")));
        assert!(!compiled.should_include(Path::new("draft.TMP")));
        assert!(!compiled.should_include(Path::new("old.bak")));
        assert!(compiled.should_include(Path::new("draft.txt")));
    }

    #[test]
    fn test_exclude_glob_matches_file_name() {
        let compiled = filters(
            r#"
            [filters.exclude]
            patterns = ["*.part", "file?.log"]
            "#,
        );
        assert!(!compiled.should_include(Path::new("/downloads/movie.mkv.part")));
        assert!(!compiled.should_include(Path::new("file1.log")));
        assert!(compiled.should_include(Path::new("file12.log")));
        assert!(compiled.should_include(Path::new("movie.mkv")));
    }

    #[test]
    fn test_exclude_regex() {
        let compiled = filters(
            r#"
            [filters.exclude]
            regex = ['^~\$']
            "#,
        );
        assert!(!compiled.should_include(Path::new("~$report.docx")));
        assert!(compiled.should_include(Path::new("report.docx")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = filters(
            r#"
            [filters]
            enable_hidden_files = false

            [filters.exclude]
            extensions = ["log"]

            [filters.include]
            patterns = [".important", "keep-*.log"]
            "#,
        );
        assert!(compiled.should_include(Path::new(".important")));
        assert!(!compiled.should_include(Path::new(".other")));
        assert!(compiled.should_include(Path::new("keep-me.log")));
        assert!(!compiled.should_include(Path::new("drop-me.log")));
    }

    #[test]
    fn test_invalid_patterns_return_error() {
        let glob = Config::from_toml_str("[filters.exclude]\npatterns = [\"[invalid\"]\n")
            .unwrap()
            .compile_filters();
        assert!(matches!(glob, Err(ConfigError::InvalidGlobPattern(_))));

        let regex = Config::from_toml_str("[filters.exclude]\nregex = [\"[invalid(\"]\n")
            .unwrap()
            .compile_filters();
        assert!(matches!(
            regex,
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
