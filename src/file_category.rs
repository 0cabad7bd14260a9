/// Extension-based file categorization.
///
/// This module maps a file's extension to the name of the category folder the
/// file belongs in. Categories are checked in table order and the first one
/// listing the extension wins; anything unmatched falls back to [`OTHERS`].
///
/// # Examples
///
/// ```
/// use dirsort::file_category::CategoryTable;
/// use std::path::Path;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify(Path::new("photo.JPG")).name(), "Images");
/// assert_eq!(table.classify(Path::new("report.pdf")).name(), "Documents");
/// assert_eq!(table.classify(Path::new("notes.xyz")).name(), "Others");
/// ```
use std::path::Path;

/// Name of the fallback category for files no table entry claims.
pub const OTHERS: &str = "Others";

/// A named bucket of file extensions.
///
/// Extensions are stored lowercase with their leading dot (`.jpg`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalizing every extension.
    ///
    /// The leading dot is optional on input and case is folded, so `"JPG"`,
    /// `"jpg"` and `".jpg"` all register as `.jpg`.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Returns the category (and folder) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the normalized extensions of this category.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns true if `extension` (already normalized) belongs to this category.
    fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Outcome of classifying a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// A table entry listed the file's extension.
    Matched(&'a str),
    /// Nothing matched; the file goes to [`OTHERS`].
    Fallback,
}

impl<'a> Classification<'a> {
    /// Returns the destination category name.
    pub fn name(&self) -> &'a str {
        match self {
            Classification::Matched(name) => name,
            Classification::Fallback => OTHERS,
        }
    }

    /// Returns true when the file fell through to [`OTHERS`].
    pub fn is_fallback(&self) -> bool {
        matches!(self, Classification::Fallback)
    }
}

/// Ordered table of categories.
///
/// Order matters: when two categories list the same extension, the one that
/// comes first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Creates a table from categories in lookup order.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Appends a category at the end of the lookup order.
    pub fn push(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Returns the categories in lookup order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Maps an extension (any case, dot optional) to its category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.category_for_extension("MP3"), Some("Music"));
    /// assert_eq!(table.category_for_extension(".rs"), None);
    /// ```
    pub fn category_for_extension(&self, ext: &str) -> Option<&str> {
        let ext = normalize_extension(ext);
        self.categories
            .iter()
            .find(|category| category.contains(&ext))
            .map(Category::name)
    }

    /// Classifies a file by the extension of its name.
    ///
    /// Files without an extension, dot-files such as `.bashrc` included,
    /// always fall back to [`OTHERS`].
    pub fn classify(&self, path: &Path) -> Classification<'_> {
        path.extension()
            .and_then(|ext| self.category_for_extension(&ext.to_string_lossy()))
            .map_or(Classification::Fallback, Classification::Matched)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            Category::new("Images", [".jpg", ".jpeg", ".png", ".gif", ".bmp"]),
            Category::new("Documents", [".pdf", ".docx", ".txt", ".pptx", ".xlsx"]),
            Category::new("Videos", [".mp4", ".mov", ".avi", ".mkv"]),
            Category::new("Music", [".mp3", ".wav", ".aac"]),
            Category::new("Archives", [".zip", ".rar", ".7z"]),
        ])
    }
}
