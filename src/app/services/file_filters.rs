use std::path::{Path, PathBuf};

/// A named set of file extensions offered by the native pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub extensions: &'static [&'static str],
}

/// Markdown documents: the only kind of file the editor opens or creates.
pub const MARKDOWN: FileFilter = FileFilter {
    description: "Markdown",
    extensions: &["md", "markdown"],
};

impl FileFilter {
    /// Wildcard pattern, e.g. `*.md` or `*.{md,markdown}`.
    pub fn pattern(&self) -> String {
        match self.extensions {
            [] => "*".to_string(),
            [single] => format!("*.{}", single),
            many => format!("*.{{{}}}", many.join(",")),
        }
    }

    /// FLTK filter format: "Description\tPattern".
    /// FLTK adds its own "All Files (*)" entry, so we don't include it.
    pub fn native_filter(&self) -> String {
        format!("{}\t{}", self.description, self.pattern())
    }

    /// Case-insensitive extension check.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
    }

    /// Append the first extension when the chosen save path has none of ours.
    ///
    /// Native save dialogs on Linux return the name exactly as typed, so
    /// "notes" would otherwise be created without an extension.
    pub fn with_default_extension(&self, path: PathBuf) -> PathBuf {
        if self.matches(&path) {
            return path;
        }
        match self.extensions.first() {
            Some(ext) if path.extension().is_none() => path.with_extension(ext),
            _ => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_pattern() {
        assert_eq!(MARKDOWN.pattern(), "*.{md,markdown}");
    }

    #[test]
    fn test_single_and_empty_patterns() {
        let txt = FileFilter { description: "Text", extensions: &["txt"] };
        assert_eq!(txt.pattern(), "*.txt");

        let all = FileFilter { description: "All", extensions: &[] };
        assert_eq!(all.pattern(), "*");
    }

    #[test]
    fn test_native_filter_format() {
        let filter = MARKDOWN.native_filter();
        assert_eq!(filter, "Markdown\t*.{md,markdown}");
        assert!(!filter.contains('\n'));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(MARKDOWN.matches(Path::new("/docs/notes.md")));
        assert!(MARKDOWN.matches(Path::new("README.MARKDOWN")));
        assert!(!MARKDOWN.matches(Path::new("notes.txt")));
        assert!(!MARKDOWN.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_default_extension_added_only_when_missing() {
        assert_eq!(
            MARKDOWN.with_default_extension(PathBuf::from("/docs/notes")),
            PathBuf::from("/docs/notes.md")
        );
        assert_eq!(
            MARKDOWN.with_default_extension(PathBuf::from("/docs/default.md")),
            PathBuf::from("/docs/default.md")
        );
        // A foreign extension is the user's explicit choice.
        assert_eq!(
            MARKDOWN.with_default_extension(PathBuf::from("/docs/notes.txt")),
            PathBuf::from("/docs/notes.txt")
        );
    }
}
