use std::path::{Path, PathBuf};

/// Placeholder written into freshly created files and shown on startup.
pub const PLACEHOLDER_TEMPLATE: &str = "# Hello World\n";

/// The markdown text being edited and the file it is bound to.
///
/// Content and path only ever change together through `load`; user edits go
/// through `apply_edit` and never touch the path.
#[derive(Debug, Clone)]
pub struct Document {
    content: String,
    path: Option<PathBuf>,
    /// Bumped on every edit.
    revision: u64,
    /// Last revision known to be on disk.
    saved_revision: u64,
    /// Bumped on every load, so results for a previous file can be told apart.
    generation: u64,
}

impl Document {
    pub fn new_untitled(content: &str) -> Self {
        Self {
            content: content.to_string(),
            path: None,
            revision: 0,
            saved_revision: 0,
            generation: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.path.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the in-memory text has edits not yet confirmed on disk.
    /// Untitled documents are dirty as soon as they are edited.
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Replace content and path in one step. The loaded text is clean.
    pub fn load(&mut self, path: PathBuf, content: String) {
        self.path = Some(path);
        self.content = content;
        self.generation += 1;
        self.revision = 0;
        self.saved_revision = 0;
    }

    /// Like `load`, but the content is not on disk yet: the document stays
    /// dirty until revision 1 of this generation is reported saved.
    pub fn load_unsaved(&mut self, path: PathBuf, content: String) {
        self.load(path, content);
        self.revision = 1;
    }

    /// Record a user edit. Returns false if the text did not actually change.
    pub fn apply_edit(&mut self, content: String) -> bool {
        if content == self.content {
            return false;
        }
        self.content = content;
        self.revision += 1;
        true
    }

    /// Note that `revision` of `generation` reached disk.
    pub fn mark_saved(&mut self, generation: u64, revision: u64) {
        if generation == self.generation && revision > self.saved_revision {
            self.saved_revision = revision.min(self.revision);
        }
    }

    /// File name for window titles, or "Untitled".
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new_untitled(PLACEHOLDER_TEMPLATE)
    }
}
