//! File access seams used by the session controller.
//!
//! Pickers are interactive and live on the UI thread; text I/O is plain
//! filesystem work and must be usable from the autosave worker thread.

use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::Result;
use crate::app::services::file_filters::FileFilter;

/// Native open / save-as dialogs. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_open(&mut self, filter: &FileFilter) -> Option<PathBuf>;

    fn pick_save(&mut self, filter: &FileFilter, default_name: &str) -> Option<PathBuf>;
}

/// Whole-file text reads and writes.
pub trait TextStore {
    fn read_text(&self, path: &Path) -> Result<String>;

    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
}
