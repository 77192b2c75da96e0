use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogType, NativeFileChooser, NativeFileChooserOptions};

use crate::app::services::file_filters::FileFilter;
use crate::app::services::gateway::FilePicker;

/// Native FLTK file choosers. Remembers the last directory used.
#[derive(Debug, Default)]
pub struct NativePicker {
    last_directory: Option<PathBuf>,
}

impl NativePicker {
    pub fn new() -> Self {
        Self::default()
    }

    fn remember(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
    }

    fn run(&mut self, mut chooser: NativeFileChooser, filter: &FileFilter) -> Option<PathBuf> {
        chooser.set_filter(&filter.native_filter());
        if let Some(dir) = &self.last_directory {
            if let Err(e) = chooser.set_directory(dir) {
                tracing::debug!(target: "dialog", dir = %dir.display(), error = ?e, "could not preset directory");
            }
        }
        chooser.show(); // blocks until close
        if let Some(err) = chooser.error_message().filter(|m| !m.is_empty() && m != "No error") {
            tracing::warn!(target: "dialog", error = %err, "native file chooser failed");
        }

        let filename = chooser.filename();
        if filename.as_os_str().is_empty() {
            return None;
        }
        self.remember(&filename);
        Some(filename)
    }
}

impl FilePicker for NativePicker {
    fn pick_open(&mut self, filter: &FileFilter) -> Option<PathBuf> {
        let mut chooser = NativeFileChooser::new(FileDialogType::BrowseFile);
        chooser.set_title("Open Markdown File");
        self.run(chooser, filter)
    }

    fn pick_save(&mut self, filter: &FileFilter, default_name: &str) -> Option<PathBuf> {
        let mut chooser = NativeFileChooser::new(FileDialogType::BrowseSaveFile);
        chooser.set_title("New Markdown File");
        chooser.set_option(NativeFileChooserOptions::SaveAsConfirm);
        chooser.set_preset_file(default_name);
        self.run(chooser, filter)
    }
}
