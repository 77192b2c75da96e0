use std::fs;
use std::path::Path;

use crate::app::infrastructure::error::Result;
use crate::app::services::gateway::TextStore;

/// `TextStore` backed directly by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl TextStore for FsStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
        Ok(content)
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        fs::write(path, text)?;
        tracing::debug!(target: "io", file = %path.display(), size_bytes = text.len(), "file_write_ok");
        Ok(())
    }
}
