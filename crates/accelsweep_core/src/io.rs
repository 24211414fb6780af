//! I/O utility functions

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Write content to a file atomically using the write-then-rename pattern.
///
/// The content lands in a sibling temporary file first and is then renamed
/// over the target, so an interrupted process never leaves the target
/// half-written (rename is atomic on POSIX filesystems).
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = sibling_temp_path(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    match path.parent() {
        Some(parent) => parent.join(format!(".{file_name}.tmp")),
        None => PathBuf::from(format!(".{file_name}.tmp")),
    }
}
