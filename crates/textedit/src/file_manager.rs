use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::editor::Editor;
use crate::error::EditorError;

/// Tracks the file backing the buffer and performs the reads and writes.
pub struct FileManager {
    current_path: Option<PathBuf>,
}

impl FileManager {
    pub fn new() -> Self {
        Self { current_path: None }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub fn clear(&mut self) {
        self.current_path = None;
    }

    /// Read `path` as UTF-8 text and make it the current file.
    pub async fn open_file(&mut self, path: &Path) -> Result<String> {
        let content = read_text(path).await?;
        self.current_path = Some(path.to_path_buf());
        log::info!("Successfully opened file: {}", path.display());
        Ok(content)
    }

    /// Write the buffer to the current file.
    pub async fn save_file(&self, editor: &mut Editor) -> Result<String> {
        let Some(path) = self.current_path.as_deref() else {
            return Err(anyhow::anyhow!("No file name specified"));
        };

        write_text(path, &editor.get_content()).await?;
        editor.mark_saved();
        log::info!("Successfully saved file: {}", path.display());
        Ok(format!("Saved: {}", display_name(path)))
    }

    /// Write the buffer to `path` and make it the current file.
    pub async fn save_file_as(&mut self, path: &Path, editor: &mut Editor) -> Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| EditorError::from_io(parent, e))?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        if let Ok(metadata) = fs::metadata(path).await {
            if metadata.permissions().readonly() {
                return Err(EditorError::PermissionDenied(path.to_path_buf()).into());
            }
        }

        write_text(path, &editor.get_content()).await?;
        self.current_path = Some(path.to_path_buf());
        editor.mark_saved();
        log::info!("Successfully saved file as: {}", path.display());
        Ok(format!("Saved: {}", display_name(path)))
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn read_text(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|e| EditorError::from_io(path, e))?;
    if !metadata.is_file() {
        return Err(EditorError::NotAFile(path.to_path_buf()).into());
    }

    const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;
    if metadata.len() > LARGE_FILE_THRESHOLD {
        log::warn!(
            "Large file detected ({} bytes): {}",
            metadata.len(),
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| EditorError::from_io(path, e))?;
    Ok(content)
}

async fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content.as_bytes())
        .await
        .map_err(|e| EditorError::from_io(path, e))?;
    Ok(())
}

/// File name for titles and status messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn test_file_manager_creation() {
        let fm = FileManager::new();
        assert!(!fm.has_file());
        assert!(fm.current_path().is_none());
    }

    #[tokio::test]
    async fn test_open_and_save_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "Hello World\nTest content").unwrap();

        let mut fm = FileManager::new();
        let mut editor = Editor::new();

        let content = fm.open_file(temp_file.path()).await.unwrap();
        editor.set_content(&content);
        assert_eq!(fm.current_path(), Some(temp_file.path()));

        editor.move_to_line_end();
        editor.insert_char('!');
        let message = fm.save_file(&mut editor).await.unwrap();
        assert!(message.starts_with("Saved: "));
        assert!(!editor.is_modified());
        assert_eq!(
            std::fs::read_to_string(temp_file.path()).unwrap(),
            "Hello World!\nTest content"
        );
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut fm = FileManager::new();

        let err = fm.open_file(&dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::NotFound(_))
        ));
        assert!(!fm.has_file());
    }

    #[tokio::test]
    async fn test_open_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut fm = FileManager::new();

        let err = fm.open_file(dir.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::NotAFile(_))
        ));
    }

    #[tokio::test]
    async fn test_open_invalid_utf8() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();

        let mut fm = FileManager::new();
        let err = fm.open_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::InvalidUtf8(_))
        ));
    }

    #[tokio::test]
    async fn test_save_without_path_fails() {
        let fm = FileManager::new();
        let mut editor = Editor::new();
        editor.insert_char('x');
        assert!(fm.save_file(&mut editor).await.is_err());
        assert!(editor.is_modified());
    }

    #[tokio::test]
    async fn test_save_file_as_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("note.md");
        let mut fm = FileManager::new();
        let mut editor = Editor::new();
        editor.insert_str("Test");

        let message = fm.save_file_as(&path, &mut editor).await.unwrap();
        assert_eq!(message, "Saved: note.md");
        assert_eq!(fm.current_path(), Some(path.as_path()));
        assert!(!editor.is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Test");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/c.txt")), "c.txt");
    }
}
