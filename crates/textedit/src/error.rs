use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a file command, shown to the user in an error dialog.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("File is not valid UTF-8 text: {}", .0.display())]
    InvalidUtf8(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EditorError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => EditorError::NotFound(path),
            io::ErrorKind::PermissionDenied => EditorError::PermissionDenied(path),
            io::ErrorKind::InvalidData => EditorError::InvalidUtf8(path),
            _ => EditorError::Io { path, source: err },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            EditorError::NotFound(path)
            | EditorError::NotAFile(path)
            | EditorError::PermissionDenied(path)
            | EditorError::InvalidUtf8(path)
            | EditorError::Io { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_kinds_are_classified() {
        let path = Path::new("/tmp/x.txt");
        let not_found = EditorError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, EditorError::NotFound(_)));

        let denied = EditorError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, EditorError::PermissionDenied(_)));

        let other = EditorError::from_io(path, io::Error::other("disk on fire"));
        assert_eq!(other.path(), path);
        assert!(other.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = EditorError::NotAFile(PathBuf::from("/tmp")).into();
        assert!(err.downcast_ref::<EditorError>().is_some());
        assert_eq!(err.to_string(), "Not a file: /tmp");
    }

    #[test]
    fn test_io_error_keeps_its_source() {
        use std::error::Error as _;

        let err = EditorError::from_io(Path::new("/tmp/x.txt"), io::Error::other("bad sector"));
        assert_eq!(err.to_string(), "/tmp/x.txt: bad sector");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("bad sector"));
    }
}
