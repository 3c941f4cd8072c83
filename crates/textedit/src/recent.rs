use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_RECENT_FILES: usize = 10;

/// Most-recently-used file list, newest first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentFiles {
    paths: Vec<PathBuf>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted entries, dropping duplicates and anything past
    /// the limit. Order is kept.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut recent = Self {
            paths: paths.into_iter().collect(),
        };
        recent.normalize();
        recent
    }

    /// Move `path` to the front, inserting it if absent. Returns the
    /// absolute form that was stored.
    pub fn push(&mut self, path: &Path) -> PathBuf {
        let path = absolute_path(path);
        self.paths.retain(|p| p != &path);
        self.paths.insert(0, path.clone());
        self.paths.truncate(MAX_RECENT_FILES);
        path
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn first(&self) -> Option<&Path> {
        self.get(0)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Entries whose file still exists, with their index in the full list.
    pub fn existing(&self) -> Vec<(usize, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, p)| p.exists())
            .map(|(i, p)| (i, p.as_path()))
            .collect()
    }

    /// Returns true if anything had to be dropped.
    pub fn normalize(&mut self) -> bool {
        let before = self.paths.len();
        let mut seen: Vec<PathBuf> = Vec::with_capacity(before);
        self.paths.retain(|p| {
            if p.as_os_str().is_empty() || seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        self.paths.truncate(MAX_RECENT_FILES);
        self.paths.len() != before
    }
}

/// Canonical path when the file exists, otherwise the path joined onto the
/// current directory.
pub fn absolute_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(dir) => dir.join(path),
        Err(e) => {
            log::warn!("Failed to resolve current directory: {}", e);
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "x").unwrap();
        std::fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_push_moves_existing_to_front() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.txt");
        let b = touch(&dir, "b.txt");

        let mut recent = RecentFiles::new();
        recent.push(&a);
        recent.push(&b);
        recent.push(&a);

        assert_eq!(recent.len(), 2);
        assert_eq!(recent.first(), Some(a.as_path()));
        assert_eq!(recent.get(1), Some(b.as_path()));
    }

    #[test]
    fn test_never_exceeds_limit() {
        let dir = TempDir::new().unwrap();
        let mut recent = RecentFiles::new();
        for i in 0..25 {
            let path = touch(&dir, &format!("{}.txt", i));
            recent.push(&path);
            assert!(recent.len() <= MAX_RECENT_FILES);
        }
        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(recent.first(), Some(dir.path().join("24.txt").canonicalize().unwrap().as_path()));
    }

    #[test]
    fn test_push_stores_absolute_path() {
        let mut recent = RecentFiles::new();
        let stored = recent.push(Path::new("does-not-exist-yet.txt"));
        assert!(stored.is_absolute());
        assert!(recent.contains(&stored));
    }

    #[test]
    fn test_from_paths_dedups_and_truncates() {
        let mut paths: Vec<PathBuf> = (0..15).map(|i| PathBuf::from(format!("/tmp/{}", i))).collect();
        paths.insert(1, PathBuf::from("/tmp/0"));
        paths.insert(2, PathBuf::new());

        let recent = RecentFiles::from_paths(paths);
        assert_eq!(recent.len(), MAX_RECENT_FILES);
        assert_eq!(recent.get(0), Some(Path::new("/tmp/0")));
        assert_eq!(recent.get(1), Some(Path::new("/tmp/1")));
    }

    #[test]
    fn test_existing_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        let kept = touch(&dir, "kept.txt");
        let gone = touch(&dir, "gone.txt");

        let mut recent = RecentFiles::new();
        recent.push(&kept);
        recent.push(&gone);
        std::fs::remove_file(&gone).unwrap();

        let existing = recent.existing();
        assert_eq!(existing, vec![(1, kept.as_path())]);
    }

    #[test]
    fn test_serializes_as_string_list() {
        let recent = RecentFiles::from_paths(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        let json = serde_json::to_string(&recent).unwrap();
        assert_eq!(json, r#"["/a","/b"]"#);
    }
}
