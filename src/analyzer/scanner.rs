//! Source Enumerator
//!
//! Resolves a source path into the ordered list of files to chunk.
//! A directory is walked recursively and sorted by relative path so reruns
//! are reproducible; a single file must carry the configured extension.

use glob::Pattern;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::source::{EXTENSION, SKIP_DIRS};
use crate::types::{ChunkError, Result, SourceFile};

pub struct SourceScanner {
    root: PathBuf,
    extension: String,
    exclude: Vec<String>,
}

impl SourceScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = SKIP_DIRS.iter().map(|d| format!("**/{}/**", d)).collect();
        Self {
            root: root.as_ref().to_path_buf(),
            extension: EXTENSION.to_string(),
            exclude,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Root that relative paths are anchored to. For single-file input this
    /// is the file's parent directory.
    pub fn source_root(&self) -> PathBuf {
        if self.root.is_file() {
            self.root
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            self.root.clone()
        }
    }

    pub fn scan(&self) -> Result<Vec<SourceFile>> {
        if !self.root.exists() {
            return Err(ChunkError::NotFound(self.root.clone()));
        }

        if self.root.is_file() {
            return self.scan_single();
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if self.should_exclude(path) {
                continue;
            }

            if !self.matches_extension(path) {
                continue;
            }

            let rel = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
            files.push(SourceFile {
                path: path.to_path_buf(),
                rel,
            });
        }

        files.sort_by(|a, b| a.rel.cmp(&b.rel));
        Ok(files)
    }

    fn scan_single(&self) -> Result<Vec<SourceFile>> {
        if !self.matches_extension(&self.root) {
            return Err(ChunkError::InvalidInput(format!(
                "expected a .{} file: {}",
                self.extension,
                self.root.display()
            )));
        }

        let rel = self
            .root
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| ChunkError::InvalidInput(format!("bad path: {}", self.root.display())))?;

        Ok(vec![SourceFile {
            path: self.root.clone(),
            rel,
        }])
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude {
            if Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return true;
            }
        }

        false
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext == self.extension)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "x = 1\n").expect("write");
    }

    #[test]
    fn test_scan_directory_is_sorted_and_recursive() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("structural/adapter.py"));
        touch(&dir.path().join("behavioral/command.py"));
        touch(&dir.path().join("behavioral/observer.py"));
        touch(&dir.path().join("README.md"));

        let files = SourceScanner::new(dir.path()).scan().expect("scan");
        let rels: Vec<String> = files.iter().map(|f| f.rel_display()).collect();
        assert_eq!(
            rels,
            vec![
                "behavioral/command.py",
                "behavioral/observer.py",
                "structural/adapter.py"
            ]
        );
    }

    #[test]
    fn test_scan_skips_noise_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("ok.py"));
        touch(&dir.path().join("__pycache__/cached.py"));
        touch(&dir.path().join(".venv/lib/site.py"));

        let files = SourceScanner::new(dir.path()).scan().expect("scan");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_display(), "ok.py");
    }

    #[test]
    fn test_single_file_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("singleton.py");
        touch(&file);

        let scanner = SourceScanner::new(&file);
        let files = scanner.scan().expect("scan");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_display(), "singleton.py");
        assert_eq!(scanner.source_root(), dir.path());
    }

    #[test]
    fn test_single_file_wrong_extension_is_invalid_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("notes.txt");
        touch(&file);

        let err = SourceScanner::new(&file).scan().unwrap_err();
        assert!(matches!(err, ChunkError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let err = SourceScanner::new("/definitely/not/here")
            .scan()
            .unwrap_err();
        assert!(matches!(err, ChunkError::NotFound(_)));
    }
}
