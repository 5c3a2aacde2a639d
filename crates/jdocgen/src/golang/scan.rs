//! Go source discovery
//!
//! Walks a project directory and returns the Go files to document, skipping
//! hidden directories, excluded directories (`vendor` by default) and test
//! files.

use crate::diagnostics::{JdocError, JdocResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

lazy_static! {
    static ref MODULE_LINE: Regex = Regex::new(r"(?m)^\s*module\s+(\S+)").unwrap();
}

/// Source scanner for a Go project
#[derive(Debug, Clone)]
pub struct SourceScanner {
    /// Root directory to search
    root: PathBuf,
    /// Directory names that are never entered
    exclude_dirs: Vec<String>,
    /// Whether `_test.go` files are returned
    include_tests: bool,
}

impl SourceScanner {
    /// Create a scanner for a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_dirs: vec!["vendor".to_string()],
            include_tests: false,
        }
    }

    /// Replace the excluded directory names
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    /// Set whether test files are scanned
    pub fn with_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find all Go source files, sorted by path
    pub fn find_go_files(&self) -> JdocResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(JdocError::DirectoryNotFound(self.root.clone()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| JdocError::Io(e.into()))?;
            if entry.file_type().is_file() && self.is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!(root = %self.root.display(), count = files.len(), "found Go files");
        Ok(files)
    }

    /// Module path declared in `go.mod` at the root, if any
    pub fn module_path(&self) -> JdocResult<Option<String>> {
        let go_mod = self.root.join("go.mod");
        if !go_mod.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&go_mod)?;
        Ok(MODULE_LINE
            .captures(&content)
            .map(|caps| caps[1].trim_matches('"').to_string()))
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.exclude_dirs.iter().any(|d| d == name.as_ref())
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".go") && (self.include_tests || !name.ends_with("_test.go"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package x\n").unwrap();
    }

    #[test]
    fn test_find_go_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.go");
        touch(dir.path(), "models/user.go");
        touch(dir.path(), "models/user_test.go");
        touch(dir.path(), "vendor/lib/lib.go");
        touch(dir.path(), ".git/hooks/x.go");
        touch(dir.path(), "README.md");

        let files = SourceScanner::new(dir.path()).find_go_files().unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["main.go", "models/user.go"]);
    }

    #[test]
    fn test_include_tests_and_custom_excludes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "api/handler_test.go");
        touch(dir.path(), "vendor/lib/lib.go");
        touch(dir.path(), "gen/gen.go");

        let files = SourceScanner::new(dir.path())
            .with_tests(true)
            .with_exclude_dirs(vec!["gen".into()])
            .find_go_files()
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = SourceScanner::new(dir.path().join("nope"))
            .find_go_files()
            .unwrap_err();
        assert!(matches!(err, JdocError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_module_path() {
        let dir = TempDir::new().unwrap();
        assert_eq!(SourceScanner::new(dir.path()).module_path().unwrap(), None);

        fs::write(
            dir.path().join("go.mod"),
            "module github.com/acme/inventory\n\ngo 1.22\n",
        )
        .unwrap();
        assert_eq!(
            SourceScanner::new(dir.path()).module_path().unwrap(),
            Some("github.com/acme/inventory".to_string())
        );
    }
}
