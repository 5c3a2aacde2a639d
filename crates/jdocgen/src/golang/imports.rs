//! Import alias tables
//!
//! A Go qualifier names a package, not a path: `m.User` after
//! `import m "github.com/acme/inventory/models"` refers to package `models`.
//! [`PackageIndex`] knows which package every scanned directory declares and
//! turns a file's imports into an [`ImportTable`] from qualifier to package
//! name.

use super::parse::GoImport;
use crate::models::ImportTable;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref MAJOR_VERSION: Regex = Regex::new(r"^v[0-9]+$").unwrap();
    static ref GOPKG_VERSION: Regex = Regex::new(r"\.v[0-9]+$").unwrap();
}

/// Package names declared by the scanned directories
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    /// Module path from `go.mod`
    module: Option<String>,
    /// Directory relative to the root (`/`-separated, empty for the root) → package
    dirs: BTreeMap<String, String>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module path used to map import paths onto directories
    pub fn with_module(mut self, module: Option<String>) -> Self {
        self.module = module;
        self
    }

    /// Record the package declared in a directory; the first file seen wins
    pub fn insert(&mut self, rel_dir: &str, package: &str) {
        let rel_dir = rel_dir.trim_matches('/').replace('\\', "/");
        self.dirs
            .entry(rel_dir)
            .or_insert_with(|| package.to_string());
    }

    /// Real package name behind an import path
    pub fn package_for_import(&self, import_path: &str) -> String {
        if let Some(module) = &self.module {
            let rel = if import_path == module {
                Some("")
            } else {
                import_path
                    .strip_prefix(module.as_str())
                    .and_then(|rest| rest.strip_prefix('/'))
            };
            if let Some(package) = rel.and_then(|rel| self.dirs.get(rel)) {
                return package.clone();
            }
        }

        let suffix_match = self
            .dirs
            .iter()
            .filter(|(dir, _)| !dir.is_empty())
            .filter(|(dir, _)| {
                import_path == dir.as_str() || import_path.ends_with(&format!("/{}", dir))
            })
            .max_by_key(|(dir, _)| dir.len());
        if let Some((_, package)) = suffix_match {
            return package.clone();
        }

        last_segment_package(import_path)
    }

    /// Import table for one file's imports
    pub fn import_table(&self, imports: &[GoImport]) -> ImportTable {
        let mut table = ImportTable::new();
        for import in imports {
            let package = self.package_for_import(&import.path);
            match import.alias.as_deref() {
                Some("_") | Some(".") => {}
                Some(alias) => table.insert(alias, package),
                None => table.insert(package.clone(), package),
            }
        }
        table
    }
}

/// Package name guessed from the path: last segment without a major version
fn last_segment_package(import_path: &str) -> String {
    let mut segments: Vec<&str> = import_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| MAJOR_VERSION.is_match(s)) {
        segments.pop();
    }
    let last = segments.last().copied().unwrap_or(import_path);
    GOPKG_VERSION.replace(last, "").into_owned()
}
