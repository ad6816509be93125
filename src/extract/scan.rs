//! Directory scanning for undeclared dependencies.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::specifier::{RegexExtractor, SpecifierExtractor};
use crate::error::{NError, Result};
use crate::package::parse_package_json;

/// Default source file extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "js", "tsx", "jsx", "vue", "mjs", "cjs"];

/// Default directory names skipped while walking.
pub const DEFAULT_SKIP: &[&str] = &["node_modules", "dist", ".output", ".nuxt", ".git"];

/// What to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// File extensions (without the dot) to read.
    pub extensions: Vec<String>,
    /// Directory names to skip at any depth.
    pub skip: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip: DEFAULT_SKIP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanOptions {
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.skip.iter().any(|s| s == name))
                .unwrap_or(false)
    }

    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}

/// Source files under `dir` matching `options`, in walk order.
pub fn source_files(dir: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !options.is_skipped(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && options.is_source(entry.path()))
        .map(DirEntry::into_path)
        .collect()
}

/// Extract imported package names from every source file under `dir`.
///
/// Files that are not valid UTF-8 or cannot be read are skipped.
pub fn extract_deps_with<E>(dir: &Path, options: &ScanOptions, extractor: &E) -> BTreeSet<String>
where
    E: SpecifierExtractor + ?Sized,
{
    let mut found = BTreeSet::new();

    for path in source_files(dir, options) {
        match std::fs::read_to_string(&path) {
            Ok(code) => found.extend(extractor.packages(&code)),
            Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable source"),
        }
    }

    debug!(dir = %dir.display(), count = found.len(), "Extracted imports");
    found
}

/// Extract imported package names under `dir` with the regex extractor.
///
/// The walk runs on the blocking thread pool.
pub async fn extract_deps(dir: &Path, options: &ScanOptions) -> io::Result<BTreeSet<String>> {
    let dir = dir.to_path_buf();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        extract_deps_with(&dir, &options, &RegexExtractor::new())
    })
    .await
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Names in `dependencies` and `devDependencies` of the manifest at `path`.
///
/// A missing manifest declares nothing.
///
/// # Errors
///
/// Returns [`NError::InvalidManifest`] for malformed JSON and an IO error for
/// other read failures.
pub async fn declared_deps(path: &Path) -> Result<BTreeSet<String>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(NError::io("read", path, e)),
    };

    let pkg = parse_package_json(&content).map_err(|source| NError::InvalidManifest {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(pkg.declared_dependencies())
}

/// Imported packages that are not declared, sorted.
pub fn missing_deps(found: &BTreeSet<String>, declared: &BTreeSet<String>) -> Vec<String> {
    found.difference(declared).cloned().collect()
}
