//! Package manager detection.
//!
//! Walks from a start directory up to the filesystem root. In each directory:
//! 1. `packageManager` field in package.json (highest priority)
//! 2. Lock file detection
//!
//! The first directory with a match decides; with no match anywhere the
//! result is npm.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::manager::PackageManager;
use super::manifest::load_package;
use crate::cache::PmCache;
use crate::utils::{probe, EntryKind, UpwardPaths};

/// Why a package manager was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSource {
    /// `packageManager` field in the manifest at this path.
    PackageManagerField(PathBuf),
    /// Lockfile at this path.
    LockFile(PathBuf),
    /// Persisted cache entry for the working directory.
    Cache,
    /// Explicit choice (CLI flag or configuration).
    Override(String),
    /// Nothing found anywhere.
    Default,
}

/// Result of package manager detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// The detected package manager.
    pub manager: PackageManager,
    /// Where the decision came from.
    pub source: DetectionSource,
}

impl Detection {
    /// Detection that fell through to npm.
    pub fn fallback() -> Self {
        Self {
            manager: PackageManager::Npm,
            source: DetectionSource::Default,
        }
    }

    /// Explicit choice that skips detection.
    pub fn overridden(manager: PackageManager, origin: impl Into<String>) -> Self {
        Self {
            manager,
            source: DetectionSource::Override(origin.into()),
        }
    }

    /// Directory holding the file that decided detection, if any.
    pub fn found_in(&self) -> Option<&Path> {
        match &self.source {
            DetectionSource::PackageManagerField(path) | DetectionSource::LockFile(path) => {
                path.parent()
            }
            DetectionSource::Cache | DetectionSource::Override(_) | DetectionSource::Default => {
                None
            }
        }
    }

    /// Whether this came from the upward walk (and may be cached).
    pub fn is_walk_result(&self) -> bool {
        matches!(
            self.source,
            DetectionSource::PackageManagerField(_) | DetectionSource::LockFile(_)
        )
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            DetectionSource::PackageManagerField(path) => write!(
                f,
                "{} (packageManager field in {})",
                self.manager,
                path.display()
            ),
            DetectionSource::LockFile(path) => {
                write!(f, "{} (found {})", self.manager, path.display())
            }
            DetectionSource::Cache => write!(f, "{} (cached)", self.manager),
            DetectionSource::Override(origin) => write!(f, "{} ({origin})", self.manager),
            DetectionSource::Default => write!(f, "{} (default, no lock file found)", self.manager),
        }
    }
}

/// Detect the package manager for `start` by walking up to the root.
///
/// Malformed manifests are skipped. Lockfile probe errors other than
/// not-found are returned.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use n_pm::package::detect;
///
/// # async fn demo() -> std::io::Result<()> {
/// let detection = detect(Path::new("/path/to/project")).await?;
/// println!("Using: {detection}");
/// # Ok(())
/// # }
/// ```
pub async fn detect(start: &Path) -> io::Result<Detection> {
    for dir in UpwardPaths::new(start).iter() {
        if let Some(found) = detect_in_dir(&dir).await? {
            debug!(%found, "Detected package manager");
            return Ok(found);
        }
    }
    debug!(start = %start.display(), "No package manager hint found, using npm");
    Ok(Detection::fallback())
}

/// Check a single directory for a manifest hint or a lockfile.
async fn detect_in_dir(dir: &Path) -> io::Result<Option<Detection>> {
    if let Some(pkg) = load_package(dir).await {
        if let Some(manager) = pkg.package_manager() {
            return Ok(Some(Detection {
                manager,
                source: DetectionSource::PackageManagerField(dir.join("package.json")),
            }));
        }
    }

    for manager in PackageManager::LOCK_PRIORITY {
        let lock = dir.join(manager.lock_file());
        if probe(&lock, EntryKind::File).await? {
            return Ok(Some(Detection {
                manager,
                source: DetectionSource::LockFile(lock),
            }));
        }
    }

    Ok(None)
}

/// Request-scoped detector.
///
/// Memoizes results per directory for its own lifetime and, when given a
/// [`PmCache`], consults and updates the persisted cache.
#[derive(Debug, Default)]
pub struct Detector {
    memo: HashMap<PathBuf, Detection>,
    store: Option<PmCache>,
}

impl Detector {
    /// Detector without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector backed by a persisted cache.
    pub fn with_store(store: PmCache) -> Self {
        Self {
            memo: HashMap::new(),
            store: Some(store),
        }
    }

    /// Detect for `dir`, using the memo and the persisted cache first.
    pub async fn detect(&mut self, dir: &Path) -> io::Result<Detection> {
        if let Some(hit) = self.memo.get(dir) {
            return Ok(hit.clone());
        }

        if let Some(manager) = self.store.as_ref().and_then(|s| s.get(dir)) {
            let hit = Detection {
                manager,
                source: DetectionSource::Cache,
            };
            self.memo.insert(dir.to_path_buf(), hit.clone());
            return Ok(hit);
        }

        let found = detect(dir).await?;
        if found.is_walk_result() {
            if let Some(store) = self.store.as_mut() {
                store.set(dir, found.manager);
                if let Err(e) = store.save() {
                    tracing::warn!(error = %e, "Failed to persist package manager cache");
                }
            }
        }
        self.memo.insert(dir.to_path_buf(), found.clone());
        Ok(found)
    }

    /// Forget everything known about `dir` (used after switching managers).
    pub fn forget(&mut self, dir: &Path) {
        self.memo.remove(dir);
        if let Some(store) = self.store.as_mut() {
            store.remove(dir);
        }
    }

    /// The persisted cache, if this detector has one.
    pub fn store_mut(&mut self) -> Option<&mut PmCache> {
        self.store.as_mut()
    }
}
