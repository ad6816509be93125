//! Persisted package manager cache.
//!
//! Maps a working directory to the package manager detected there, so later
//! invocations can skip the upward walk. Stored as JSON under the platform
//! cache directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::package::PackageManager;
use crate::utils::pm_cache_file;

/// One cached detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Detected package manager.
    pub manager: PackageManager,
    /// When it was recorded.
    pub updated_at: DateTime<Utc>,
}

/// Per-directory package manager cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmCache {
    /// Version of the cache format.
    pub version: u32,
    /// Entries keyed by working directory.
    #[serde(default)]
    pub entries: HashMap<PathBuf, CacheEntry>,
    #[serde(skip)]
    path: PathBuf,
}

impl PmCache {
    /// Current cache format version.
    pub const VERSION: u32 = 1;

    /// Empty cache that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            version: Self::VERSION,
            entries: HashMap::new(),
            path: path.into(),
        }
    }

    /// Load the cache from the default location.
    pub fn load() -> Result<Self> {
        let path = pm_cache_file().context("Could not determine cache directory")?;
        Self::load_from(&path)
    }

    /// Load the cache from `path`.
    ///
    /// Handles missing files gracefully (returns an empty cache).
    /// Handles corrupt files by backing up and returning an empty cache.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read package manager cache");
                return Ok(Self::empty(path));
            }
        };

        match serde_json::from_str::<PmCache>(&content) {
            Ok(mut cache) if cache.version == Self::VERSION => {
                cache.path = path.to_path_buf();
                Ok(cache)
            }
            Ok(cache) => {
                warn!(version = cache.version, "Discarding package manager cache with unknown version");
                Ok(Self::empty(path))
            }
            Err(e) => {
                warn!(error = %e, "Package manager cache is corrupt, backing up and starting fresh");
                let backup = path.with_extension("json.bak");
                if let Err(backup_err) = fs::rename(path, &backup) {
                    warn!(error = %backup_err, "Failed to back up corrupt cache");
                }
                Ok(Self::empty(path))
            }
        }
    }

    /// Save the cache to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize cache")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write cache to {}", self.path.display()))?;

        Ok(())
    }

    /// Cached manager for `dir`.
    pub fn get(&self, dir: &Path) -> Option<PackageManager> {
        self.entries.get(dir).map(|e| e.manager)
    }

    /// Record `manager` for `dir`.
    pub fn set(&mut self, dir: &Path, manager: PackageManager) {
        self.entries.insert(
            dir.to_path_buf(),
            CacheEntry {
                manager,
                updated_at: Utc::now(),
            },
        );
    }

    /// Drop the entry for `dir`.
    pub fn remove(&mut self, dir: &Path) -> bool {
        self.entries.remove(dir).is_some()
    }

    /// File backing this cache.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
