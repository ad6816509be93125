//! Configuration type definitions.
//!
//! Every value is optional so that merging only overrides what a file
//! actually sets.

use serde::{Deserialize, Serialize};

use crate::extract::{ScanOptions, DEFAULT_EXTENSIONS, DEFAULT_SKIP};
use crate::package::PackageManager;

/// Cache directories emptied by `clean` and `reinstall`, relative to each workspace.
pub const DEFAULT_CLEAN_DIRS: &[&str] = &[
    "node_modules/.cache",
    "node_modules/.vite",
    ".nuxt",
    ".output",
];

/// General configuration settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Override package manager detection.
    #[serde(default)]
    pub manager: Option<PackageManager>,
}

/// Persisted detection cache settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Remember the detected manager per working directory.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// `clean` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanConfig {
    /// Directories to empty, relative to each workspace or absolute.
    #[serde(default)]
    pub dirs: Option<Vec<String>>,
}

/// `scan` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Source extensions to read.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Directory names to skip.
    #[serde(default)]
    pub skip: Option<Vec<String>>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub clean: CleanConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Merge another config into this one (other takes precedence for set values).
    pub fn merge(&mut self, other: Config) {
        if other.general.manager.is_some() {
            self.general.manager = other.general.manager;
        }
        if other.cache.enabled.is_some() {
            self.cache.enabled = other.cache.enabled;
        }
        if other.clean.dirs.is_some() {
            self.clean.dirs = other.clean.dirs;
        }
        if other.scan.extensions.is_some() {
            self.scan.extensions = other.scan.extensions;
        }
        if other.scan.skip.is_some() {
            self.scan.skip = other.scan.skip;
        }
    }

    /// Whether the detection cache is enabled (off by default).
    pub fn cache_enabled(&self) -> bool {
        self.cache.enabled.unwrap_or(false)
    }

    /// Directories for `clean`, falling back to [`DEFAULT_CLEAN_DIRS`].
    pub fn clean_dirs(&self) -> Vec<String> {
        self.clean
            .dirs
            .clone()
            .unwrap_or_else(|| DEFAULT_CLEAN_DIRS.iter().map(|s| s.to_string()).collect())
    }

    /// Extractor options with configured overrides applied.
    pub fn scan_options(&self) -> ScanOptions {
        let strings = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        ScanOptions {
            extensions: self
                .scan
                .extensions
                .clone()
                .unwrap_or_else(|| strings(DEFAULT_EXTENSIONS)),
            skip: self
                .scan
                .skip
                .clone()
                .unwrap_or_else(|| strings(DEFAULT_SKIP)),
        }
    }
}
