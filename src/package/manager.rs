//! Package manager kinds and their fixed lockfile mapping.

use serde::{Deserialize, Serialize};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// Node Package Manager (npm)
    #[default]
    Npm,
    /// Yarn package manager
    Yarn,
    /// pnpm - Fast, disk space efficient package manager
    Pnpm,
    /// Bun - Fast all-in-one JavaScript runtime
    Bun,
    /// Deno - runtime with its own task runner
    Deno,
}

impl PackageManager {
    /// Lockfiles in the order they are checked within one directory.
    pub const LOCK_PRIORITY: [PackageManager; 5] = [
        PackageManager::Bun,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Npm,
        PackageManager::Deno,
    ];

    /// Get the executable name for this package manager.
    pub fn executable(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
            PackageManager::Deno => "deno",
        }
    }

    /// Get the lock file name for this package manager.
    pub fn lock_file(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
            PackageManager::Pnpm => "pnpm-lock.yaml",
            PackageManager::Bun => "bun.lockb",
            PackageManager::Deno => "deno.lock",
        }
    }

    /// Reverse lookup of [`PackageManager::lock_file`].
    pub fn from_lock_file(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|pm| pm.lock_file() == name)
    }

    /// The manifest holding this manager's scripts or tasks.
    pub fn manifest_file(&self) -> &'static str {
        match self {
            PackageManager::Deno => "deno.json",
            PackageManager::Npm
            | PackageManager::Yarn
            | PackageManager::Pnpm
            | PackageManager::Bun => "package.json",
        }
    }

    /// Workspace glob file, for managers that have one.
    pub fn workspace_file(&self) -> Option<&'static str> {
        match self {
            PackageManager::Pnpm => Some("pnpm-workspace.yaml"),
            PackageManager::Npm
            | PackageManager::Yarn
            | PackageManager::Bun
            | PackageManager::Deno => None,
        }
    }

    /// Get all supported package managers.
    pub fn all() -> &'static [PackageManager] {
        &[
            PackageManager::Npm,
            PackageManager::Yarn,
            PackageManager::Pnpm,
            PackageManager::Bun,
            PackageManager::Deno,
        ]
    }

    /// Parse a `packageManager` manifest value such as `pnpm@8.0.0`.
    ///
    /// Handles formats like:
    /// - "pnpm@8.0.0"
    /// - "yarn@4.0.0+sha256.abc123"
    /// - "npm"
    pub fn from_package_manager_field(value: &str) -> Option<Self> {
        let name = value.split('@').next()?;
        name.trim().parse().ok()
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.executable())
    }
}

impl std::str::FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            "bun" => Ok(PackageManager::Bun),
            "deno" => Ok(PackageManager::Deno),
            _ => Err(format!(
                "Unknown package manager: '{s}'. Valid options are: npm, yarn, pnpm, bun, deno"
            )),
        }
    }
}
