//! Request-scoped project context.
//!
//! Everything a command needs to know about the working directory is
//! resolved once per invocation and passed down explicitly.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::PmCache;
use crate::config::Config;
use crate::package::{load_workspaces, Detection, Detector, PackageManager, Registry, Workspace};

/// The project rooted at the working directory.
#[derive(Debug, Clone)]
pub struct Project {
    cwd: PathBuf,
    detection: Detection,
    workspaces: Vec<Workspace>,
    registry: Registry,
}

impl Project {
    /// Resolve the manager, workspaces and scripts for `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error when probing for lockfiles fails with anything other
    /// than not-found.
    pub async fn load(
        cwd: impl Into<PathBuf>,
        cli_manager: Option<PackageManager>,
        config: &Config,
    ) -> io::Result<Self> {
        let cwd = cwd.into();
        let detection = resolve_manager(&cwd, cli_manager, config).await?;
        let workspaces = load_workspaces(detection.manager, &cwd).await;
        let registry = Registry::load(detection.manager, &cwd, &workspaces).await;

        debug!(
            manager = %detection,
            workspaces = workspaces.len(),
            scripts = registry.len(),
            "Project loaded"
        );

        Ok(Self {
            cwd,
            detection,
            workspaces,
            registry,
        })
    }

    /// Working directory (and workspace root).
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The package manager in use.
    pub fn manager(&self) -> PackageManager {
        self.detection.manager
    }

    /// How the package manager was chosen.
    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    /// Workspaces, root first.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Scripts across all workspaces.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Lockfile of the current manager in the working directory.
    pub fn lock_file(&self) -> PathBuf {
        self.cwd.join(self.manager().lock_file())
    }
}

/// Detector for this run, backed by the persisted cache when enabled.
pub fn open_detector(config: &Config) -> Detector {
    if !config.cache_enabled() {
        return Detector::new();
    }
    match PmCache::load() {
        Ok(store) => Detector::with_store(store),
        Err(e) => {
            warn!(error = %e, "Package manager cache unavailable");
            Detector::new()
        }
    }
}

/// Choose the package manager: `--pm`, then configuration, then detection.
pub async fn resolve_manager(
    cwd: &Path,
    cli_manager: Option<PackageManager>,
    config: &Config,
) -> io::Result<Detection> {
    if let Some(manager) = cli_manager {
        return Ok(Detection::overridden(manager, "--pm flag"));
    }
    if let Some(manager) = config.general.manager {
        return Ok(Detection::overridden(manager, "config"));
    }
    open_detector(config).detect(cwd).await
}
