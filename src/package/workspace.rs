//! Monorepo and workspace support.
//!
//! Only pnpm describes workspaces with globs (`pnpm-workspace.yaml`); every
//! other manager works on the root project alone.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::manager::PackageManager;
use crate::utils::slash;

/// A project directory considered for scripts and cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    path: PathBuf,
    is_root: bool,
}

impl Workspace {
    /// The root project.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_root: true,
        }
    }

    /// A member project.
    pub fn member(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_root: false,
        }
    }

    /// Absolute directory of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the root project.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Path of this workspace relative to `root`, with `/` separators.
    ///
    /// Members outside the root fall back to their full path without the
    /// leading separator.
    pub fn label(&self, root: &Path) -> String {
        match self.path.strip_prefix(root) {
            Ok(rel) => slash(rel),
            Err(_) => slash(&self.path).trim_start_matches('/').to_string(),
        }
    }
}

/// pnpm-workspace.yaml structure.
#[derive(Debug, Deserialize)]
struct PnpmWorkspace {
    #[serde(default)]
    packages: Option<Vec<String>>,
}

/// Load the ordered workspace list for `root`.
///
/// Root is always first. For managers without workspace globs, and when the
/// workspace file is missing or malformed, the result is `[root]`.
pub async fn load_workspaces(manager: PackageManager, root: &Path) -> Vec<Workspace> {
    let mut workspaces = vec![Workspace::root(root)];

    let Some(file_name) = manager.workspace_file() else {
        return workspaces;
    };

    let file = root.join(file_name);
    let content = match tokio::fs::read_to_string(&file).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return workspaces,
        Err(e) => {
            warn!(path = %file.display(), error = %e, "Failed to read workspace file");
            return workspaces;
        }
    };

    let patterns = match serde_yaml::from_str::<PnpmWorkspace>(&content) {
        Ok(config) => config.packages.unwrap_or_default(),
        Err(e) => {
            warn!(path = %file.display(), error = %e, "Ignoring malformed workspace file");
            return workspaces;
        }
    };

    let mut seen: HashSet<PathBuf> = HashSet::new();
    seen.insert(normalize(root));

    for dir in resolve_workspace_patterns(root, &patterns) {
        let dir = normalize(&dir);
        if seen.insert(dir.clone()) {
            workspaces.push(Workspace::member(dir));
        }
    }

    debug!(count = workspaces.len(), "Loaded workspaces");
    workspaces
}

/// Resolve workspace entries to directories, in pattern order.
///
/// `!pattern` entries remove matching directories from the result. Glob
/// matches are kept whether or not they carry a manifest, like plain entries.
fn resolve_workspace_patterns(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    let exclusions: Vec<glob::Pattern> = patterns
        .iter()
        .filter_map(|p| p.strip_prefix('!'))
        .filter_map(|p| glob::Pattern::new(&anchor(root, p)).ok())
        .collect();

    for pattern in patterns {
        if pattern.starts_with('!') {
            continue;
        }

        let candidate = Path::new(pattern);
        if !is_glob(pattern) {
            if candidate.is_absolute() {
                dirs.push(candidate.to_path_buf());
            } else {
                dirs.push(root.join(candidate));
            }
            continue;
        }

        match glob::glob(&anchor(root, pattern)) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    if entry.is_dir() && !is_inside_node_modules(&entry) {
                        dirs.push(entry);
                    }
                }
            }
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Invalid workspace glob");
            }
        }
    }

    dirs.retain(|dir| !exclusions.iter().any(|ex| ex.matches_path(&normalize(dir))));
    dirs
}

/// Join a workspace pattern onto `root` as a glob string.
///
/// The root is escaped so that brackets or wildcards in directory names
/// match literally; absolute patterns are used unchanged.
fn anchor(root: &Path, pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./");
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let root = glob::Pattern::escape(&slash(root));
    format!("{}/{}", root.trim_end_matches('/'), pattern)
}

/// Whether `pattern` contains glob wildcards.
fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn is_inside_node_modules(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "node_modules")
}

/// Drop `.` components so equal directories compare and print equally.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}
