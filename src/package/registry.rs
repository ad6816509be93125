//! Flattened script/task registry across workspaces.
//!
//! Root scripts keep their key. Member scripts are published as
//! `{relative:path}:{key}`. When two entries produce the same name the one
//! from the earlier workspace wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures_util::future::join_all;

use super::manager::PackageManager;
use super::manifest::load_script_table;
use super::workspace::Workspace;

/// One runnable script or task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    name: String,
    key: String,
    command: String,
    dir: PathBuf,
    workspace: String,
}

impl ScriptEntry {
    /// Externally visible, unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key in the owning manifest (what the package manager runs).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Literal command text, for display.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Owning workspace directory, used as the working directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Workspace label relative to root; empty for the root project.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Whether the script belongs to the root project.
    pub fn is_root(&self) -> bool {
        self.workspace.is_empty()
    }
}

/// Compute the visible name for `key` in a workspace labelled `label`.
///
/// # Examples
///
/// ```
/// use n_pm::package::visible_name;
///
/// assert_eq!(visible_name("", "build"), "build");
/// assert_eq!(visible_name("packages/web", "build"), "packages:web:build");
/// ```
pub fn visible_name(label: &str, key: &str) -> String {
    if label.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", label.replace('/', ":"), key)
    }
}

/// Collection of scripts from every workspace, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<ScriptEntry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load script tables for every workspace and merge them.
    ///
    /// Manifests are read concurrently; the merge follows workspace order.
    pub async fn load(manager: PackageManager, root: &Path, workspaces: &[Workspace]) -> Self {
        let tables = join_all(
            workspaces
                .iter()
                .map(|ws| load_script_table(manager, ws.path())),
        )
        .await;

        Self::from_tables(root, workspaces.iter().zip(tables))
    }

    /// Merge already-loaded tables, first-seen name wins.
    pub fn from_tables<'a, I>(root: &Path, tables: I) -> Self
    where
        I: IntoIterator<Item = (&'a Workspace, Vec<(String, String)>)>,
    {
        let mut registry = Self::new();
        let mut seen = HashSet::new();

        for (workspace, table) in tables {
            let label = if workspace.is_root() {
                String::new()
            } else {
                workspace.label(root)
            };

            for (key, command) in table {
                let name = visible_name(&label, &key);
                if !seen.insert(name.clone()) {
                    continue;
                }
                registry.entries.push(ScriptEntry {
                    name,
                    key,
                    command,
                    dir: workspace.path().to_path_buf(),
                    workspace: label.clone(),
                });
            }
        }

        registry
    }

    /// Get a script by visible name.
    pub fn get(&self, name: &str) -> Option<&ScriptEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Get a script by visible name, or by registry index when no name matches.
    pub fn resolve(&self, name_or_index: &str) -> Option<&ScriptEntry> {
        self.get(name_or_index).or_else(|| {
            name_or_index
                .parse::<usize>()
                .ok()
                .and_then(|i| self.entries.get(i))
        })
    }

    /// Get the number of scripts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an iterator over the scripts.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.entries.iter()
    }

    /// Visible names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ScriptEntry;
    type IntoIter = std::slice::Iter<'a, ScriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
