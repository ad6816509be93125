//! Path utilities: upward search, existence probes and well-known locations.

use std::io;
use std::path::{Path, PathBuf};

/// Replace backslash separators with forward slashes.
pub fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The directories from a start directory up to the filesystem root.
///
/// The value is cheap to clone and can be iterated any number of times;
/// every iteration yields the same sequence, starting at the start
/// directory and ending at the root (inclusive).
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use n_pm::utils::UpwardPaths;
///
/// let paths: Vec<PathBuf> = UpwardPaths::new("/a/b").iter().collect();
/// assert_eq!(paths, vec![PathBuf::from("/a/b"), PathBuf::from("/a"), PathBuf::from("/")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpwardPaths {
    start: PathBuf,
}

impl UpwardPaths {
    /// Create the sequence for `start`. No I/O is performed.
    pub fn new(start: impl AsRef<Path>) -> Self {
        Self {
            start: PathBuf::from(slash(start.as_ref())),
        }
    }

    /// The normalized start directory.
    pub fn start(&self) -> &Path {
        &self.start
    }

    /// Iterate from the start directory toward the root.
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.start
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    /// Number of directories in the sequence.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when the start path has no components at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a UpwardPaths {
    type Item = PathBuf;
    type IntoIter = Box<dyn Iterator<Item = PathBuf> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Kind constraint for [`probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Must be a regular file.
    File,
    /// Must be a directory.
    Dir,
    /// Anything that exists.
    Any,
}

/// Check whether `path` exists and matches `kind`.
///
/// A missing path is `Ok(false)`. Every other I/O error is returned.
pub async fn probe(path: &Path, kind: EntryKind) -> io::Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(match kind {
            EntryKind::File => meta.is_file(),
            EntryKind::Dir => meta.is_dir(),
            EntryKind::Any => true,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Get the config directory for n.
///
/// Returns `~/.config/n` on Linux.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("n"))
}

/// Get the global config file path.
///
/// Returns `~/.config/n/config.toml`.
pub fn global_config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Get the package manager cache file path.
///
/// Returns `~/.cache/n/pm.json` on Linux.
pub fn pm_cache_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("n").join("pm.json"))
}

/// Get the project config file path, `.nrc.toml` in the given directory.
///
/// The file may not exist.
pub fn local_config_file(project_dir: &Path) -> PathBuf {
    project_dir.join(".nrc.toml")
}
