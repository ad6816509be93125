//! Small async filesystem helpers.

use std::io;
use std::path::Path;

use tokio::fs;

/// Remove everything inside `dir`, keeping the directory itself.
///
/// Creates the directory if it does not exist.
pub async fn empty_dir(dir: &Path) -> io::Result<()> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return fs::create_dir_all(dir).await;
        }
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            fs::remove_dir_all(&path).await?;
        } else {
            fs::remove_file(&path).await?;
        }
    }

    Ok(())
}

/// Create `path` as an empty file unless it already exists.
///
/// Parent directories are created as needed.
pub async fn ensure_file(path: &Path) -> io::Result<()> {
    if fs::metadata(path).await.is_ok() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, b"").await
}

/// Remove a file, treating a missing file as success.
pub async fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
