//! Configuration file loading and parsing.

use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::types::Config;
use crate::error::NError;
use crate::utils::{global_config_file, local_config_file};

fn parse_config(path: &Path, content: &str) -> Result<Config, NError> {
    toml::from_str(content).map_err(|e| NError::InvalidConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration from the specified path.
///
/// # Errors
///
/// Returns [`NError::InvalidConfig`] if the file cannot be read or parsed.
pub async fn load_config_from_path(path: &Path) -> Result<Config, NError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| NError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    parse_config(path, &content)
}

/// Merge `path` into `config` if it exists, warning instead of failing.
async fn merge_optional(config: &mut Config, path: &Path) {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
            return;
        }
    };
    match parse_config(path, &content) {
        Ok(found) => {
            debug!(path = %path.display(), "Loaded config");
            config.merge(found);
        }
        Err(e) => warn!("Ignoring config: {e}"),
    }
}

/// Load configuration with proper priority and merging.
///
/// Searches for config files in order of priority (lowest to highest):
/// 1. `<config_dir>/n/config.toml` (user-level)
/// 2. `.nrc.toml` in the working directory
/// 3. `--config <path>`
///
/// Missing or broken default files are skipped with a warning.
///
/// # Errors
///
/// Returns an error only when the explicitly given file cannot be read or
/// parsed.
pub async fn load_config(cli_config_path: Option<&Path>, project_dir: &Path) -> Result<Config, NError> {
    let mut config = Config::default();

    if let Some(user_config_path) = global_config_file() {
        merge_optional(&mut config, &user_config_path).await;
    }

    merge_optional(&mut config, &local_config_file(project_dir)).await;

    if let Some(cli_path) = cli_config_path {
        config.merge(load_config_from_path(cli_path).await?);
    }

    Ok(config)
}
