//! Configuration module for n.
//!
//! Handles loading and merging configuration from multiple sources:
//! - CLI `--config <path>` (highest priority)
//! - Project-level `.nrc.toml`
//! - User-level `~/.config/n/config.toml`

pub mod file;
mod types;

pub use file::{load_config, load_config_from_path};
pub use types::{CacheConfig, CleanConfig, Config, GeneralConfig, ScanConfig, DEFAULT_CLEAN_DIRS};
