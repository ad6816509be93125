//! Utility module for n.
//!
//! Path search, filesystem helpers and terminal styling.

mod fs;
mod paths;
mod style;

pub use fs::{empty_dir, ensure_file, remove_if_exists};
pub use paths::{
    config_dir, global_config_file, local_config_file, pm_cache_file, probe, slash, EntryKind,
    UpwardPaths,
};
pub use style::{paint, truncate, use_colors, Style};
