//! Cache module for n.
//!
//! Remembers the package manager detected per working directory across
//! invocations, when enabled in configuration.

mod storage;

pub use storage::{CacheEntry, PmCache};
