//! n - one command for every Node package manager
//!
//! Detects whether a project uses npm, yarn, pnpm, bun or deno and
//! translates a small set of commands into the right invocation for it.
//!
//! # Features
//!
//! - **Detection**: lockfiles and the `packageManager` field, walking up
//!   from the working directory
//! - **Workspaces**: scripts from every workspace member, addressable by
//!   name or index
//! - **Signals**: Ctrl-C reaches the child and `n` exits once it is gone
//! - **Scan**: finds imported packages missing from `package.json`
//!
//! # Modules
//!
//! - [`cache`] - Persisted package manager per directory
//! - [`cli`] - Command-line interface argument parsing
//! - [`commands`] - Subcommand handlers
//! - [`config`] - Configuration file loading and types
//! - [`context`] - Project resolved for one invocation
//! - [`error`] - Error types and exit codes
//! - [`extract`] - Import scanning
//! - [`logging`] - Diagnostic output
//! - [`package`] - Detection, manifests, workspaces, scripts, translation
//! - [`runner`] - Child process execution
//! - [`utils`] - Path, filesystem and styling helpers
//!
//! # Example
//!
//! ```no_run
//! use n_pm::package::{translate, Action, PackageManager};
//!
//! let argv = translate(PackageManager::Yarn, &Action::run("dev"));
//! assert_eq!(argv, ["yarn", "run", "dev"]);
//! ```

/// Persisted package manager cache.
pub mod cache;

/// CLI argument definitions.
pub mod cli;

/// Subcommand handlers.
pub mod commands;

/// Configuration system for loading and merging settings.
pub mod config;

/// Project context for one invocation.
pub mod context;

/// Error types and result helpers.
pub mod error;

/// Import specifier extraction.
pub mod extract;

/// Logging setup.
pub mod logging;

/// Package managers, manifests and scripts.
pub mod package;

/// Child process execution.
pub mod runner;

/// Path, filesystem and styling utilities.
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use context::Project;
pub use error::{NError, Result};
pub use package::{Action, PackageManager, Registry};
