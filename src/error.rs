//! Custom error types for n.
//!
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for n.
pub mod exit_code {
    /// Success.
    pub const SUCCESS: i32 = 0;
    /// General error.
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid configuration.
    pub const INVALID_CONFIG: i32 = 5;
    /// The package manager executable is not on PATH.
    pub const EXECUTABLE_NOT_FOUND: i32 = 127;
    /// Interrupted (Ctrl+C).
    pub const INTERRUPTED: i32 = 130;
}

/// Main error type for n.
#[derive(Error, Debug)]
pub enum NError {
    /// The requested package manager binary is not installed.
    #[error("Executable '{name}' was not found on PATH\n\nTip: Install {name} or pick another package manager with 'n switch <pm>'.")]
    ExecutableNotFound {
        name: String,
        #[source]
        source: which::Error,
    },

    /// Script not found.
    #[error("Script '{name}' not found\n\nRun 'n ls' to see all available scripts.")]
    ScriptNotFound { name: String },

    /// Script not found with suggestions.
    #[error("Script '{name}' not found\n\nDid you mean: {suggestions}?\n\nRun 'n ls' to see all available scripts.")]
    ScriptNotFoundWithSuggestions { name: String, suggestions: String },

    /// Failed to parse a manifest that the command cannot do without.
    #[error("Failed to parse {path}: {source}")]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration file.
    #[error("Invalid config at {path}:\n  {message}\n\nTip: Check the config file syntax and ensure all values are valid.")]
    InvalidConfig { path: PathBuf, message: String },

    /// IO error with path context.
    #[error("Failed to {operation} '{path}': {source}")]
    IoWithContext {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            NError::ExecutableNotFound { .. } => exit_code::EXECUTABLE_NOT_FOUND,
            NError::ScriptNotFound { .. } => exit_code::GENERAL_ERROR,
            NError::ScriptNotFoundWithSuggestions { .. } => exit_code::GENERAL_ERROR,
            NError::InvalidManifest { .. } => exit_code::GENERAL_ERROR,
            NError::InvalidConfig { .. } => exit_code::INVALID_CONFIG,
            NError::IoWithContext { .. } => exit_code::GENERAL_ERROR,
            NError::Io(_) => exit_code::GENERAL_ERROR,
        }
    }

    /// Wrap an IO error with the operation and path that caused it.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NError::IoWithContext {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a script not found error with suggestions based on available scripts.
    pub fn script_not_found_with_suggestions(name: &str, scripts: &[&str]) -> Self {
        let suggestions = find_similar_scripts(name, scripts);
        if suggestions.is_empty() {
            NError::ScriptNotFound {
                name: name.to_string(),
            }
        } else {
            NError::ScriptNotFoundWithSuggestions {
                name: name.to_string(),
                suggestions: suggestions.join(", "),
            }
        }
    }
}

/// Find similar script names using simple string distance.
fn find_similar_scripts(name: &str, scripts: &[&str]) -> Vec<String> {
    let name_lower = name.to_lowercase();
    let mut matches: Vec<(String, usize)> = scripts
        .iter()
        .filter_map(|&s| {
            let s_lower = s.to_lowercase();
            let dist = simple_distance(&name_lower, &s_lower);
            if dist <= 2 || s_lower.contains(&name_lower) {
                Some((s.to_string(), dist))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by_key(|(_, d)| *d);

    matches
        .into_iter()
        .take(3)
        .map(|(s, _)| format!("'{}'", s))
        .collect()
}

/// Levenshtein distance over chars.
fn simple_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Result type alias for n operations.
pub type Result<T> = std::result::Result<T, NError>;
