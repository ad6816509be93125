//! Dependency extraction.
//!
//! Scans source files for imported packages and compares them against what a
//! manifest declares.

mod scan;
mod specifier;

pub use scan::{
    declared_deps, extract_deps, extract_deps_with, missing_deps, source_files, ScanOptions,
    DEFAULT_EXTENSIONS, DEFAULT_SKIP,
};
pub use specifier::{
    filter_specifiers, is_builtin, RegexExtractor, SpecifierExtractor, BUILTIN_MODULES,
};
