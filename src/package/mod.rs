//! Package module for n.
//!
//! Package manager detection, manifest parsing, workspace discovery, the
//! script registry and translation of actions into package manager argv.

mod detect;
mod manager;
mod manifest;
mod registry;
mod translate;
mod workspace;

pub use detect::{detect, Detection, DetectionSource, Detector};
pub use manager::PackageManager;
pub use manifest::{load_package, load_script_table, parse_package_json, DenoConfig, Package};
pub use registry::{visible_name, Registry, ScriptEntry};
pub use translate::{format_flag, translate, Action, InstallOptions};
pub use workspace::{load_workspaces, Workspace};
