//! Manifest parsing: `package.json` and `deno.json`.
//!
//! Reads here are lenient. A missing manifest is a normal negative result and
//! a malformed one is logged and treated as empty, so one broken file never
//! stops detection or script discovery.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::manager::PackageManager;

/// Parsed package.json structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,

    /// Package manager specification (e.g., "pnpm@8.0.0").
    #[serde(default, rename = "packageManager")]
    pub package_manager: Option<Value>,

    /// Raw scripts object. Non-string values are ignored.
    #[serde(default)]
    pub scripts: Map<String, Value>,

    /// Runtime dependencies.
    #[serde(default)]
    pub dependencies: Map<String, Value>,

    /// Development dependencies.
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: Map<String, Value>,
}

impl Package {
    /// The manager named by the `packageManager` field, if it names a known one.
    pub fn package_manager(&self) -> Option<PackageManager> {
        self.package_manager
            .as_ref()?
            .as_str()
            .and_then(PackageManager::from_package_manager_field)
    }

    /// Script entries in manifest order, skipping `//` comment keys.
    pub fn scripts(&self) -> Vec<(String, String)> {
        self.scripts
            .iter()
            .filter(|(name, _)| !name.starts_with("//"))
            .filter_map(|(name, value)| value.as_str().map(|cmd| (name.clone(), cmd.to_string())))
            .collect()
    }

    /// Names of `dependencies` and `devDependencies`.
    pub fn declared_dependencies(&self) -> BTreeSet<String> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .cloned()
            .collect()
    }
}

/// Parsed deno.json structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DenoConfig {
    /// Task definitions: either a command string or `{ "command": ... }`.
    #[serde(default)]
    pub tasks: Map<String, Value>,
}

impl DenoConfig {
    /// Task entries in manifest order.
    pub fn tasks(&self) -> Vec<(String, String)> {
        self.tasks
            .iter()
            .filter_map(|(name, value)| {
                let command = match value {
                    Value::String(cmd) => Some(cmd.clone()),
                    Value::Object(obj) => obj
                        .get("command")
                        .and_then(Value::as_str)
                        .map(String::from),
                    _ => None,
                };
                command.map(|cmd| (name.clone(), cmd))
            })
            .collect()
    }
}

/// Parse package.json content.
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
///
/// # Examples
///
/// ```
/// use n_pm::package::parse_package_json;
///
/// let pkg = parse_package_json(r#"{"packageManager": "pnpm@9.1.0"}"#).unwrap();
/// assert_eq!(pkg.package_manager().unwrap().to_string(), "pnpm");
/// ```
pub fn parse_package_json(content: &str) -> serde_json::Result<Package> {
    serde_json::from_str(content)
}

/// Read `path` leniently.
///
/// Missing file is `None`; any other failure is logged and also `None`.
async fn read_lenient(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read manifest");
            None
        }
    }
}

/// Load `package.json` from `dir`, swallowing missing and malformed files.
pub async fn load_package(dir: &Path) -> Option<Package> {
    let path = dir.join("package.json");
    let content = read_lenient(&path).await?;
    match parse_package_json(&content) {
        Ok(pkg) => Some(pkg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed manifest");
            None
        }
    }
}

/// Load the script (or task) table of the manifest in `dir`.
///
/// Missing or malformed manifests yield an empty table.
pub async fn load_script_table(pm: PackageManager, dir: &Path) -> Vec<(String, String)> {
    match pm {
        PackageManager::Deno => {
            let path = dir.join(pm.manifest_file());
            let Some(content) = read_lenient(&path).await else {
                return Vec::new();
            };
            match serde_json::from_str::<DenoConfig>(&content) {
                Ok(config) => config.tasks(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring malformed deno.json");
                    Vec::new()
                }
            }
        }
        PackageManager::Npm | PackageManager::Yarn | PackageManager::Pnpm | PackageManager::Bun => {
            load_package(dir)
                .await
                .map(|pkg| pkg.scripts())
                .unwrap_or_default()
        }
    }
}
