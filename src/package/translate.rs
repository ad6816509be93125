//! Translation of high-level actions into package manager argv.
//!
//! Every rule matches exhaustively on [`PackageManager`], so adding a manager
//! fails to compile until each action handles it.

use super::manager::PackageManager;

/// Something the user asked the package manager to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Install the project, or add `deps` when non-empty.
    Install {
        deps: Vec<String>,
        flags: Vec<String>,
    },
    /// Remove `deps`.
    Uninstall { deps: Vec<String> },
    /// Run a script or task, passing `args` through.
    Run { script: String, args: Vec<String> },
}

impl Action {
    /// Bare install with no extra dependencies or flags.
    pub fn install() -> Self {
        Action::Install {
            deps: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Run `script` without extra arguments.
    pub fn run(script: impl Into<String>) -> Self {
        Action::Run {
            script: script.into(),
            args: Vec::new(),
        }
    }
}

/// Produce the full argv (executable first) for `action` under `manager`.
///
/// # Examples
///
/// ```
/// use n_pm::package::{translate, Action, PackageManager};
///
/// let argv = translate(PackageManager::Yarn, &Action::install());
/// assert_eq!(argv, vec!["yarn"]);
///
/// let argv = translate(PackageManager::Npm, &Action::run("dev"));
/// assert_eq!(argv, vec!["npm", "run", "dev"]);
/// ```
pub fn translate(manager: PackageManager, action: &Action) -> Vec<String> {
    match action {
        Action::Install { deps, flags } => install(manager, deps, flags),
        Action::Uninstall { deps } => uninstall(manager, deps),
        Action::Run { script, args } => run(manager, script, args),
    }
}

fn install(manager: PackageManager, deps: &[String], flags: &[String]) -> Vec<String> {
    let mut argv = vec![manager.executable().to_string()];

    let verb = match manager {
        PackageManager::Yarn if deps.is_empty() => None,
        PackageManager::Yarn => Some("add"),
        PackageManager::Npm | PackageManager::Pnpm | PackageManager::Bun | PackageManager::Deno => {
            Some("install")
        }
    };

    argv.extend(verb.map(String::from));
    argv.extend(deps.iter().cloned());
    argv.extend(flags.iter().cloned());
    argv
}

fn uninstall(manager: PackageManager, deps: &[String]) -> Vec<String> {
    let verb = match manager {
        PackageManager::Npm => "uninstall",
        PackageManager::Yarn | PackageManager::Pnpm | PackageManager::Bun | PackageManager::Deno => {
            "remove"
        }
    };

    let mut argv = vec![manager.executable().to_string(), verb.to_string()];
    argv.extend(deps.iter().cloned());
    argv
}

fn run(manager: PackageManager, script: &str, args: &[String]) -> Vec<String> {
    let verb = match manager {
        PackageManager::Deno => "task",
        PackageManager::Npm | PackageManager::Yarn | PackageManager::Pnpm | PackageManager::Bun => {
            "run"
        }
    };

    let mut argv = vec![
        manager.executable().to_string(),
        verb.to_string(),
        script.to_string(),
    ];
    if !args.is_empty() {
        argv.push("--".to_string());
        argv.extend(args.iter().cloned());
    }
    argv
}

/// Turn an option name into a command-line flag.
///
/// `dev` and `prod` always become `-D` and `-P`. Names that already start
/// with `-` pass through; anything else is kebab-cased behind `--`.
pub fn format_flag(name: &str) -> String {
    match name {
        "dev" => "-D".to_string(),
        "prod" => "-P".to_string(),
        _ if name.starts_with('-') => name.to_string(),
        _ => format!("--{}", kebab_case(name)),
    }
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    out
}

/// Install options accepted by `n install`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub global: bool,
    pub dir: Option<String>,
    pub prod: bool,
    pub dev: bool,
    pub workspace_root: bool,
    pub recursive: bool,
    pub force: bool,
}

impl InstallOptions {
    /// Flags for the selected options, followed by `--dir=<dir>` when set.
    pub fn flags(&self) -> Vec<String> {
        let selected = [
            ("global", self.global),
            ("prod", self.prod),
            ("dev", self.dev),
            ("workspaceRoot", self.workspace_root),
            ("recursive", self.recursive),
            ("force", self.force),
        ];

        let mut flags: Vec<String> = selected
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| format_flag(name))
            .collect();

        if let Some(dir) = &self.dir {
            flags.push(format!("--dir={dir}"));
        }
        flags
    }
}
