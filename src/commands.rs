//! Subcommand handlers.
//!
//! Each handler returns the exit code the binary should finish with; errors
//! are left for `main` to report.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::cli::ScriptArgs;
use crate::config::Config;
use crate::context::{open_detector, Project};
use crate::error::{exit_code, NError};
use crate::extract::{declared_deps, extract_deps, missing_deps};
use crate::package::{load_package, translate, Action, PackageManager, Registry, Workspace};
use crate::runner::{self, Outcome};
use crate::utils::{
    empty_dir, ensure_file, paint, probe, remove_if_exists, slash, truncate, use_colors, EntryKind, Style,
};

/// Report how a child ended and turn it into an exit code.
fn finish(outcome: Outcome) -> i32 {
    let colors = use_colors();
    match outcome {
        Outcome::Interrupted => {
            eprintln!("{}", paint(Style::Yellow, "The task was manually interrupted", colors));
        }
        Outcome::Exited(code) if code != 0 => {
            eprintln!("{}", paint(Style::Red, "Task execution failed", colors));
        }
        Outcome::Exited(_) => {}
    }
    outcome.code()
}

async fn spawn(argv: Vec<String>, cwd: &Path, dry_run: bool) -> Result<i32> {
    let outcome = runner::run(&argv, cwd, dry_run).await?;
    Ok(finish(outcome))
}

/// `n install [deps...] [flags...]`.
pub async fn install(
    project: &Project,
    deps: Vec<String>,
    flags: Vec<String>,
    dry_run: bool,
) -> Result<i32> {
    let argv = translate(project.manager(), &Action::Install { deps, flags });
    spawn(argv, project.cwd(), dry_run).await
}

/// `n uninstall <deps...>`.
pub async fn uninstall(project: &Project, deps: Vec<String>, dry_run: bool) -> Result<i32> {
    let argv = translate(project.manager(), &Action::Uninstall { deps });
    spawn(argv, project.cwd(), dry_run).await
}

/// Resolve a configured clean entry against a workspace directory.
fn resolve_clean_dir(workspace: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        workspace.join(dir)
    }
}

/// Empty existing `dirs` inside one workspace, in order.
async fn clean_workspace(workspace: &Workspace, dirs: &[String], dry_run: bool) -> io::Result<Vec<PathBuf>> {
    let mut cleaned = Vec::new();
    for dir in dirs.iter().filter(|d| !d.is_empty()) {
        let target = resolve_clean_dir(workspace.path(), dir);
        if !probe(&target, EntryKind::Dir).await? {
            continue;
        }
        if !dry_run {
            empty_dir(&target).await?;
        }
        cleaned.push(target);
    }
    Ok(cleaned)
}

/// Empty `dirs` in every workspace; workspaces are cleaned concurrently.
///
/// Prints one `√ clean <dir>` line per emptied directory, in workspace order.
pub async fn clean_workspaces(workspaces: &[Workspace], dirs: &[String], dry_run: bool) -> Result<()> {
    let results = join_all(
        workspaces
            .iter()
            .map(|ws| clean_workspace(ws, dirs, dry_run)),
    )
    .await;

    let colors = use_colors();
    let label = if dry_run { "Would clean" } else { "√ clean" };
    for (workspace, result) in workspaces.iter().zip(results) {
        let cleaned = result
            .with_context(|| format!("Failed to clean {}", workspace.path().display()))?;
        for dir in cleaned {
            println!(
                "{} {}",
                paint(Style::Green, label, colors),
                paint(Style::Dim, &slash(&dir), colors)
            );
        }
    }
    Ok(())
}

/// `n clean`.
pub async fn clean(project: &Project, config: &Config, dry_run: bool) -> Result<i32> {
    clean_workspaces(project.workspaces(), &config.clean_dirs(), dry_run).await?;
    Ok(exit_code::SUCCESS)
}

/// Clean caches plus `node_modules` everywhere, then install.
async fn clean_and_install(project: &Project, config: &Config, dry_run: bool) -> Result<i32> {
    let mut dirs = config.clean_dirs();
    dirs.push("node_modules".to_string());
    clean_workspaces(project.workspaces(), &dirs, dry_run).await?;
    install(project, Vec::new(), Vec::new(), dry_run).await
}

/// `n reinstall [--with-lock]`.
pub async fn reinstall(project: &Project, config: &Config, with_lock: bool, dry_run: bool) -> Result<i32> {
    if with_lock {
        let lock = project.lock_file();
        let present = probe(&lock, EntryKind::File)
            .await
            .map_err(|e| NError::io("read", &lock, e))?;
        if present {
            if dry_run {
                println!("Would empty {}", slash(&lock));
            } else {
                tokio::fs::write(&lock, b"")
                    .await
                    .map_err(|e| NError::io("empty", &lock, e))?;
                debug!(lock = %lock.display(), "Emptied lockfile");
            }
        }
    }
    clean_and_install(project, config, dry_run).await
}

/// `n switch <pm>`: replace the current lockfile with an empty one for `to`.
pub async fn switch(project: &Project, config: &Config, to: PackageManager, dry_run: bool) -> Result<i32> {
    let from = project.manager();
    let colors = use_colors();

    if from == to {
        println!("Already using {}", paint(Style::Green, to.executable(), colors));
        return Ok(exit_code::SUCCESS);
    }

    let old_lock = project.lock_file();
    let new_lock = project.cwd().join(to.lock_file());

    if dry_run {
        println!("Would remove {}", slash(&old_lock));
        println!("Would create {}", slash(&new_lock));
        return Ok(exit_code::SUCCESS);
    }

    remove_if_exists(&old_lock)
        .await
        .map_err(|e| NError::io("remove", &old_lock, e))?;
    ensure_file(&new_lock)
        .await
        .map_err(|e| NError::io("create", &new_lock, e))?;

    if config.cache_enabled() {
        let mut detector = open_detector(config);
        detector.forget(project.cwd());
        if let Some(store) = detector.store_mut() {
            store.set(project.cwd(), to);
            if let Err(e) = store.save() {
                warn!(error = %e, "Failed to update package manager cache");
            }
        }
    }

    if let Some(pinned) = load_package(project.cwd()).await.and_then(|p| p.package_manager()) {
        if pinned != to {
            warn!("package.json still pins packageManager to {pinned}");
        }
    }

    println!(
        "{} {} -> {}",
        paint(Style::Green, "√ switch", colors),
        from,
        paint(Style::Green, to.executable(), colors)
    );
    Ok(exit_code::SUCCESS)
}

/// `n init <pm>`: create the lockfile and an empty manifest when needed.
pub async fn init(cwd: &Path, manager: PackageManager, dry_run: bool) -> Result<i32> {
    let lock = cwd.join(manager.lock_file());
    let manifest = cwd.join("package.json");

    if dry_run {
        println!("Would create {}", slash(&lock));
        return Ok(exit_code::SUCCESS);
    }

    let (lock_result, manifest_result) = tokio::join!(ensure_file(&lock), init_manifest(&manifest));
    lock_result.map_err(|e| NError::io("create", &lock, e))?;
    manifest_result?;

    println!(
        "{} {}",
        paint(Style::Green, "√ init", use_colors()),
        manager
    );
    Ok(exit_code::SUCCESS)
}

/// Write `{}` to a missing or empty manifest; report a malformed one.
async fn init_manifest(path: &Path) -> Result<(), NError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(NError::io("read", path, e)),
    };

    if content.trim().is_empty() {
        return tokio::fs::write(path, "{}")
            .await
            .map_err(|e| NError::io("write", path, e));
    }

    serde_json::from_str::<serde_json::Value>(&content)
        .map(|_| ())
        .map_err(|source| NError::InvalidManifest {
            path: path.to_path_buf(),
            source,
        })
}

/// `n scan [dir] [--install [-D]]`.
pub async fn scan(
    project: &Project,
    config: &Config,
    dir: Option<&Path>,
    install_missing: bool,
    dev: bool,
    dry_run: bool,
) -> Result<i32> {
    let dir = match dir {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) => project.cwd().join(d),
        None => project.cwd().to_path_buf(),
    };

    let found = extract_deps(&dir, &config.scan_options())
        .await
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let declared = declared_deps(&project.cwd().join("package.json")).await?;
    let missing = missing_deps(&found, &declared);

    let colors = use_colors();
    if missing.is_empty() {
        println!("{}", paint(Style::Green, "√ every imported package is declared", colors));
        return Ok(exit_code::SUCCESS);
    }

    for name in &missing {
        println!("{} {}", paint(Style::Yellow, "+", colors), name);
    }

    if !install_missing {
        return Ok(exit_code::SUCCESS);
    }

    let flags = if dev { vec!["-D".to_string()] } else { Vec::new() };
    install(project, missing, flags, dry_run).await
}

/// Render the registry as an aligned table.
pub fn format_listing(registry: &Registry, colors: bool) -> String {
    let width = registry
        .iter()
        .map(|s| s.name().chars().count())
        .max()
        .unwrap_or(0)
        .min(40);
    let index_width = registry.len().saturating_sub(1).to_string().len();

    let mut out = String::new();
    for (i, script) in registry.iter().enumerate() {
        let name = format!("{:width$}", script.name(), width = width);
        let mut line = format!(
            "  {:>iw$}  {}  {}",
            i,
            paint(Style::Green, &name, colors),
            paint(Style::Dim, &truncate(script.command(), 60), colors),
            iw = index_width
        );
        if !script.is_root() {
            line.push_str(&format!(
                "  {}",
                paint(Style::Yellow, &format!("-> {}", script.workspace()), colors)
            ));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `n ls`.
pub fn list(project: &Project) -> Result<i32> {
    let colors = use_colors();
    let registry = project.registry();

    if registry.is_empty() {
        println!("No scripts found ({})", project.manager());
        return Ok(exit_code::SUCCESS);
    }

    println!(
        "{}",
        paint(
            Style::Cyan,
            &format!("Available scripts ({}):", project.manager()),
            colors
        )
    );
    print!("{}", format_listing(registry, colors));
    Ok(exit_code::SUCCESS)
}

/// Help section listing every script, appended to `n --help`.
pub fn scripts_help(registry: &Registry) -> String {
    if registry.is_empty() {
        return String::new();
    }
    format!("Scripts:\n{}", format_listing(registry, false))
}

/// `n <script> [-i | -r] [-- args...]`.
pub async fn run_script(
    project: &Project,
    config: &Config,
    script: &ScriptArgs,
    dry_run: bool,
) -> Result<i32> {
    let registry = project.registry();
    let entry = registry.resolve(&script.name).ok_or_else(|| {
        NError::script_not_found_with_suggestions(&script.name, &registry.names())
    })?;

    let prepared = if script.install {
        install(project, Vec::new(), Vec::new(), dry_run).await?
    } else if script.reinstall {
        clean_and_install(project, config, dry_run).await?
    } else {
        exit_code::SUCCESS
    };
    if prepared != exit_code::SUCCESS {
        return Ok(prepared);
    }

    let action = Action::Run {
        script: entry.key().to_string(),
        args: script.args.clone(),
    };
    let argv = translate(project.manager(), &action);
    spawn(argv, entry.dir(), dry_run).await
}
