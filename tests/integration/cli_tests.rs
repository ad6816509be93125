//! CLI integration tests for n.
//!
//! These run the binary with `--dry-run` and check the translated command.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

use crate::integration::fixtures::{
    create_deno_project, create_pnpm_monorepo, create_project, create_project_with_lockfile,
    create_project_with_package_manager, standard_scripts, LockfileType,
};

/// Get a Command for the n binary, isolated from user config.
fn n() -> Command {
    let mut cmd = cargo_bin_cmd!("n");
    cmd.arg("--no-config").env_remove("RUST_LOG");
    cmd
}

// ==================== Help and Version ====================

#[test]
fn test_help_output() {
    let project = create_project(&[]);

    n().arg("--help")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("reinstall"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--pm"));
}

#[test]
fn test_help_lists_scripts() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);

    n().arg("-h")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Scripts:"))
        .stdout(predicate::str::contains("vite build"));
}

#[test]
fn test_version_output() {
    n().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"\d+\.\d+\.\d+").unwrap());
}

// ==================== Install ====================

#[test]
fn test_bare_install_per_lockfile() {
    let cases = [
        (LockfileType::Npm, "npm install"),
        (LockfileType::Yarn, "yarn"),
        (LockfileType::Pnpm, "pnpm install"),
        (LockfileType::Bun, "bun install"),
    ];

    for (lock, expected) in cases {
        let project = create_project_with_lockfile(&standard_scripts(), lock);
        n().arg("--dry-run")
            .current_dir(project.path())
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("Would run: {expected}\n")));
    }
}

#[test]
fn test_install_deps_with_flags() {
    let project = create_project_with_lockfile(&[], LockfileType::Yarn);

    n().args(["--dry-run", "i", "react", "-D"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: yarn add react -D"));
}

#[test]
fn test_install_dir_and_passthrough() {
    let project = create_project_with_lockfile(&[], LockfileType::Pnpm);

    n().args(["--dry-run", "install", "-w", "-C", "apps/web", "--", "--frozen-lockfile"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Would run: pnpm install --workspace-root --dir=apps/web --frozen-lockfile",
        ));
}

#[test]
fn test_prod_conflicts_with_dev() {
    let project = create_project(&[]);

    n().args(["--dry-run", "i", "-P", "-D"])
        .current_dir(project.path())
        .assert()
        .code(2);
}

#[test]
fn test_pm_flag_overrides_detection() {
    let project = create_project_with_lockfile(&[], LockfileType::Yarn);

    n().args(["--dry-run", "--pm", "bun"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: bun install"));
}

#[test]
fn test_package_manager_field_wins() {
    let project = create_project_with_package_manager("pnpm@9.1.0");
    std::fs::write(project.path().join("yarn.lock"), "").unwrap();

    n().arg("--dry-run")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: pnpm install"));
}

// ==================== Uninstall ====================

#[test]
fn test_uninstall_verbs() {
    let cases = [
        (LockfileType::Npm, "npm uninstall lodash"),
        (LockfileType::Yarn, "yarn remove lodash"),
        (LockfileType::Pnpm, "pnpm remove lodash"),
    ];

    for (lock, expected) in cases {
        let project = create_project_with_lockfile(&[], lock);
        n().args(["--dry-run", "rm", "lodash"])
            .current_dir(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("Would run: {expected}")));
    }
}

#[test]
fn test_uninstall_requires_deps() {
    let project = create_project(&[]);

    n().args(["un"]).current_dir(project.path()).assert().code(2);
}

// ==================== Scripts ====================

#[test]
fn test_run_script_by_name() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);

    n().args(["--dry-run", "dev"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: pnpm run dev"));
}

#[test]
fn test_run_script_with_args() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);

    n().args(["--dry-run", "test", "--", "--watch", "src/app spec.ts"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Would run: npm run test -- --watch 'src/app spec.ts'",
        ));
}

#[test]
fn test_run_script_by_index() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Bun);

    n().args(["--dry-run", "1"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: bun run build"));
}

#[test]
fn test_run_workspace_script() {
    let project = create_pnpm_monorepo();

    n().args(["--dry-run", "apps:web:start"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: pnpm run start"));
}

#[test]
fn test_run_with_install_first() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);

    n().args(["--dry-run", "dev", "-i"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: pnpm install\nWould run: pnpm run dev"));
}

#[test]
fn test_run_install_conflicts_with_reinstall() {
    let project = create_project(&standard_scripts());

    n().args(["--dry-run", "dev", "-i", "-r"])
        .current_dir(project.path())
        .assert()
        .code(2);
}

#[test]
fn test_deno_runs_tasks() {
    let project = create_deno_project();

    n().args(["--dry-run", "dev"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: deno task dev"));
}

#[test]
fn test_unknown_script() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);

    n().args(["--dry-run", "buidl"])
        .current_dir(project.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Script 'buidl' not found"))
        .stderr(predicate::str::contains("build"));
}

#[test]
fn test_builtin_wins_over_script_name() {
    let project = create_project_with_lockfile(&[("clean", "rimraf dist")], LockfileType::Npm);

    n().args(["--dry-run", "clean"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("rimraf").not());
}

// ==================== List ====================

#[test]
fn test_list_monorepo() {
    let project = create_pnpm_monorepo();

    n().arg("ls")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Available scripts (pnpm):"))
        .stdout(predicate::str::contains("packages:ui:build"))
        .stdout(predicate::str::contains("-> apps/web"));
}

#[test]
fn test_list_empty() {
    let project = create_project(&[]);

    n().arg("list")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No scripts found"));
}

// ==================== Completions and Config ====================

#[test]
fn test_completions_bash() {
    n().args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_n()"));
}

#[test]
fn test_invalid_config_path() {
    let project = create_project(&[]);
    let config = project.path().join("bad.toml");
    std::fs::write(&config, "[general]\nmanager = \"pip\"\n").unwrap();

    cargo_bin_cmd!("n")
        .args(["--dry-run", "--config"])
        .arg(&config)
        .current_dir(project.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn test_config_manager() {
    let project = create_project(&[]);
    let config = project.path().join("n.toml");
    std::fs::write(&config, "[general]\nmanager = \"yarn\"\n").unwrap();

    cargo_bin_cmd!("n")
        .args(["--dry-run", "--config"])
        .arg(&config)
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would run: yarn"));
}
