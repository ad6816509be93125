//! Real child processes: exit codes, missing executables and interruption.
//!
//! The package managers are small shell scripts placed first on `PATH`.

use std::fs;
use std::process::{Command as StdCommand, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use crate::integration::fixtures::{
    create_pnpm_monorepo, create_project_with_lockfile, fake_bin_dir, path_with,
    sleeping_bin_dir, standard_scripts, LockfileType,
};

#[test]
fn test_child_exit_code_propagates() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);
    let bin = fake_bin_dir(&["pnpm"]);
    let log = project.path().join("calls.log");

    cargo_bin_cmd!("n")
        .arg("--no-config")
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", &log)
        .env("N_TEST_EXIT", "3")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Task execution failed"));

    assert_eq!(fs::read_to_string(&log).unwrap(), "pnpm install\n");
}

#[test]
fn test_script_args_reach_child() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Yarn);
    let bin = fake_bin_dir(&["yarn"]);
    let log = project.path().join("calls.log");

    cargo_bin_cmd!("n")
        .args(["--no-config", "test", "--", "--coverage"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", &log)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "yarn run test -- --coverage\n"
    );
}

#[test]
fn test_install_then_run() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Bun);
    let bin = fake_bin_dir(&["bun"]);
    let log = project.path().join("calls.log");

    cargo_bin_cmd!("n")
        .args(["--no-config", "build", "-i"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", &log)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "bun install\nbun run build\n"
    );
}

#[test]
fn test_failed_install_skips_script() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Bun);
    let bin = fake_bin_dir(&["bun"]);
    let log = project.path().join("calls.log");

    cargo_bin_cmd!("n")
        .args(["--no-config", "build", "-i"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", &log)
        .env("N_TEST_EXIT", "1")
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(&log).unwrap(), "bun install\n");
}

#[test]
fn test_workspace_script_runs_in_member_dir() {
    let project = create_pnpm_monorepo();
    let bin = fake_bin_dir(&["pnpm"]);
    // Relative log path lands in the child's working directory.
    cargo_bin_cmd!("n")
        .args(["--no-config", "packages:ui:build"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", "calls.log")
        .assert()
        .success();

    let log = project.path().join("packages/ui/calls.log");
    assert_eq!(fs::read_to_string(log).unwrap(), "pnpm run build\n");
}

#[test]
fn test_missing_executable() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Pnpm);
    let empty = tempfile::TempDir::new().unwrap();

    cargo_bin_cmd!("n")
        .arg("--no-config")
        .current_dir(project.path())
        .env("PATH", empty.path())
        .assert()
        .code(127)
        .stderr(predicate::str::contains("Executable 'pnpm' was not found"));
}

#[test]
fn test_dry_run_never_spawns() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);
    let bin = fake_bin_dir(&["npm"]);
    let log = project.path().join("calls.log");

    cargo_bin_cmd!("n")
        .args(["--no-config", "--dry-run", "dev"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_LOG", &log)
        .assert()
        .success();

    assert!(!log.exists());
}

#[test]
fn test_interrupt_stops_child() {
    let project = create_project_with_lockfile(&standard_scripts(), LockfileType::Npm);
    let bin = sleeping_bin_dir("npm");
    let marker = project.path().join("started");

    let mut child = StdCommand::new(env!("CARGO_BIN_EXE_n"))
        .args(["--no-config", "dev"])
        .current_dir(project.path())
        .env("PATH", path_with(bin.path()))
        .env("N_TEST_MARKER", &marker)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !marker.exists() {
        assert!(Instant::now() < deadline, "child never started");
        std::thread::sleep(Duration::from_millis(20));
    }

    let killed = StdCommand::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "n did not exit after SIGINT"
        );
        std::thread::sleep(Duration::from_millis(20));
    };

    assert_eq!(status.code(), Some(130));
    let output = child.wait_with_output().unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("manually interrupted"));
}
