//! Child process execution.
//!
//! Spawns the package manager with inherited stdio, waits for it, and kills
//! it when the wait is interrupted or the caller unwinds.

use std::future::Future;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::signal::Signals;
use crate::error::{exit_code, NError, Result};

/// How a child run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The child exited with this code (`128 + signal` when killed).
    Exited(i32),
    /// The wait was interrupted and the child was killed.
    Interrupted,
}

impl Outcome {
    /// Exit code the tool should finish with.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Exited(code) => *code,
            Outcome::Interrupted => exit_code::INTERRUPTED,
        }
    }

    /// Check if the child succeeded.
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Exited(0))
    }
}

/// Holds a running child and kills it if dropped before being reaped.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    async fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.reaped = true;
        Ok(status)
    }

    /// Kill the child (no-op if it already exited) and reap it.
    async fn terminate(&mut self) {
        if let Err(e) = self.child.start_kill() {
            debug!(error = %e, "Child already gone");
        }
        if let Err(e) = self.child.wait().await {
            warn!(error = %e, "Failed to reap child");
        }
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            warn!("Killing child process on drop");
            let _ = self.child.start_kill();
        }
    }
}

/// Render argv for display, quoting where a shell would need it.
///
/// # Examples
///
/// ```
/// use n_pm::runner::format_command;
///
/// let argv = vec!["npm".to_string(), "run".to_string(), "say hi".to_string()];
/// assert_eq!(format_command(&argv), "npm run 'say hi'");
/// ```
pub fn format_command(argv: &[String]) -> String {
    shell_words::join(argv)
}

/// Run `argv` in `cwd`, killing the child on Ctrl+C or SIGTERM.
///
/// With `dry_run` the command is printed as `Would run: ...` and nothing is
/// spawned or looked up.
///
/// # Errors
///
/// Returns [`NError::ExecutableNotFound`] when `argv[0]` is not on `PATH`,
/// and an IO error when the child cannot be spawned or waited on.
pub async fn run(argv: &[String], cwd: &Path, dry_run: bool) -> Result<Outcome> {
    if dry_run {
        println!("Would run: {}", format_command(argv));
        return Ok(Outcome::Exited(exit_code::SUCCESS));
    }

    let mut signals = Signals::install()?;
    run_with_interrupt(argv, cwd, signals.recv()).await
}

/// Run `argv` in `cwd` until it exits or `interrupt` resolves.
pub async fn run_with_interrupt<F>(argv: &[String], cwd: &Path, interrupt: F) -> Result<Outcome>
where
    F: Future<Output = ()>,
{
    let (program, args) = argv.split_first().ok_or_else(|| {
        NError::Io(io::Error::new(io::ErrorKind::InvalidInput, "empty command"))
    })?;

    let executable = which::which(program).map_err(|source| NError::ExecutableNotFound {
        name: program.clone(),
        source,
    })?;

    debug!(command = %format_command(argv), cwd = %cwd.display(), "Spawning");

    let child = Command::new(&executable)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| NError::io("spawn", &executable, e))?;

    let mut guard = ChildGuard::new(child);
    tokio::pin!(interrupt);

    let waited = tokio::select! {
        status = guard.wait() => Some(status),
        _ = &mut interrupt => None,
    };

    match waited {
        Some(status) => {
            let status = status.map_err(|e| NError::io("wait for", &executable, e))?;
            let code = status_code(status);
            debug!(code, "Child exited");
            Ok(Outcome::Exited(code))
        }
        None => {
            guard.terminate().await;
            Ok(Outcome::Interrupted)
        }
    }
}

/// Exit code for `status`; a signal death maps to `128 + signal`.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    exit_code::GENERAL_ERROR
}
