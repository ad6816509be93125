//! Build script for n.
//!
//! Generates the man page using clap_mangen.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

/// Minimal CLI struct for man page generation.
///
/// This duplicates the CLI definition to avoid build dependency issues.
#[derive(Parser)]
#[command(name = "n")]
#[command(
    author,
    version,
    about = "One command for npm, yarn, pnpm, bun and deno projects"
)]
#[command(
    long_about = "n detects the package manager of the current project from its lockfile \
    or the packageManager field and runs the matching command.\n\n\
    Run without arguments to install dependencies. Any argument that is not a built-in \
    subcommand names a script, by name or by index, from any workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this package manager instead of detecting one
    #[arg(long, global = true, value_name = "PM", value_enum)]
    pm: Option<Manager>,

    /// Show command without executing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Path to config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, global = true)]
    no_config: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install dependencies (the default with no subcommand)
    #[command(name = "i", visible_alias = "install")]
    Install {
        /// Packages to add
        deps: Vec<String>,
    },
    /// Clean caches and node_modules, then install again
    #[command(name = "ri", visible_alias = "reinstall")]
    Reinstall {
        /// Empty the lockfile first
        #[arg(short = 'w', long = "with-lock")]
        with_lock: bool,
    },
    /// Remove dependencies
    #[command(name = "un", visible_aliases = ["uninstall", "rm"])]
    Uninstall { deps: Vec<String> },
    /// Switch the project to another package manager
    #[command(name = "sw", visible_alias = "switch")]
    Switch { pm: Manager },
    /// Start a new project for a package manager
    #[command(name = "in", visible_alias = "init")]
    Init { pm: Manager },
    /// Empty cache directories in every workspace
    #[command(name = "cl", visible_alias = "clean")]
    Clean,
    /// Find imported packages missing from package.json
    #[command(name = "sc", visible_alias = "scan")]
    Scan { dir: Option<PathBuf> },
    /// List scripts across workspaces
    #[command(name = "ls", visible_alias = "list")]
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Manager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
    Deno,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

fn main() {
    // Only generate man pages for release builds or when explicitly requested
    let profile = env::var("PROFILE").unwrap_or_default();
    if profile != "release" && env::var("N_GEN_MANPAGE").is_err() {
        return;
    }

    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return,
    };

    let man = clap_mangen::Man::new(Cli::command());

    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to generate man page");

    let man_path = out_dir.join("n.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:rerun-if-changed=build.rs");
}
