//! CLI argument definitions for n.
//!
//! Uses clap with derive macros for argument parsing. Any first argument
//! that is not a built-in subcommand is captured as a script invocation and
//! parsed separately with [`ScriptArgs`].
//!
//! # Example
//!
//! ```no_run
//! use n_pm::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! println!("Package manager override: {:?}", cli.manager_override());
//! ```

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};

use crate::package::{InstallOptions, PackageManager};

/// One command for npm, yarn, pnpm, bun and deno projects.
#[derive(Parser, Debug)]
#[command(name = "n")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this package manager instead of detecting one
    #[arg(long, global = true, value_name = "PM", value_enum)]
    pub pm: Option<CliManager>,

    /// Show command without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<CliShell>,
}

/// Built-in subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Install dependencies (the default with no subcommand)
    #[command(name = "i", visible_alias = "install")]
    Install(InstallArgs),

    /// Clean caches and node_modules, then install again
    #[command(name = "ri", visible_alias = "reinstall")]
    Reinstall {
        /// Empty the lockfile first
        #[arg(short = 'w', long = "with-lock", alias = "withLock")]
        with_lock: bool,
    },

    /// Remove dependencies
    #[command(name = "un", visible_aliases = ["uninstall", "rm"])]
    Uninstall {
        /// Packages to remove
        #[arg(required = true, value_name = "DEPS")]
        deps: Vec<String>,
    },

    /// Switch the project to another package manager
    #[command(name = "sw", visible_alias = "switch")]
    Switch {
        /// Package manager to switch to
        #[arg(value_enum)]
        pm: CliManager,
    },

    /// Start a new project for a package manager
    #[command(name = "in", visible_alias = "init")]
    Init {
        /// Package manager for the new project
        #[arg(value_enum)]
        pm: CliManager,
    },

    /// Empty cache directories in every workspace
    #[command(name = "cl", visible_alias = "clean")]
    Clean,

    /// Find imported packages missing from package.json
    #[command(name = "sc", visible_alias = "scan")]
    Scan {
        /// Directory to scan (default: current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Install the missing packages
        #[arg(long)]
        install: bool,

        /// Install them as devDependencies
        #[arg(short = 'D', long, requires = "install")]
        dev: bool,
    },

    /// List scripts across workspaces
    #[command(name = "ls", visible_alias = "list")]
    List,

    /// Run a script by name or index
    #[command(external_subcommand)]
    Script(Vec<String>),
}

/// Options for `n install`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Packages to add
    #[arg(value_name = "DEPS")]
    pub deps: Vec<String>,

    /// Global installation
    #[arg(short = 'g', long)]
    pub global: bool,

    /// Change to directory <DIR>
    #[arg(short = 'C', long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Packages in devDependencies won't be installed
    #[arg(short = 'P', long, conflicts_with = "dev")]
    pub prod: bool,

    /// Add as devDependencies
    #[arg(short = 'D', long)]
    pub dev: bool,

    /// Run the command on the root workspace project (pnpm)
    #[arg(short = 'w', long)]
    pub workspace_root: bool,

    /// Run the command for each project in the workspace (pnpm)
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Force install
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Extra flags passed to the package manager as-is
    #[arg(last = true, value_name = "ARGS")]
    pub extra: Vec<String>,
}

impl InstallArgs {
    /// Selected options in translator form.
    pub fn options(&self) -> InstallOptions {
        InstallOptions {
            global: self.global,
            dir: self.dir.clone(),
            prod: self.prod,
            dev: self.dev,
            workspace_root: self.workspace_root,
            recursive: self.recursive,
            force: self.force,
        }
    }

    /// Formatted flags followed by the pass-through arguments.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = self.options().flags();
        flags.extend(self.extra.iter().cloned());
        flags
    }
}

/// Arguments of a script invocation: `n <script> [-i | -r] [-- args...]`.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "n", no_binary_name = true)]
#[command(override_usage = "n <SCRIPT> [-i | -r] [-- <ARGS>...]")]
pub struct ScriptArgs {
    /// Script name or index
    pub name: String,

    /// Install dependencies first
    #[arg(short = 'i', long, conflicts_with = "reinstall")]
    pub install: bool,

    /// Clean and reinstall dependencies first
    #[arg(short = 'r', long)]
    pub reinstall: bool,

    /// Arguments passed to the script
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl ScriptArgs {
    /// Parse the raw words captured after `n`.
    pub fn parse_from_raw(raw: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(raw)
    }
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    Powershell,
    /// Elvish shell
    Elvish,
}

/// Package manager for CLI parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
    Deno,
}

impl From<CliManager> for PackageManager {
    fn from(manager: CliManager) -> Self {
        match manager {
            CliManager::Npm => PackageManager::Npm,
            CliManager::Yarn => PackageManager::Yarn,
            CliManager::Pnpm => PackageManager::Pnpm,
            CliManager::Bun => PackageManager::Bun,
            CliManager::Deno => PackageManager::Deno,
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the package manager override.
    pub fn manager_override(&self) -> Option<PackageManager> {
        self.pm.map(Into::into)
    }

    /// Generate shell completions and write to stdout.
    pub fn generate_completions(shell: CliShell) {
        let mut cmd = Cli::command();
        let shell = match shell {
            CliShell::Bash => Shell::Bash,
            CliShell::Zsh => Shell::Zsh,
            CliShell::Fish => Shell::Fish,
            CliShell::Powershell => Shell::PowerShell,
            CliShell::Elvish => Shell::Elvish,
        };
        generate(shell, &mut cmd, "n", &mut std::io::stdout());
    }
}
