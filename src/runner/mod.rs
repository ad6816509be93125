//! Runner module for n.
//!
//! Spawns the package manager, forwards interrupts to it and reports how it
//! ended.

mod executor;
mod signal;

pub use executor::{format_command, run, run_with_interrupt, Outcome};
pub use signal::Signals;
