//! Interrupt listening for the duration of one child process.

use std::io;

use tracing::info;

/// Registered interrupt handlers.
///
/// Handlers are installed when the value is created, so a signal that
/// arrives after [`Signals::install`] returns is never lost to the default
/// disposition.
pub struct Signals {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
    #[cfg(windows)]
    ctrl_break: tokio::signal::windows::CtrlBreak,
}

impl Signals {
    /// Install SIGINT and SIGTERM handlers (Ctrl+C and Ctrl+Break on Windows).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(windows)]
        {
            use tokio::signal::windows;

            Ok(Self {
                ctrl_c: windows::ctrl_c()?,
                ctrl_break: windows::ctrl_break()?,
            })
        }
    }

    /// Wait for the next interrupt.
    pub async fn recv(&mut self) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => info!("Received SIGINT"),
                _ = self.terminate.recv() => info!("Received SIGTERM"),
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                _ = self.ctrl_c.recv() => info!("Received Ctrl+C"),
                _ = self.ctrl_break.recv() => info!("Received Ctrl+Break"),
            }
        }
    }
}
