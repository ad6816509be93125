//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`. User-facing output (dry-run
//! lines, clean messages, listings) is printed directly and never passes
//! through here.

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Level used when neither `--debug` nor `RUST_LOG` says otherwise.
pub const DEFAULT_LEVEL: Level = Level::WARN;

/// Level for the given `--debug` setting.
pub fn level_for(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        DEFAULT_LEVEL
    }
}

/// Build the filter: `RUST_LOG` when set and valid, otherwise `level`.
fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the stderr subscriber. Later calls do nothing.
pub fn init(debug: bool) {
    INIT.call_once(|| {
        let filter = build_filter(level_for(debug));

        // A subscriber installed by an embedding program wins.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(debug)
                    .with_writer(std::io::stderr),
            )
            .try_init();
    });
}
