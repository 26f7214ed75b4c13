//! Logging setup for the CLI
//!
//! Diagnostics go to stderr through `tracing`; stdout only carries the paths
//! of written files.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "nb4llm=debug,nb4llm_core=debug,nb4llm_batch=debug,warn";
const DEFAULT_FILTER: &str = "warn";
const QUIET_FILTER: &str = "error";

/// Install the global subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else if quiet {
        QUIET_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
