//! Stderr logging for the CLI.
//!
//! stdout carries command output only, so every event goes to stderr. The
//! quiet default still shows recovery warnings and failed saves from the core.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const QUIET: &str = "habitroom_core=warn,habitroom=warn";
const VERBOSE: &str = "habitroom_core=debug,habitroom=debug,info";

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE
    } else {
        QUIET
    }
}

/// Install the subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    tracing_subscriber::registry().with(filter).with(layer).init();
}
