//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "bigmove=info";
const VERBOSE_DIRECTIVE: &str = "bigmove=debug";

/// Install the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks between info and debug.
/// Calling this twice is harmless, the second install is ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    }
}
