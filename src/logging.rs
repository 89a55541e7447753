//! Diagnostics output of the binary.
//!
//! The library only emits `tracing` events; this installs the subscriber
//! that prints them. Events go to stderr so stdout stays usable for
//! `--stdout` exports.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive for a `-v` count.
///
/// ```rust
/// use chatdom::logging::default_directive;
///
/// assert_eq!(default_directive(0), "warn");
/// assert_eq!(default_directive(1), "info");
/// assert_eq!(default_directive(5), "debug");
/// ```
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter: `-v` flags win, then `RUST_LOG`, then `warn`.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    if verbosity > 0 {
        return EnvFilter::new(default_directive(verbosity));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(0)))
}

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init_logging(verbosity: u8) {
    let _ = fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
