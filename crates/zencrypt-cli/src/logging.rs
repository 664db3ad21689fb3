//! Tracing subscriber setup.
//!
//! Precedence: `RUST_LOG`, then `-v` flags, then `[logging] level` from the
//! config file, then warnings only. Logs always go to stderr so stdout stays
//! clean for tokens and digests.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count, if any were given.
fn verbosity_directive(verbose: u8, quiet: bool) -> Option<&'static str> {
    if quiet {
        return Some("error");
    }
    match verbose {
        0 => None,
        1 => Some("zencrypt=info,zencrypt_core=info"),
        2 => Some("zencrypt=debug,zencrypt_core=debug"),
        _ => Some("trace"),
    }
}

pub fn build_filter(verbose: u8, quiet: bool, config_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = verbosity_directive(verbose, quiet)
        .or(config_level)
        .unwrap_or("warn");
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: u8, quiet: bool, config_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, quiet, config_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
