// ============================================================================
// sentrystack-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Logger setup for the CLI
//
// The application uses the standard `log` crate with `env_logger` as the
// backend. Log records go to stderr so they never mix with dry-run commands
// or JSON progress on stdout.
//
// USAGE:
// - default: info
// - --verbose: debug (per-file grouping decisions, raw ffmpeg log lines)
// - RUST_LOG overrides both, e.g. RUST_LOG=sentrystack_core=trace

use log::LevelFilter;

/// Initializes `env_logger` at `Info`, or `Debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(verbose)
        .try_init();
}

/// Returns the current local timestamp formatted as "YYYY-MM-DD HH:MM:SS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
