//! Logging utilities and initialization for netota

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Log level for the CLI: errors only when quiet, info otherwise
pub fn cli_log_level(quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    }
}

/// Initialize logging for the netota CLI.
///
/// Console output meant for the user goes to stdout; log records go to
/// stderr so they never interleave with echoed board responses.
pub fn init_cli_logging(quiet: bool) -> Result<()> {
    let level = cli_log_level(quiet);

    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init()?;

    // Initialize panic logging
    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("netota logging initialized with level: {:?}", level);
    Ok(())
}
