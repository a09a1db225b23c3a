//! Implementation of the default stacking run.
//!
//! Translates the parsed arguments into a `StackConfig`, wires the progress
//! handlers and hands over to `sentrystack_core::stack_sentry_dir`.

use crate::cli::Cli;
use crate::error::CliResult;
use crate::terminal::ConsoleHandler;

use sentrystack_core::config::{StackConfig, StackConfigBuilder};
use sentrystack_core::events::{EventDispatcher, JsonProgressHandler};
use sentrystack_core::{
    BackViewFallback, BatchSummary, SidecarRunner, check_dependency, stack_sentry_dir,
};

use log::{info, warn};
use std::sync::Arc;

/// Builds the run configuration from command-line arguments.
pub fn build_config(cli: &Cli) -> StackConfig {
    let back_fallback = if cli.no_back_fallback {
        BackViewFallback::Strict
    } else {
        BackViewFallback::UseFront
    };

    StackConfigBuilder::new()
        .sentry_dir(cli.sentry_dir.clone())
        .scale(cli.scale)
        .speed(cli.speed)
        .quality(cli.quality)
        .overwrite(cli.overwrite)
        .dry_run(cli.dry_run)
        .extra_options(cli.ffmpeg_opts.iter().cloned())
        .ffmpeg_path(cli.ffmpeg.clone())
        .back_fallback(back_fallback)
        .build()
}

/// Runs the whole batch. Per-event failures are part of the returned summary.
pub fn run_stack(cli: &Cli) -> CliResult<BatchSummary> {
    let config = build_config(cli);
    config.validate()?;

    info!("{:?}", config);
    if !config.extra_options.is_empty() {
        warn!(
            "Passing options through to ffmpeg: {:?}",
            config.extra_options
        );
    }

    let mut dispatcher = EventDispatcher::new();
    if cli.json {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else {
        dispatcher.add_handler(Arc::new(ConsoleHandler::new()));
    }

    if !config.dry_run {
        if let Err(e) = check_dependency(&config.ffmpeg_path) {
            warn!("{e}; every event will fail until ffmpeg is available");
        }
    }

    stack_sentry_dir(&config, &SidecarRunner::new(), &dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_from_args() {
        let cli = Cli::parse_from([
            "sentrystack",
            "--sentry-dir",
            "/cam",
            "--scale",
            "2",
            "--speed",
            "8",
            "--no-back-fallback",
            "--",
            "-hide_banner",
        ]);
        let config = build_config(&cli);

        assert_eq!(config.sentry_dir, PathBuf::from("/cam"));
        assert_eq!(config.scale, 2);
        assert_eq!(config.speed, 8);
        assert_eq!(config.quality, 23);
        assert_eq!(config.back_fallback, BackViewFallback::Strict);
        assert_eq!(config.extra_options, vec!["-hide_banner"]);
    }
}
