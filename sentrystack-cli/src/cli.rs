// sentrystack-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::Parser;
use sentrystack_core::config::{
    DEFAULT_FFMPEG_PATH, DEFAULT_QUALITY, DEFAULT_SCALE, DEFAULT_SPEED,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Sentrystack: stack multi-camera sentry clips into a single video",
    long_about = "Groups the front, back and repeater clips of every sentry event \
                  and stacks them into one 2x2 video using ffmpeg.\n\n\
                  WARNING: every argument after `--` is passed to ffmpeg verbatim, \
                  immediately after the program name. Use --dry-run to inspect the \
                  resulting commands before running them."
)]
pub struct Cli {
    /// Top-level sentry directory containing one sub-directory per session
    #[arg(long, value_name = "DIR", default_value = "./", env = "SENTRYSTACK_DIR")]
    pub sentry_dir: PathBuf,

    /// Speed multiplier for the stacked output
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_SPEED,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub speed: u32,

    /// Scale-down divisor for each view (e.g. 2 for half width and height)
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_SCALE,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub scale: u32,

    /// Encode quality (CRF); increase to reduce quality and file size
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_QUALITY)]
    pub quality: u32,

    /// Overwrite existing outputs instead of skipping the event
    #[arg(long)]
    pub overwrite: bool,

    /// Print the ffmpeg commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// List the session sub-directories and exit
    #[arg(long)]
    pub list_dir: bool,

    /// ffmpeg binary to run
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FFMPEG_PATH, env = "SENTRYSTACK_FFMPEG")]
    pub ffmpeg: String,

    /// Fail events without a back camera clip instead of reusing the front clip
    #[arg(long)]
    pub no_back_fallback: bool,

    /// Emit progress as JSON lines on stdout
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Options forwarded verbatim to ffmpeg
    #[arg(last = true, value_name = "FFMPEG_OPTS")]
    pub ffmpeg_opts: Vec<String>,
}
