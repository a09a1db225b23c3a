//! Configuration structures and constants for the sentrystack-core library.
//!
//! `StackConfig` carries everything a run needs: where to look for events,
//! how to scale and speed up the stacked output, which quality to encode at,
//! and the options forwarded untouched to ffmpeg.

mod builder;

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::sentry_event::BackViewFallback;

pub use builder::StackConfigBuilder;

// Default constants

/// Default divisor applied to the width and height of every camera view.
/// With four views stacked 2x2, a divisor of 4 yields an output frame the
/// same size as a single source view.
pub const DEFAULT_SCALE: u32 = 4;

/// Default playback speed multiplier.
pub const DEFAULT_SPEED: u32 = 1;

/// Default constant-quality value passed to the encoder as `-crf`.
/// Higher values reduce quality and file size.
pub const DEFAULT_QUALITY: u32 = 23;

/// Engine binary invoked when no explicit path is configured.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Video codec used for the stacked output.
pub const OUTPUT_VIDEO_CODEC: &str = "libx264";

/// Main configuration structure for a stacking run.
///
/// Typically created by the CLI from its arguments and passed to
/// [`crate::process_events`].
///
/// # Examples
///
/// ```rust
/// use sentrystack_core::config::StackConfigBuilder;
///
/// let config = StackConfigBuilder::new()
///     .sentry_dir("/media/TeslaCam/SentryClips")
///     .scale(2)
///     .speed(4)
///     .dry_run(true)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Top-level directory holding one sub-directory per recording session
    pub sentry_dir: PathBuf,

    /// Divisor applied to each view's width and height
    pub scale: u32,

    /// Playback speed multiplier applied through the output timestamps
    pub speed: u32,

    /// Encoder constant-quality value
    pub quality: u32,

    /// Replace outputs that already exist instead of skipping the event
    pub overwrite: bool,

    /// Report the commands without running them
    pub dry_run: bool,

    /// Tokens inserted verbatim right after the engine program name
    pub extra_options: Vec<String>,

    /// Engine binary to run
    pub ffmpeg_path: String,

    /// What to feed in place of a missing back camera
    pub back_fallback: BackViewFallback,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            sentry_dir: PathBuf::from("./"),
            scale: DEFAULT_SCALE,
            speed: DEFAULT_SPEED,
            quality: DEFAULT_QUALITY,
            overwrite: false,
            dry_run: false,
            extra_options: Vec::new(),
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            back_fallback: BackViewFallback::default(),
        }
    }
}

impl StackConfig {
    /// Creates a configuration with defaults for the given sentry directory.
    #[must_use]
    pub fn new(sentry_dir: PathBuf) -> Self {
        Self {
            sentry_dir,
            ..Self::default()
        }
    }

    /// Checks the values that would otherwise produce a broken command.
    pub fn validate(&self) -> CoreResult<()> {
        if self.scale == 0 {
            return Err(CoreError::InvalidConfig(
                "scale must be a positive integer".to_string(),
            ));
        }
        if self.speed == 0 {
            return Err(CoreError::InvalidConfig(
                "speed must be a positive integer".to_string(),
            ));
        }
        if self.ffmpeg_path.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "ffmpeg path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The subset of the configuration that shapes a single command.
    #[must_use]
    pub fn params(&self) -> ProcessingParams {
        ProcessingParams {
            scale: self.scale,
            speed: self.speed,
            quality: self.quality,
            overwrite: self.overwrite,
            extra_options: self.extra_options.clone(),
            back_fallback: self.back_fallback,
            ffmpeg_path: self.ffmpeg_path.clone(),
        }
    }
}

/// Per-command processing parameters, immutable for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingParams {
    pub scale: u32,
    pub speed: u32,
    pub quality: u32,
    pub overwrite: bool,
    pub extra_options: Vec<String>,
    pub back_fallback: BackViewFallback,
    pub ffmpeg_path: String,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        StackConfig::default().params()
    }
}
