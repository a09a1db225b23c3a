// ============================================================================
// sentrystack-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for StackConfig
//
// This module implements the builder pattern for the StackConfig structure,
// providing a fluent API for creating and configuring StackConfig instances.
// Every field has a default, so `build()` never fails; call
// `StackConfig::validate` before using the result.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::StackConfig;
use crate::sentry_event::BackViewFallback;

/// Builder for creating StackConfig instances.
///
/// # Examples
///
/// ```rust
/// use sentrystack_core::config::StackConfigBuilder;
///
/// let config = StackConfigBuilder::new()
///     .sentry_dir("./events")
///     .scale(4)
///     .speed(2)
///     .quality(20)
///     .extra_option("-hide_banner")
///     .build();
/// assert_eq!(config.speed, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StackConfigBuilder {
    config: StackConfig,
}

impl StackConfigBuilder {
    /// Creates a new builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level sentry directory.
    #[must_use]
    pub fn sentry_dir(mut self, sentry_dir: impl Into<PathBuf>) -> Self {
        self.config.sentry_dir = sentry_dir.into();
        self
    }

    /// Sets the per-view size divisor.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.config.scale = scale;
        self
    }

    /// Sets the playback speed multiplier.
    #[must_use]
    pub fn speed(mut self, speed: u32) -> Self {
        self.config.speed = speed;
        self
    }

    /// Sets the encoder constant-quality value.
    #[must_use]
    pub fn quality(mut self, quality: u32) -> Self {
        self.config.quality = quality;
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Appends one pass-through token. Order of calls is preserved.
    #[must_use]
    pub fn extra_option(mut self, option: impl Into<String>) -> Self {
        self.config.extra_options.push(option.into());
        self
    }

    /// Replaces all pass-through tokens.
    #[must_use]
    pub fn extra_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extra_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the engine binary to run.
    #[must_use]
    pub fn ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    #[must_use]
    pub fn back_fallback(mut self, policy: BackViewFallback) -> Self {
        self.config.back_fallback = policy;
        self
    }

    /// Builds the StackConfig.
    #[must_use]
    pub fn build(self) -> StackConfig {
        self.config
    }
}
