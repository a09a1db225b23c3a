//! Stacking command composition.
//!
//! Builds the complete ffmpeg invocation for one event: four inputs in a fixed
//! order, a filter graph that scales each view and arranges them in a 2x2
//! grid (front|back over right|left), a timestamp rescale for the requested
//! speed, and the encode settings. Composition either returns a whole command
//! or an error; it never returns a partial one.

use crate::config::{OUTPUT_VIDEO_CODEC, ProcessingParams};
use crate::error::{CoreError, CoreResult};
use crate::naming::ViewLabel;
use crate::sentry_event::SentryEvent;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Input index assigned to each camera.
///
/// The filter graph refers to inputs by position (`[0:v]`, `[1:v]`, ...), so
/// the `-i` declarations and the scale chains are both generated from this
/// one table.
pub const STACK_INPUTS: [(usize, ViewLabel); 4] = [
    (0, ViewLabel::Front),
    (1, ViewLabel::Back),
    (2, ViewLabel::Left),
    (3, ViewLabel::Right),
];

/// Label of the final stream mapped to the output.
pub const OUTPUT_STREAM: &str = "res";

/// Log level that prefixes every engine log line with its severity, which
/// the sidecar event parser relies on to classify lines and spot progress.
pub const ENGINE_LOG_LEVEL: [&str; 2] = ["-loglevel", "level+info"];

/// A fully materialized engine invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeCommand {
    /// Engine binary
    pub program: String,
    /// Every token after the program name, in order
    pub args: Vec<String>,
    /// File the command writes; also the last token of `args`
    pub output_path: PathBuf,
}

impl TranscodeCommand {
    /// Program name followed by all arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Single-line rendering for display. Tokens holding shell-significant
    /// characters are single-quoted; this is for reading, not guaranteed to
    /// paste into every shell unchanged.
    #[must_use]
    pub fn to_shell_string(&self) -> String {
        self.tokens().map(shell_quote).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for TranscodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell_string())
    }
}

fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

/// Builder for a `-filter_complex` graph made of labelled chains.
#[derive(Debug, Default)]
pub struct FilterGraph {
    chains: Vec<String>,
}

impl FilterGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shrinks input `index` by `divisor` in both dimensions.
    #[must_use]
    pub fn scale_input(mut self, index: usize, divisor: u32, out: &str) -> Self {
        self.chains
            .push(format!("[{index}:v]scale=iw/{divisor}:ih/{divisor}[{out}]"));
        self
    }

    /// Places `left` and `right` side by side.
    #[must_use]
    pub fn hstack(mut self, left: &str, right: &str, out: &str) -> Self {
        self.chains.push(format!("[{left}][{right}]hstack[{out}]"));
        self
    }

    /// Places `top` above `bottom`.
    #[must_use]
    pub fn vstack(mut self, top: &str, bottom: &str, out: &str) -> Self {
        self.chains.push(format!("[{top}][{bottom}]vstack[{out}]"));
        self
    }

    /// Multiplies presentation timestamps by `factor`.
    #[must_use]
    pub fn setpts(mut self, input: &str, factor: f64, out: &str) -> Self {
        self.chains.push(format!("[{input}]setpts={factor}*PTS[{out}]"));
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.chains.join(";")
    }
}

/// The 2x2 stacking graph: front|back on top, right|left below, sped up by
/// `speed`.
#[must_use]
pub fn stack_filter_graph(scale: u32, speed: u32) -> String {
    let mut graph = FilterGraph::new();
    for (index, label) in STACK_INPUTS {
        graph = graph.scale_input(index, scale, label.stream_label());
    }
    graph
        .hstack(
            ViewLabel::Front.stream_label(),
            ViewLabel::Back.stream_label(),
            "long",
        )
        .hstack(
            ViewLabel::Right.stream_label(),
            ViewLabel::Left.stream_label(),
            "lat",
        )
        .vstack("long", "lat", "all")
        .setpts("all", 1.0 / f64::from(speed), OUTPUT_STREAM)
        .build()
}

/// Composes the stacking command for `event`.
///
/// Pass-through options follow the program name, then `-y` when overwriting,
/// then [`ENGINE_LOG_LEVEL`] unless the pass-through options already set a
/// log level, then the four inputs in [`STACK_INPUTS`] order. A missing back clip is
/// handled by `params.back_fallback`; any other missing clip fails the
/// composition.
///
/// # Errors
///
/// * `CoreError::MissingView` - a required clip is absent
/// * `CoreError::InvalidConfig` - scale or speed is zero
pub fn compose_stack_command(
    event: &SentryEvent,
    params: &ProcessingParams,
) -> CoreResult<TranscodeCommand> {
    if params.scale == 0 || params.speed == 0 {
        return Err(CoreError::InvalidConfig(format!(
            "scale and speed must be positive (scale={}, speed={})",
            params.scale, params.speed
        )));
    }

    let mut inputs = Vec::with_capacity(STACK_INPUTS.len());
    for (_, label) in STACK_INPUTS {
        inputs.push(event.resolve_view(label, params.back_fallback)?);
    }

    let output_path = event.output_path(params.scale, params.speed, params.quality);

    let mut args = params.extra_options.clone();
    if params.overwrite {
        args.push("-y".to_string());
    }
    if !sets_log_level(&params.extra_options) {
        args.extend(ENGINE_LOG_LEVEL.map(str::to_string));
    }
    for input in &inputs {
        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
    }
    args.extend([
        "-an".to_string(),
        "-filter_complex".to_string(),
        stack_filter_graph(params.scale, params.speed),
        "-c:v".to_string(),
        OUTPUT_VIDEO_CODEC.to_string(),
        "-crf".to_string(),
        params.quality.to_string(),
        "-map".to_string(),
        format!("[{OUTPUT_STREAM}]"),
        output_path.to_string_lossy().into_owned(),
    ]);

    Ok(TranscodeCommand {
        program: params.ffmpeg_path.clone(),
        args,
        output_path,
    })
}

fn sets_log_level(options: &[String]) -> bool {
    options.iter().any(|o| o == "-loglevel" || o == "-v")
}
