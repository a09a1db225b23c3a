// ============================================================================
// sentrystack-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Running composed commands
//
// This module provides the seam between the batch runner and the transcoding
// engine. The batch runner only ever talks to the `TranscodeRunner` trait;
// `SidecarRunner` is the real implementation built on ffmpeg-sidecar, and
// tests substitute a recording runner.
//
// KEY COMPONENTS:
// - TranscodeRunner: Trait for executing a TranscodeCommand to completion
// - SidecarRunner: Concrete implementation using ffmpeg-sidecar

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use crate::events::{Event, EventDispatcher};
use crate::external::TranscodeCommand;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use log::{debug, error, warn};
use std::process::{Command, ExitStatus, Stdio};

/// Something that can run a composed command and wait for it.
pub trait TranscodeRunner {
    /// Runs `command` to completion. Progress goes to `events`; a non-zero
    /// exit or a failure to start is an error.
    fn run(&self, command: &TranscodeCommand, events: &EventDispatcher) -> CoreResult<()>;
}

/// Runs commands through `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarRunner;

impl SidecarRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TranscodeRunner for SidecarRunner {
    fn run(&self, command: &TranscodeCommand, events: &EventDispatcher) -> CoreResult<()> {
        // Built from a plain `Command` so the engine receives exactly the
        // composed arguments; `new_with_path` would prepend its own log level.
        let mut inner = Command::new(&command.program);
        inner
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut cmd = FfmpegCommand::from(inner);

        debug!("Spawning: {}", command);
        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error(&command.program, e))?;

        let mut error_lines: Vec<String> = Vec::new();
        let iterator = child.iter().map_err(|e| {
            error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error(&command.program, ExitStatus::default(), e.to_string())
        })?;

        for event in iterator {
            match event {
                FfmpegEvent::Progress(progress) => {
                    events.emit(Event::EncodeProgress {
                        frame: progress.frame,
                        fps: progress.fps,
                        time: progress.time,
                        speed: progress.speed,
                    });
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) => {
                    warn!("ffmpeg: {}", line);
                    error_lines.push(line);
                }
                FfmpegEvent::Log(_, line) => debug!("ffmpeg: {}", line),
                FfmpegEvent::Error(line) => {
                    warn!("ffmpeg: {}", line);
                    error_lines.push(line);
                }
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| command_wait_error(&command.program, e))?;
        if !status.success() {
            error!("{} exited with {}", command.program, status);
            return Err(command_failed_error(
                &command.program,
                status,
                error_lines.join("\n"),
            ));
        }

        Ok(())
    }
}
