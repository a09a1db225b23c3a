// ============================================================================
// sentrystack-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Console rendering of run events
//
// The core library emits structured events; this module turns them into the
// human-facing console output. Colors come from the `console` crate and are
// dropped automatically when stdout is not a terminal; the encode spinner is
// an `indicatif` progress bar.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sentrystack_core::events::{Event, EventHandler};
use sentrystack_core::format_elapsed;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const SKIP_SYMBOL: &str = "-";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";

    pub const PROGRESS_TEMPLATE: &str = "  {spinner:.cyan} [{elapsed_precise}] {msg}";
}

/// Renders run events as styled console lines, with a spinner while an
/// event is encoding.
pub struct ConsoleHandler {
    output: Mutex<Box<dyn Write + Send>>,
    progress: Mutex<Option<ProgressBar>>,
    progress_target: fn() -> ProgressDrawTarget,
}

impl ConsoleHandler {
    /// Writes to stdout. The spinner draws on stdout too and stays hidden
    /// when stdout is not a terminal.
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
            progress: Mutex::new(None),
            progress_target: ProgressDrawTarget::stdout,
        }
    }

    /// Writes to `writer`; the spinner is never drawn.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
            progress: Mutex::new(None),
            progress_target: ProgressDrawTarget::hidden,
        }
    }

    fn line(&self, text: String) {
        let write = || {
            if let Ok(mut output) = self.output.lock() {
                let _ = writeln!(output, "{text}");
                let _ = output.flush();
            }
        };
        match self.progress.lock().ok().and_then(|p| p.clone()) {
            Some(pb) => pb.suspend(write),
            None => write(),
        }
    }

    fn start_progress(&self) {
        self.finish_progress();
        let pb = ProgressBar::with_draw_target(None, (self.progress_target)());
        let style = ProgressStyle::default_spinner()
            .template(styling::PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message("starting");
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut progress) = self.progress.lock() {
            *progress = Some(pb);
        }
    }

    fn finish_progress(&self) {
        if let Some(pb) = self.progress.lock().ok().and_then(|mut p| p.take()) {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ConsoleHandler {
    fn handle(&self, event: &Event) {
        use styling::*;

        match event {
            Event::ScanStarted { sentry_dir } => {
                self.line(format!(
                    "{SECTION_PREFIX}{}{SECTION_SUFFIX}",
                    style("SCANNING").cyan().bold()
                ));
                self.line(format!("{STATUS_INDENT}{}", sentry_dir.display()));
            }

            Event::EventsDiscovered {
                total_events,
                total_sessions,
            } => {
                self.line(format!(
                    "{STATUS_INDENT}Found {} event(s) in {} session(s)",
                    style(total_events).bold(),
                    total_sessions
                ));
            }

            Event::EventStarted {
                event,
                current,
                total,
                views,
            } => {
                self.line(String::new());
                self.line(format!(
                    "{} [{current}/{total}] {} ({})",
                    style(PROCESSING_SYMBOL).cyan(),
                    style(event).bold(),
                    views.join(", ")
                ));
            }

            Event::OutputExists { output_path, .. } => {
                self.line(format!(
                    "{STATUS_INDENT}{} {} exists, skipping (see --overwrite)",
                    style(SKIP_SYMBOL).yellow(),
                    output_path.display()
                ));
            }

            Event::CompositionFailed { message, .. } | Event::EncodeFailed { message, .. } => {
                self.finish_progress();
                self.line(format!(
                    "{STATUS_INDENT}{} {}",
                    style(ERROR_SYMBOL).red().bold(),
                    style(message).red()
                ));
            }

            Event::DryRun { command_line, .. } => {
                self.line(command_line.clone());
            }

            Event::EncodeStarted { output_path, .. } => {
                self.line(format!("{STATUS_INDENT}-> {}", output_path.display()));
                self.start_progress();
            }

            Event::EncodeProgress {
                frame,
                fps,
                time,
                speed,
            } => {
                if let Some(pb) = self.progress.lock().ok().and_then(|p| p.clone()) {
                    pb.set_message(format!(
                        "frame {frame}  {fps:.1} fps  time {time}  speed {speed:.2}x"
                    ));
                }
            }

            Event::EncodeFinished { elapsed, .. } => {
                self.finish_progress();
                self.line(format!(
                    "{STATUS_INDENT}{} done in {}",
                    style(SUCCESS_SYMBOL).green().bold(),
                    format_elapsed(*elapsed)
                ));
            }

            Event::BatchComplete {
                encoded,
                planned,
                skipped,
                failed,
                elapsed,
            } => {
                self.line(String::new());
                self.line(format!(
                    "{SECTION_PREFIX}{}{SECTION_SUFFIX}",
                    style("SUMMARY").cyan().bold()
                ));
                self.line(format!(
                    "{STATUS_INDENT}encoded: {encoded}  planned: {planned}  skipped: {skipped}  failed: {}",
                    if *failed > 0 {
                        style(failed).red().bold().to_string()
                    } else {
                        failed.to_string()
                    }
                ));
                self.line(format!("{STATUS_INDENT}elapsed: {}", format_elapsed(*elapsed)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(events: &[Event]) -> String {
        let content = Arc::new(Mutex::new(Vec::new()));
        let handler = ConsoleHandler::with_writer(Box::new(SharedWriter(content.clone())));
        for event in events {
            handler.handle(event);
        }
        let bytes = content.lock().unwrap().clone();
        console::strip_ansi_codes(&String::from_utf8(bytes).unwrap()).into_owned()
    }

    #[test]
    fn test_dry_run_prints_command_line_verbatim() {
        let out = render(&[Event::DryRun {
            event: "s@t".to_string(),
            tokens: vec!["ffmpeg".to_string()],
            command_line: "ffmpeg -i a.mp4 '[res]'".to_string(),
        }]);
        assert_eq!(out, "ffmpeg -i a.mp4 '[res]'\n");
    }

    #[test]
    fn test_skip_and_failure_lines() {
        let out = render(&[
            Event::OutputExists {
                event: "s@t".to_string(),
                output_path: PathBuf::from("/cam/s/out.mp4"),
            },
            Event::CompositionFailed {
                event: "s@t".to_string(),
                message: "Event s@t has no 'left_repeater' view".to_string(),
            },
        ]);
        assert!(out.contains("/cam/s/out.mp4 exists, skipping"));
        assert!(out.contains("has no 'left_repeater' view"));
    }

    #[test]
    fn test_progress_is_hidden_without_terminal() {
        let out = render(&[Event::EncodeProgress {
            frame: 10,
            fps: 30.0,
            time: "00:00:01.00".to_string(),
            speed: 1.0,
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_spinner_lives_for_one_encode() {
        let handler = ConsoleHandler::with_writer(Box::new(io::sink()));
        let output_path = PathBuf::from("/cam/s/out.mp4");

        handler.handle(&Event::EncodeStarted {
            event: "s@t".to_string(),
            output_path: output_path.clone(),
        });
        let pb = handler.progress.lock().unwrap().clone().expect("spinner started");
        assert!(pb.is_hidden());

        handler.handle(&Event::EncodeProgress {
            frame: 42,
            fps: 25.0,
            time: "00:00:01.68".to_string(),
            speed: 1.5,
        });
        assert_eq!(pb.message(), "frame 42  25.0 fps  time 00:00:01.68  speed 1.50x");

        handler.handle(&Event::EncodeFinished {
            event: "s@t".to_string(),
            output_path,
            elapsed: Duration::from_secs(3),
        });
        assert!(handler.progress.lock().unwrap().is_none());
        assert!(pb.is_finished());
    }

    #[test]
    fn test_encode_lines_without_progress_noise() {
        let out = render(&[
            Event::EncodeStarted {
                event: "s@t".to_string(),
                output_path: PathBuf::from("/cam/s/out.mp4"),
            },
            Event::EncodeProgress {
                frame: 42,
                fps: 25.0,
                time: "00:00:01.68".to_string(),
                speed: 1.5,
            },
            Event::EncodeFailed {
                event: "s@t".to_string(),
                message: "Command 'ffmpeg' failed".to_string(),
            },
        ]);
        assert!(out.contains("-> /cam/s/out.mp4"));
        assert!(out.contains("Command 'ffmpeg' failed"));
        assert!(!out.contains("frame 42"));
    }
}
