//! JSON progress handler for structured progress output
//!
//! Writes one JSON object per line for every run event, for consumption by
//! scripts wrapping the stacker.

use super::{Event, EventHandler};
use crate::error::CoreResult;
use log::warn;
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs run events as structured JSON to stdout
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: &serde_json::Value) -> CoreResult<()> {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *output, value)?;
        writeln!(output)?;
        output.flush()?;
        Ok(())
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        let timestamp = Self::get_timestamp();

        let value = match event {
            Event::ScanStarted { sentry_dir } => json!({
                "type": "scan_started",
                "sentry_dir": sentry_dir,
                "timestamp": timestamp
            }),

            Event::EventsDiscovered {
                total_events,
                total_sessions,
            } => json!({
                "type": "events_discovered",
                "total_events": total_events,
                "total_sessions": total_sessions,
                "timestamp": timestamp
            }),

            Event::EventStarted {
                event,
                current,
                total,
                views,
            } => json!({
                "type": "event_started",
                "event": event,
                "current": current,
                "total": total,
                "views": views,
                "timestamp": timestamp
            }),

            Event::OutputExists { event, output_path } => json!({
                "type": "output_exists",
                "event": event,
                "output_path": output_path,
                "timestamp": timestamp
            }),

            Event::CompositionFailed { event, message } => json!({
                "type": "composition_failed",
                "event": event,
                "message": message,
                "timestamp": timestamp
            }),

            Event::DryRun {
                event,
                tokens,
                command_line,
            } => json!({
                "type": "dry_run",
                "event": event,
                "tokens": tokens,
                "command_line": command_line,
                "timestamp": timestamp
            }),

            Event::EncodeStarted { event, output_path } => json!({
                "type": "encode_started",
                "event": event,
                "output_path": output_path,
                "timestamp": timestamp
            }),

            Event::EncodeProgress {
                frame,
                fps,
                time,
                speed,
            } => json!({
                "type": "encode_progress",
                "frame": frame,
                "fps": fps,
                "time": time,
                "speed": speed,
                "timestamp": timestamp
            }),

            Event::EncodeFinished {
                event,
                output_path,
                elapsed,
            } => json!({
                "type": "encode_finished",
                "event": event,
                "output_path": output_path,
                "duration_seconds": elapsed.as_secs_f64(),
                "timestamp": timestamp
            }),

            Event::EncodeFailed { event, message } => json!({
                "type": "encode_failed",
                "event": event,
                "message": message,
                "timestamp": timestamp
            }),

            Event::BatchComplete {
                encoded,
                planned,
                skipped,
                failed,
                elapsed,
            } => json!({
                "type": "batch_complete",
                "encoded": encoded,
                "planned": planned,
                "skipped": skipped,
                "failed": failed,
                "total_duration_seconds": elapsed.as_secs_f64(),
                "timestamp": timestamp
            }),
        };

        if let Err(e) = self.write_json(&value) {
            warn!("Failed to write JSON progress: {}", e);
        }
    }
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct MockWriter {
        content: Arc<Mutex<Vec<u8>>>,
    }

    impl MockWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let content = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    content: content.clone(),
                },
                content,
            )
        }
    }

    impl Write for MockWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.content.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(event: &Event) -> serde_json::Value {
        let (writer, content) = MockWriter::new();
        let handler = JsonProgressHandler::with_writer(Box::new(writer));
        handler.handle(event);
        let output = String::from_utf8(content.lock().unwrap().clone()).unwrap();
        serde_json::from_str(output.trim()).unwrap()
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported_not_panicked() {
        let handler = JsonProgressHandler::with_writer(Box::new(ClosedWriter));
        let result = handler.write_json(&json!({"type": "scan_started"}));
        assert!(matches!(result, Err(crate::error::CoreError::Json(_))));

        // The handler itself swallows the failure after logging it.
        handler.handle(&Event::EventsDiscovered {
            total_events: 1,
            total_sessions: 1,
        });
    }

    #[test]
    fn test_dry_run_json() {
        let parsed = render(&Event::DryRun {
            event: "2024-01-02_03-04-05@2024-01-02-03-04-05".to_string(),
            tokens: vec!["ffmpeg".to_string(), "-an".to_string()],
            command_line: "ffmpeg -an".to_string(),
        });

        assert_eq!(parsed["type"], "dry_run");
        assert_eq!(parsed["tokens"][0], "ffmpeg");
        assert_eq!(parsed["tokens"][1], "-an");
        assert_eq!(parsed["command_line"], "ffmpeg -an");
    }

    #[test]
    fn test_output_exists_json() {
        let parsed = render(&Event::OutputExists {
            event: "s@t".to_string(),
            output_path: PathBuf::from("/cam/s/out.mp4"),
        });
        assert_eq!(parsed["type"], "output_exists");
        assert_eq!(parsed["output_path"], "/cam/s/out.mp4");
    }

    #[test]
    fn test_batch_complete_json() {
        let parsed = render(&Event::BatchComplete {
            encoded: 3,
            planned: 0,
            skipped: 1,
            failed: 2,
            elapsed: Duration::from_secs(90),
        });
        assert_eq!(parsed["type"], "batch_complete");
        assert_eq!(parsed["encoded"], 3);
        assert_eq!(parsed["skipped"], 1);
        assert_eq!(parsed["failed"], 2);
        assert_eq!(parsed["total_duration_seconds"], 90.0);
    }
}
