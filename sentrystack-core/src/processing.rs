//! Batch processing of discovered events.
//!
//! Events are handled strictly one after another. Each event is independent:
//! a composition error or an engine failure is recorded for that event and the
//! batch moves on. Only an unusable configuration or an unreadable sentry
//! directory stops a run.

use crate::config::StackConfig;
use crate::discovery::discover_events;
use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher};
use crate::external::{TranscodeCommand, TranscodeRunner, compose_stack_command};
use crate::sentry_event::SentryEvent;

use log::{info, warn};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    /// The engine ran and exited successfully.
    Encoded,
    /// Dry run: the command that would have run.
    Planned(TranscodeCommand),
    /// The output already existed and overwrite was off.
    Skipped,
    /// Composition or execution failed.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub event: String,
    pub output_path: PathBuf,
    pub status: EventStatus,
}

/// Per-event outcomes in processing order, plus the elapsed time.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<EventOutcome>,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn count(&self, pred: impl Fn(&EventStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    #[must_use]
    pub fn encoded(&self) -> usize {
        self.count(|s| matches!(s, EventStatus::Encoded))
    }

    #[must_use]
    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, EventStatus::Planned(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, EventStatus::Skipped))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, EventStatus::Failed(_)))
    }
}

/// Processes `events` in order.
///
/// For each event the command is composed first; the existing-output check
/// happens right after, just before the engine would start, so outputs
/// created earlier in the same run are seen.
pub fn process_events<R: TranscodeRunner>(
    events: &[SentryEvent],
    config: &StackConfig,
    runner: &R,
    dispatcher: &EventDispatcher,
) -> BatchSummary {
    let start = Instant::now();
    let params = config.params();
    let total = events.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, event) in events.iter().enumerate() {
        let id = event.to_string();
        let output_path = event.output_path(params.scale, params.speed, params.quality);
        dispatcher.emit(Event::EventStarted {
            event: id.clone(),
            current: index + 1,
            total,
            views: event.labels().map(|l| l.to_string()).collect(),
        });

        let status = match compose_stack_command(event, &params) {
            Err(e) => {
                warn!("Cannot compose command for {}: {}", id, e);
                dispatcher.emit(Event::CompositionFailed {
                    event: id.clone(),
                    message: e.to_string(),
                });
                EventStatus::Failed(e.to_string())
            }
            Ok(_) if !params.overwrite && output_path.exists() => {
                info!(
                    "Output '{}' exists, skipping {} (see --overwrite)",
                    output_path.display(),
                    id
                );
                dispatcher.emit(Event::OutputExists {
                    event: id.clone(),
                    output_path: output_path.clone(),
                });
                EventStatus::Skipped
            }
            Ok(command) if config.dry_run => {
                dispatcher.emit(Event::DryRun {
                    event: id.clone(),
                    tokens: command.tokens().map(str::to_string).collect(),
                    command_line: command.to_shell_string(),
                });
                EventStatus::Planned(command)
            }
            Ok(command) => {
                info!("Stacking {} -> {}", id, output_path.display());
                dispatcher.emit(Event::EncodeStarted {
                    event: id.clone(),
                    output_path: output_path.clone(),
                });
                let encode_start = Instant::now();
                match runner.run(&command, dispatcher) {
                    Ok(()) => {
                        dispatcher.emit(Event::EncodeFinished {
                            event: id.clone(),
                            output_path: output_path.clone(),
                            elapsed: encode_start.elapsed(),
                        });
                        EventStatus::Encoded
                    }
                    Err(e) => {
                        dispatcher.emit(Event::EncodeFailed {
                            event: id.clone(),
                            message: e.to_string(),
                        });
                        EventStatus::Failed(e.to_string())
                    }
                }
            }
        };

        outcomes.push(EventOutcome {
            event: id,
            output_path,
            status,
        });
    }

    BatchSummary {
        outcomes,
        elapsed: start.elapsed(),
    }
}

/// Discovers every event under `config.sentry_dir` and processes them.
///
/// # Errors
///
/// * `CoreError::InvalidConfig` - the configuration fails validation
/// * `CoreError::PathError` - the sentry directory cannot be read
pub fn stack_sentry_dir<R: TranscodeRunner>(
    config: &StackConfig,
    runner: &R,
    dispatcher: &EventDispatcher,
) -> CoreResult<BatchSummary> {
    config.validate()?;

    dispatcher.emit(Event::ScanStarted {
        sentry_dir: config.sentry_dir.clone(),
    });
    let events = discover_events(&config.sentry_dir)?;
    let sessions: BTreeSet<_> = events.iter().map(SentryEvent::session_dir).collect();
    info!(
        "Found {} event(s) in {} session(s)",
        events.len(),
        sessions.len()
    );
    dispatcher.emit(Event::EventsDiscovered {
        total_events: events.len(),
        total_sessions: sessions.len(),
    });

    let summary = process_events(&events, config, runner, dispatcher);
    dispatcher.emit(Event::BatchComplete {
        encoded: summary.encoded(),
        planned: summary.planned(),
        skipped: summary.skipped(),
        failed: summary.failed(),
        elapsed: summary.elapsed,
    });
    Ok(summary)
}
