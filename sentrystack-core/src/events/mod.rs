//! Progress reporting for a stacking run.
//!
//! The core never prints. It emits [`Event`]s through an [`EventDispatcher`]
//! and whoever drives the run registers the handlers that render them: the
//! CLI's console handler, the [`JsonProgressHandler`], or a recording handler
//! in tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod json_handler;

pub use json_handler::JsonProgressHandler;

#[derive(Debug, Clone)]
pub enum Event {
    ScanStarted {
        sentry_dir: PathBuf,
    },

    EventsDiscovered {
        total_events: usize,
        total_sessions: usize,
    },

    // Per-event events
    EventStarted {
        event: String,
        current: usize,
        total: usize,
        views: Vec<String>,
    },

    OutputExists {
        event: String,
        output_path: PathBuf,
    },

    CompositionFailed {
        event: String,
        message: String,
    },

    DryRun {
        event: String,
        tokens: Vec<String>,
        command_line: String,
    },

    EncodeStarted {
        event: String,
        output_path: PathBuf,
    },

    EncodeProgress {
        frame: u32,
        fps: f32,
        time: String,
        speed: f32,
    },

    EncodeFinished {
        event: String,
        output_path: PathBuf,
        elapsed: Duration,
    },

    EncodeFailed {
        event: String,
        message: String,
    },

    // Batch events
    BatchComplete {
        encoded: usize,
        planned: usize,
        skipped: usize,
        failed: usize,
        elapsed: Duration,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
