//! Core library for stacking multi-camera sentry recordings with ffmpeg.
//!
//! Vehicle sentry recorders write one clip per camera (front, back, left and
//! right repeater) for every capture instant. This crate finds those clips,
//! groups them into events by their timestamp, and composes the ffmpeg
//! command that scales the four views, stacks them into a 2x2 grid and
//! optionally speeds the result up.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sentrystack_core::config::StackConfigBuilder;
//! use sentrystack_core::events::{EventDispatcher, JsonProgressHandler};
//! use sentrystack_core::{SidecarRunner, stack_sentry_dir};
//! use std::sync::Arc;
//!
//! let config = StackConfigBuilder::new()
//!     .sentry_dir("/media/TeslaCam/SentryClips")
//!     .speed(2)
//!     .build();
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
//!
//! let summary = stack_sentry_dir(&config, &SidecarRunner::new(), &dispatcher).unwrap();
//! println!("{} encoded, {} failed", summary.encoded(), summary.failed());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod external;
pub mod naming;
pub mod processing;
pub mod sentry_event;
pub mod utils;

// Re-exports for public API
pub use config::{ProcessingParams, StackConfig};
pub use discovery::{discover_events, find_session_dirs, group_entries, group_session};
pub use error::{CoreError, CoreResult};
pub use external::{
    SidecarRunner, TranscodeCommand, TranscodeRunner, check_dependency, compose_stack_command,
};
pub use naming::{CaptureTimestamp, ParsedVideoName, ViewLabel, parse_video_name};
pub use processing::{
    BatchSummary, EventOutcome, EventStatus, process_events, stack_sentry_dir,
};
pub use sentry_event::{BackViewFallback, SentryEvent, front_for_missing_back};
pub use utils::{format_duration, format_elapsed};
