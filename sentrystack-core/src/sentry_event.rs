//! The sentry event model.
//!
//! A [`SentryEvent`] is one capture instant recorded by up to four cameras.
//! It knows where its clips live, which camera each clip belongs to, and
//! where the stacked output for a given set of parameters goes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::naming::{CaptureTimestamp, OUTPUT_TIMESTAMP_FORMAT, ViewLabel};

/// Policy for an event whose back camera clip is absent.
///
/// Recorders running firmware older than 10.0 never wrote a back camera
/// clip. Stacking still needs four inputs, so by default the front clip is
/// fed in its place. The policy never fills any other view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackViewFallback {
    /// Feed the front clip where the back clip is missing.
    #[default]
    UseFront,
    /// Treat a missing back clip like any other missing view.
    Strict,
}

impl BackViewFallback {
    /// Returns the clip to use for `missing`, if this policy covers it.
    #[must_use]
    pub fn substitute(self, event: &SentryEvent, missing: ViewLabel) -> Option<PathBuf> {
        match self {
            BackViewFallback::UseFront => front_for_missing_back(event, missing),
            BackViewFallback::Strict => None,
        }
    }
}

/// Front clip as a stand-in for an absent back clip. `None` for every other
/// view, and when the front clip is itself missing.
#[must_use]
pub fn front_for_missing_back(event: &SentryEvent, missing: ViewLabel) -> Option<PathBuf> {
    if missing == ViewLabel::Back {
        event.view(ViewLabel::Front)
    } else {
        None
    }
}

/// One synchronized capture across the cameras of a session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentryEvent {
    sentry_dir: PathBuf,
    session_dir: PathBuf,
    timestamp: CaptureTimestamp,
    views: BTreeMap<ViewLabel, PathBuf>,
}

impl SentryEvent {
    /// `session_dir` is relative to `sentry_dir`; `views` maps each camera to
    /// a file name inside the session directory.
    #[must_use]
    pub fn new(
        sentry_dir: impl Into<PathBuf>,
        session_dir: impl Into<PathBuf>,
        timestamp: CaptureTimestamp,
        views: BTreeMap<ViewLabel, PathBuf>,
    ) -> Self {
        Self {
            sentry_dir: sentry_dir.into(),
            session_dir: session_dir.into(),
            timestamp,
            views,
        }
    }

    #[must_use]
    pub fn sentry_dir(&self) -> &Path {
        &self.sentry_dir
    }

    #[must_use]
    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    #[must_use]
    pub fn timestamp(&self) -> CaptureTimestamp {
        self.timestamp
    }

    /// Directory holding this event's clips and its stacked output.
    #[must_use]
    pub fn event_dir(&self) -> PathBuf {
        self.sentry_dir.join(&self.session_dir)
    }

    /// Cameras present, in front/back/left/right order.
    pub fn labels(&self) -> impl Iterator<Item = ViewLabel> + '_ {
        self.views.keys().copied()
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Full path of the clip recorded by `label`, if there is one.
    #[must_use]
    pub fn view(&self, label: ViewLabel) -> Option<PathBuf> {
        self.views.get(&label).map(|name| self.event_dir().join(name))
    }

    /// Clip for `label`, falling back to `policy` when it is absent.
    pub fn resolve_view(&self, label: ViewLabel, policy: BackViewFallback) -> CoreResult<PathBuf> {
        if let Some(path) = self.view(label) {
            return Ok(path);
        }
        if let Some(path) = policy.substitute(self, label) {
            log::debug!("{self}: no {label} clip, substituting {}", path.display());
            return Ok(path);
        }
        Err(CoreError::MissingView {
            event: self.to_string(),
            view: label.to_string(),
        })
    }

    /// Stacked output location for the given parameters.
    ///
    /// Pure: identical inputs always give the same path, which is what the
    /// skip-if-exists check relies on.
    #[must_use]
    pub fn output_path(&self, scale: u32, speed: u32, quality: u32) -> PathBuf {
        self.event_dir().join(format!(
            "{}_st{scale}_sp{speed}_q{quality}.mp4",
            self.timestamp.format(OUTPUT_TIMESTAMP_FORMAT)
        ))
    }
}

impl fmt::Display for SentryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            self.session_dir.display(),
            self.timestamp.format(OUTPUT_TIMESTAMP_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> CaptureTimestamp {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    fn event_with(labels: &[ViewLabel]) -> SentryEvent {
        let views = labels
            .iter()
            .map(|label| {
                (
                    *label,
                    PathBuf::from(format!("2024-01-02_03-04-05-{}.mp4", label.marker())),
                )
            })
            .collect();
        SentryEvent::new("./events", "2024-01-02_03-04-05", timestamp(), views)
    }

    #[test]
    fn test_view_joins_event_dir() {
        let event = event_with(&ViewLabel::ALL);
        assert_eq!(
            event.view(ViewLabel::Left),
            Some(PathBuf::from(
                "./events/2024-01-02_03-04-05/2024-01-02_03-04-05-left_repeater.mp4"
            ))
        );
    }

    #[test]
    fn test_output_path_format() {
        let event = event_with(&ViewLabel::ALL);
        assert_eq!(
            event.output_path(4, 2, 20),
            PathBuf::from("./events/2024-01-02_03-04-05/2024-01-02-03-04-05_st4_sp2_q20.mp4")
        );
    }

    #[test]
    fn test_output_path_is_idempotent_and_parameter_sensitive() {
        let event = event_with(&[ViewLabel::Front]);
        let base = event.output_path(4, 1, 23);
        assert_eq!(base, event.output_path(4, 1, 23));
        assert_ne!(base, event.output_path(2, 1, 23));
        assert_ne!(base, event.output_path(4, 3, 23));
        assert_ne!(base, event.output_path(4, 1, 28));
    }

    #[test]
    fn test_missing_back_uses_front() {
        let event = event_with(&[ViewLabel::Front, ViewLabel::Left, ViewLabel::Right]);
        let back = event
            .resolve_view(ViewLabel::Back, BackViewFallback::UseFront)
            .unwrap();
        assert_eq!(Some(back), event.view(ViewLabel::Front));
    }

    #[test]
    fn test_strict_policy_reports_missing_back() {
        let event = event_with(&[ViewLabel::Front, ViewLabel::Left, ViewLabel::Right]);
        let err = event
            .resolve_view(ViewLabel::Back, BackViewFallback::Strict)
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingView { ref view, .. } if view == "back"));
    }

    #[test]
    fn test_fallback_never_masks_other_views() {
        let event = event_with(&[ViewLabel::Front]);
        for label in [ViewLabel::Left, ViewLabel::Right] {
            assert!(event.resolve_view(label, BackViewFallback::UseFront).is_err());
        }

        let no_front = event_with(&[ViewLabel::Back, ViewLabel::Left, ViewLabel::Right]);
        assert!(
            no_front
                .resolve_view(ViewLabel::Front, BackViewFallback::UseFront)
                .is_err()
        );
    }

    #[test]
    fn test_back_fallback_requires_front() {
        let event = event_with(&[ViewLabel::Left, ViewLabel::Right]);
        assert!(front_for_missing_back(&event, ViewLabel::Back).is_none());
    }

    #[test]
    fn test_display() {
        let event = event_with(&[ViewLabel::Front]);
        assert_eq!(event.to_string(), "2024-01-02_03-04-05@2024-01-02-03-04-05");
    }
}
