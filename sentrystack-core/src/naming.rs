//! Recorder file name parsing.
//!
//! Sentry recorders name every clip `YYYY-MM-DD_HH-MM-SS-<view>.mp4`, where
//! `<view>` identifies the camera. Firmware revisions append extra text to the
//! camera part, so the camera is classified by substring rather than by exact
//! comparison.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Capture instant shared by all clips of one event, second resolution.
pub type CaptureTimestamp = NaiveDateTime;

/// Format used when a capture timestamp is embedded in output names.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

static VIDEO_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})_(?P<hour>\d{2})-(?P<min>\d{2})-(?P<sec>\d{2})-(?P<view>.*)\.(?i:mp4)$",
    )
    .expect("video name pattern is valid")
});

/// One of the four camera angles of a sentry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLabel {
    Front,
    Back,
    Left,
    Right,
}

impl ViewLabel {
    pub const ALL: [ViewLabel; 4] = [
        ViewLabel::Front,
        ViewLabel::Back,
        ViewLabel::Left,
        ViewLabel::Right,
    ];

    /// Text the recorder embeds in the file name for this camera.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            ViewLabel::Front => "front",
            ViewLabel::Back => "back",
            ViewLabel::Left => "left_repeater",
            ViewLabel::Right => "right_repeater",
        }
    }

    /// Short name used for the scaled stream in the filter graph.
    #[must_use]
    pub const fn stream_label(self) -> &'static str {
        match self {
            ViewLabel::Front => "front",
            ViewLabel::Back => "back",
            ViewLabel::Left => "left",
            ViewLabel::Right => "right",
        }
    }

    /// Classifies the camera part of a file name. The first label whose
    /// marker occurs anywhere in `suffix` wins.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| suffix.contains(label.marker()))
    }
}

impl fmt::Display for ViewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A file name that matched the recorder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVideoName {
    pub timestamp: CaptureTimestamp,
    /// Everything between the timestamp and the extension.
    pub view_suffix: String,
}

impl ParsedVideoName {
    #[must_use]
    pub fn view(&self) -> Option<ViewLabel> {
        ViewLabel::from_suffix(&self.view_suffix)
    }
}

/// Parses a bare file name (not a path).
///
/// Returns `None` for anything that is not a recorder clip, including names
/// whose digits do not form a real calendar date and time. Callers skip such
/// entries; this is not an error.
#[must_use]
pub fn parse_video_name(file_name: &str) -> Option<ParsedVideoName> {
    let caps = VIDEO_NAME_RE.captures(file_name)?;
    let field = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = i32::try_from(field("year")?).ok()?;
    let timestamp = NaiveDate::from_ymd_opt(year, field("month")?, field("day")?)?
        .and_hms_opt(field("hour")?, field("min")?, field("sec")?)?;

    Some(ParsedVideoName {
        timestamp,
        view_suffix: caps["view"].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CaptureTimestamp {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_all_four_views() {
        let cases = [
            ("2024-01-02_03-04-05-front.mp4", ViewLabel::Front),
            ("2024-01-02_03-04-05-back.mp4", ViewLabel::Back),
            ("2024-01-02_03-04-05-left_repeater.mp4", ViewLabel::Left),
            ("2024-01-02_03-04-05-right_repeater.mp4", ViewLabel::Right),
        ];
        for (name, view) in cases {
            let parsed = parse_video_name(name).expect(name);
            assert_eq!(parsed.timestamp, ts(2024, 1, 2, 3, 4, 5));
            assert_eq!(parsed.view(), Some(view), "{name}");
        }
    }

    #[test]
    fn test_view_suffix_with_extra_text() {
        let parsed = parse_video_name("2019-11-30_23-59-01-left_repeater_cam2.mp4").unwrap();
        assert_eq!(parsed.timestamp, ts(2019, 11, 30, 23, 59, 1));
        assert_eq!(parsed.view_suffix, "left_repeater_cam2");
        assert_eq!(parsed.view(), Some(ViewLabel::Left));
    }

    #[test]
    fn test_unknown_view_parses_without_label() {
        let parsed = parse_video_name("2024-01-02_03-04-05-pillar.mp4").unwrap();
        assert_eq!(parsed.view(), None);
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        assert!(parse_video_name("2024-01-02_03-04-05-front.MP4").is_some());
    }

    #[test]
    fn test_rejects_non_recorder_names() {
        for name in [
            "event.json",
            "thumb.png",
            "2024-01-02_03-04-05-front.png",
            "2024-01-02_03-04-05",
            "2024-1-02_03-04-05-front.mp4",
            "2024-01-02_3-04-05-front.mp4",
            "20240-01-02_03-04-05-front.mp4",
            "x2024-01-02_03-04-05-front.mp4",
            "2024-01-02-03-04-05_st4_sp1_q23.mp4",
        ] {
            assert!(parse_video_name(name).is_none(), "{name} should not parse");
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(parse_video_name("2024-13-02_03-04-05-front.mp4").is_none());
        assert!(parse_video_name("2023-02-29_03-04-05-front.mp4").is_none());
        assert!(parse_video_name("2024-01-02_24-04-05-front.mp4").is_none());
    }

    #[test]
    fn test_view_label_from_suffix() {
        assert_eq!(ViewLabel::from_suffix("front"), Some(ViewLabel::Front));
        assert_eq!(ViewLabel::from_suffix("back"), Some(ViewLabel::Back));
        assert_eq!(ViewLabel::from_suffix("right_repeater"), Some(ViewLabel::Right));
        assert_eq!(ViewLabel::from_suffix("left"), None);
        assert_eq!(ViewLabel::from_suffix(""), None);
    }
}
