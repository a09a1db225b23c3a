//! Event discovery for a sentry directory.
//!
//! A sentry directory holds one sub-directory per recording session. Each
//! session holds clips named `YYYY-MM-DD_HH-MM-SS-<view>.mp4`. Clips sharing a
//! timestamp (to the second) form one [`SentryEvent`]. Anything else found in
//! a session, such as thumbnails, event metadata or previous stacked outputs,
//! is skipped silently.

use crate::error::{CoreError, CoreResult};
use crate::naming::{CaptureTimestamp, ViewLabel, parse_video_name};
use crate::sentry_event::SentryEvent;

use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Lists the session sub-directories of `sentry_dir`, sorted by path.
///
/// # Errors
///
/// * `CoreError::PathError` - if `sentry_dir` is missing, unreadable or not a directory
///
/// # Examples
///
/// ```rust,no_run
/// use sentrystack_core::find_session_dirs;
/// use std::path::Path;
///
/// for session in find_session_dirs(Path::new("/media/TeslaCam/SentryClips")).unwrap() {
///     println!("{}", session.display());
/// }
/// ```
pub fn find_session_dirs(sentry_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = fs::read_dir(sentry_dir).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to read sentry directory '{}': {}",
            sentry_dir.display(),
            e
        ))
    })?;

    let mut sessions: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.is_dir().then_some(path)
        })
        .collect();
    sessions.sort();
    Ok(sessions)
}

/// Groups a session's directory entries into events.
///
/// Entries are processed in name order, so when two clips claim the same
/// camera for one timestamp the first name wins, and repeated runs over the
/// same listing always produce the same events. Events come back in
/// ascending timestamp order. Groups with fewer than four cameras are kept
/// as they are.
pub fn group_entries<I, S>(sentry_dir: &Path, session_dir: &Path, entries: I) -> Vec<SentryEvent>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = entries.into_iter().map(Into::into).collect();
    names.sort();

    let mut groups: BTreeMap<CaptureTimestamp, BTreeMap<ViewLabel, PathBuf>> = BTreeMap::new();
    for name in names {
        let Some(parsed) = parse_video_name(&name) else {
            debug!("Skipping '{name}': not a recorder clip");
            continue;
        };
        let Some(label) = parsed.view() else {
            debug!("Skipping '{name}': unknown camera '{}'", parsed.view_suffix);
            continue;
        };

        let views = groups.entry(parsed.timestamp).or_default();
        if views.contains_key(&label) {
            debug!("Skipping '{name}': {label} clip already present for this timestamp");
            continue;
        }
        views.insert(label, PathBuf::from(name));
    }

    groups
        .into_iter()
        .map(|(timestamp, views)| SentryEvent::new(sentry_dir, session_dir, timestamp, views))
        .collect()
}

/// Reads one session directory and groups its clips into events.
///
/// Only regular, non-hidden files take part. `session_dir` is relative to
/// `sentry_dir`.
pub fn group_session(sentry_dir: &Path, session_dir: &Path) -> CoreResult<Vec<SentryEvent>> {
    let dir = sentry_dir.join(session_dir);
    let names = fs::read_dir(&dir)?.filter_map(|entry| {
        let path = entry.ok()?.path();
        if !path.is_file() {
            return None;
        }
        let name = path.file_name()?.to_str()?.to_string();
        (!name.starts_with('.')).then_some(name)
    });

    Ok(group_entries(sentry_dir, session_dir, names))
}

/// Discovers every event under `sentry_dir`.
///
/// Sessions are visited in name order. A session that cannot be read is
/// reported and skipped; only an unreadable `sentry_dir` fails the scan.
pub fn discover_events(sentry_dir: &Path) -> CoreResult<Vec<SentryEvent>> {
    let mut events = Vec::new();
    for session_path in find_session_dirs(sentry_dir)? {
        let Some(session_dir) = session_path.file_name().map(PathBuf::from) else {
            continue;
        };
        match group_session(sentry_dir, &session_dir) {
            Ok(found) => {
                debug!(
                    "Session '{}': {} event(s)",
                    session_dir.display(),
                    found.len()
                );
                events.extend(found);
            }
            Err(e) => warn!("Skipping session '{}': {}", session_path.display(), e),
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "./events";
    const SESSION: &str = "2024-01-02_03-04-05";

    fn group(names: &[&str]) -> Vec<SentryEvent> {
        group_entries(Path::new(ROOT), Path::new(SESSION), names.iter().copied())
    }

    #[test]
    fn test_groups_by_exact_timestamp() {
        let events = group(&[
            "2024-01-02_03-04-05-front.mp4",
            "2024-01-02_03-04-05-back.mp4",
            "2024-01-02_03-04-06-front.mp4",
            "2024-01-02_03-04-05-left_repeater.mp4",
            "2024-01-02_03-04-05-right_repeater.mp4",
        ]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].view_count(), 4);
        assert_eq!(events[1].view_count(), 1);
        assert!(events[0].timestamp() < events[1].timestamp());
    }

    #[test]
    fn test_unparseable_entries_are_dropped() {
        let events = group(&[
            "event.json",
            "thumb.png",
            "2024-01-02_03-04-05-front.mp4",
            "2024-01-02_03-04-05-pillar.mp4",
            "2024-01-02-03-04-05_st4_sp1_q23.mp4",
        ]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].labels().collect::<Vec<_>>(), vec![ViewLabel::Front]);
    }

    #[test]
    fn test_grouping_ignores_listing_order() {
        let mut names = vec![
            "2024-01-02_03-04-05-right_repeater.mp4",
            "2024-01-02_03-04-05-front.mp4",
            "2024-01-02_03-04-07-back.mp4",
            "2024-01-02_03-04-05-back.mp4",
        ];
        let first = group(&names);
        names.reverse();
        assert_eq!(first, group(&names));
    }

    #[test]
    fn test_duplicate_view_keeps_first_name() {
        let events = group(&[
            "2024-01-02_03-04-05-front_b.mp4",
            "2024-01-02_03-04-05-front_a.mp4",
        ]);
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].view(ViewLabel::Front),
            Some(PathBuf::from(ROOT).join(SESSION).join("2024-01-02_03-04-05-front_a.mp4"))
        );
    }

    #[test]
    fn test_empty_listing() {
        assert!(group(&[]).is_empty());
    }
}
