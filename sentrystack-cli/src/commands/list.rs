//! Implementation of `--list-dir`.

use crate::error::{CliErrorContext, CliResult};

use sentrystack_core::find_session_dirs;
use std::io::Write;
use std::path::Path;

/// Writes one session sub-directory per line, in sorted order.
pub fn run_list(sentry_dir: &Path, out: &mut impl Write) -> CliResult<usize> {
    let sessions = find_session_dirs(sentry_dir)?;
    for session in &sessions {
        writeln!(out, "{}", session.display()).cli_with_context(|| "Writing session list")?;
    }
    Ok(sessions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_directories() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("b"))?;
        fs::create_dir(dir.path().join("a"))?;
        fs::write(dir.path().join("note.txt"), "x")?;

        let mut out = Vec::new();
        let count = run_list(dir.path(), &mut out)?;

        assert_eq!(count, 2);
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("a"));
        assert!(lines[1].ends_with("b"));
        Ok(())
    }
}
