// ============================================================================
// sentrystack-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the ffmpeg transcoding engine
//
// This module encapsulates everything that concerns the external engine:
// composing the stacking command for an event, running it, and checking that
// the engine binary is available at all.
//
// DESIGN PHILOSOPHY:
// Command composition is pure and lives apart from execution, so the exact
// tokens can be inspected (dry-run, tests) without spawning anything. The
// runner is a trait so the batch runner can be driven by a mock.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Builds the stacking command for an event
pub mod stack_command;

/// Runs composed commands
pub mod ffmpeg_executor;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{SidecarRunner, TranscodeRunner};
pub use stack_command::{
    ENGINE_LOG_LEVEL, FilterGraph, STACK_INPUTS, TranscodeCommand, compose_stack_command,
    stack_filter_graph,
};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that the engine binary can be started.
///
/// Runs `<cmd_name> -version` with output discarded. Only the ability to start
/// the process matters; its exit status is not inspected.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - the binary does not exist
/// * `CoreError::CommandStart` - it exists but could not be started
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependency_missing_binary() {
        let result = check_dependency("surely_this_engine_does_not_exist_42");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
