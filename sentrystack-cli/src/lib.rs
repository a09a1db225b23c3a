// sentrystack-cli/src/lib.rs
//
// Library portion of the Sentrystack CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::list::run_list;
pub use commands::stack::{build_config, run_stack};
