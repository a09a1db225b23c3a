//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific mode of operation.

/// Listing the session sub-directories of a sentry directory.
pub mod list;

/// Stacking every discovered event.
pub mod stack;
