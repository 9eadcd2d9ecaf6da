//! Process exit codes shared by every command
//!
//! `doctor` maps its worst check status onto these; the documentation
//! commands use [`EXIT_WARNING`] for FogBugz or network failures and
//! [`EXIT_ERROR`] for bad input or missing configuration.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Warnings found, or a general runtime failure
pub const EXIT_WARNING: i32 = 1;

/// Invalid input, missing configuration or failed checks
pub const EXIT_ERROR: i32 = 2;
