//! Stable exit codes for `costline` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to an unreadable job document, bad config, or other errors.
pub const INVALID: i32 = 1;
/// Strict date policy rejected at least one deployment record. The report is
/// still printed.
pub const REJECTED: i32 = 2;
