//! I/O helpers for costline commands.

pub mod config;
pub mod job;
