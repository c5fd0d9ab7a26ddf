//! Per-server cost reconstruction for solved deployment-scheduling jobs.
//!
//! Given the deployments a scheduler assigned to each server, this crate
//! rebuilds how many calendar days a server was active, how many separate
//! deployment episodes it served, and what that cost. The layout keeps a
//! strict separation:
//!
//! - **[`core`]**: Pure, deterministic timeline and cost logic. No I/O,
//!   fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (job documents, configuration files).
//!
//! [`explain`] wires core logic to a loaded job document and [`report`]
//! formats the result for the CLI.

pub mod core;
pub mod exit_codes;
pub mod explain;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
