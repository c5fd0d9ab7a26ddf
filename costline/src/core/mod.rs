//! Deterministic, pure timeline and cost logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! intervals and rates and return deterministic outputs suitable for tests.

pub mod cost;
pub mod coverage;
pub mod day;
pub mod episodes;
pub mod interval;
