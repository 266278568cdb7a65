//! Shared `tracing` setup for the Uptick binaries.

mod tracing;

pub use crate::tracing::{LogFormat, init_tracing, init_tracing_with};
