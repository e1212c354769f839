//! Sink writers
//!
//! Three interchangeable destinations for count records:
//!
//! - [`console`] - process log lines via `tracing`
//! - [`cloud_log`] - text entries in a named Cloud Logging stream
//! - [`storage`] - one Cloud Storage object, fully overwritten per run
//!
//! A run may write to any subset; sinks never fail the run.

pub mod cloud_log;
pub mod console;
pub mod storage;

use clap::ValueEnum;

/// Sink selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Process log (stderr)
    Console,
    /// Cloud Logging stream
    CloudLog,
    /// Cloud Storage blob overwrite
    Storage,
}
