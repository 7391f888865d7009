//! Spec result aggregation and reporting
//!
//! Consumes the result trees produced by executed spec suites:
//! - [`SpecResult`]: one node of a suite's outcome tree
//! - [`aggregate`]: pass/fail totals over a whole tree
//! - [`Reporter`]: console output and run totals
//! - [`JsonReporter`]: machine-readable run report
//!
//! Handlers keep running totals without locking. When suites execute
//! concurrently, the caller must funnel results through one consumer so
//! `handle` calls never overlap.

pub mod console;
pub mod json;
pub mod result;
pub mod stats;

use thiserror::Error;

/// Reporting errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Malformed result tree: missing child at {path}")]
    MalformedNode { path: String },

    #[error("Failed to decode spec results: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reporting operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Consumer of completed result trees for one run
///
/// `handle` is called once per executed suite, in order; `done` once at the
/// end. A handler must not receive `handle` after `done`.
pub trait ResultHandler {
    fn handle(&mut self, root: &SpecResult) -> ReportResult<()>;

    fn done(&mut self) -> ReportResult<()>;
}

// Re-export main types
pub use console::Reporter;
pub use json::JsonReporter;
pub use result::{decode, FailedExpectation, PassedExpectation, SpecResult};
pub use stats::{aggregate, RunSummary, Stats};
