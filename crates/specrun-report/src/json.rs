//! JSON reporter - collect a run into one machine-readable document

use crate::result::{FailedExpectation, SpecResult};
use crate::stats::{RunSummary, Stats};
use crate::{ReportResult, ResultHandler};
use log::debug;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SuiteEntry {
    description: String,
    #[serde(flatten)]
    stats: Stats,
    duration_ms: u128,
    failures: Vec<FailureEntry>,
}

/// A failed expectation with the chain of suites leading to it
#[derive(Debug, Serialize)]
struct FailureEntry {
    suite: Vec<String>,
    #[serde(flatten)]
    expectation: FailedExpectation,
}

/// Every failed expectation under `root`, in the order the console prints them
fn collect_failures(root: &SpecResult) -> Vec<FailureEntry> {
    let mut failures = Vec::new();
    let mut trail: Vec<&str> = Vec::new();
    let mut pending = vec![(root, 0usize)];

    while let Some((node, level)) = pending.pop() {
        trail.truncate(level);
        trail.push(&node.description);

        for failed in &node.failed {
            failures.push(FailureEntry {
                suite: trail.iter().map(|s| s.to_string()).collect(),
                expectation: failed.clone(),
            });
        }

        pending.extend(node.children.iter().rev().map(|child| (child, level + 1)));
    }

    failures
}

/// Writes every handled suite and the run totals as JSON on `done`
pub struct JsonReporter<W: Write> {
    out: W,
    run_id: Option<String>,
    suites: Vec<SuiteEntry>,
    summary: RunSummary,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            run_id: None,
            suites: Vec::new(),
            summary: RunSummary::default(),
        }
    }

    /// Tag the document with the run's identifier
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultHandler for JsonReporter<W> {
    fn handle(&mut self, root: &SpecResult) -> ReportResult<()> {
        let stats = self.summary.record(root);
        self.suites.push(SuiteEntry {
            description: root.description.clone(),
            stats,
            duration_ms: root.duration.as_millis(),
            failures: collect_failures(root),
        });
        Ok(())
    }

    fn done(&mut self) -> ReportResult<()> {
        let document = serde_json::json!({
            "run_id": self.run_id,
            "passed": self.summary.passed,
            "failed": self.summary.failed,
            "duration_ms": self.summary.duration.as_millis(),
            "success": self.summary.success(),
            "suites": self.suites,
        });

        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()?;
        debug!("wrote JSON report for {} suites", self.suites.len());
        Ok(())
    }
}
