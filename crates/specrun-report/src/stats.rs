//! Pass/fail totals over result trees

use crate::result::SpecResult;
use serde::Serialize;
use std::ops::AddAssign;
use std::time::Duration;

/// Expectation counts of a whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub passed: usize,
    pub failed: usize,
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.failed += rhs.failed;
    }
}

/// Count every passed and failed expectation in the tree rooted at `root`
///
/// Each node is visited exactly once. Uses an explicit stack, so tree depth
/// is bounded by memory rather than the call stack.
pub fn aggregate(root: &SpecResult) -> Stats {
    let mut stats = Stats::default();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        stats += Stats {
            passed: node.passed.len(),
            failed: node.failed.len(),
        };
        pending.extend(node.children.iter());
    }

    stats
}

/// Running totals of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    /// Sum of the root durations handled so far
    pub duration: Duration,
}

impl RunSummary {
    /// Fold one root into the totals, returning that root's own stats
    pub fn record(&mut self, root: &SpecResult) -> Stats {
        let stats = aggregate(root);
        self.passed += stats.passed;
        self.failed += stats.failed;
        self.duration += root.duration;
        stats
    }

    /// True when no expectation failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn passed(node: SpecResult, n: usize) -> SpecResult {
        (0..n).fold(node, |acc, i| {
            acc.with_passed(format!("passes {}", i), Duration::from_millis(1))
        })
    }

    fn failed(node: SpecResult, n: usize) -> SpecResult {
        (0..n).fold(node, |acc, i| acc.with_failed(format!("fails {}", i), ["boom"]))
    }

    #[test]
    fn test_aggregate_root_and_child() {
        let child = passed(SpecResult::new("child"), 3);
        let root = failed(passed(SpecResult::new("root"), 2), 1).with_child(child);

        assert_eq!(
            aggregate(&root),
            Stats {
                passed: 5,
                failed: 1
            }
        );
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&SpecResult::new("empty")), Stats::default());
    }

    #[test]
    fn test_aggregate_wide_and_nested() {
        let grandchild = failed(SpecResult::new("gc"), 2);
        let a = passed(SpecResult::new("a"), 1).with_child(grandchild);
        let b = passed(SpecResult::new("b"), 4);
        let root = SpecResult::new("root").with_child(a).with_child(b);

        assert_eq!(
            aggregate(&root),
            Stats {
                passed: 5,
                failed: 2
            }
        );
    }

    #[test]
    fn test_aggregate_deep_tree() {
        let mut node = passed(SpecResult::new("leaf"), 1);
        for i in 0..50_000 {
            node = failed(SpecResult::new(format!("level {}", i)), 1).with_child(node);
        }

        assert_eq!(
            aggregate(&node),
            Stats {
                passed: 1,
                failed: 50_000
            }
        );
    }

    #[test]
    fn test_run_summary_accumulates() {
        let mut summary = RunSummary::default();

        let first = passed(SpecResult::new("one"), 2).with_duration(Duration::from_millis(10));
        let second = failed(SpecResult::new("two"), 1).with_duration(Duration::from_millis(5));

        assert_eq!(summary.record(&first).failed, 0);
        assert!(summary.success());
        summary.record(&second);

        assert_eq!(
            summary,
            RunSummary {
                passed: 2,
                failed: 1,
                duration: Duration::from_millis(15),
            }
        );
        assert!(!summary.success());
    }
}
