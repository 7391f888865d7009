//! Console reporter - print result trees and run totals

use crate::result::SpecResult;
use crate::stats::RunSummary;
use crate::{ReportResult, ResultHandler};
use colored::*;
use std::io::{self, Write};

/// Prints each handled suite and the totals of the run
///
/// A suite with no failures collapses to one line unless `verbose` is set;
/// a suite with any failure is always printed in full.
pub struct Reporter<W: Write = io::Stdout> {
    out: W,
    /// Print passing suites in full
    verbose: bool,
    /// Disable colored output
    no_color: bool,
    summary: RunSummary,
}

impl Reporter {
    /// Create a reporter writing to stdout
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to `out`
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            no_color: false,
            summary: RunSummary::default(),
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Totals so far
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Record one suite's results and print them
    pub fn handle(&mut self, root: &SpecResult) -> ReportResult<()> {
        let stats = self.summary.record(root);

        if self.verbose || stats.failed > 0 {
            self.print_tree(root)?;
        } else {
            let mark = self.paint("✔", Color::Green);
            writeln!(self.out, "{} {}", mark, root.description)?;
        }
        Ok(())
    }

    /// Print the run totals
    ///
    /// The reporter is finished afterwards; do not call `handle` again.
    pub fn done(&mut self) -> ReportResult<()> {
        let summary = self.summary;
        let failed = if summary.failed > 0 {
            self.paint(&summary.failed.to_string(), Color::Red)
        } else {
            summary.failed.to_string()
        };
        writeln!(
            self.out,
            "Passed: {} Failed: {} in {:.2?}",
            summary.passed, failed, summary.duration
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Print the whole tree, two spaces of indent per level
    fn print_tree(&mut self, root: &SpecResult) -> io::Result<()> {
        let pass_mark = self.paint("✔", Color::Green);
        let fail_mark = self.paint("✖", Color::Red);
        let mut pending = vec![(root, 0usize)];

        while let Some((node, level)) = pending.pop() {
            writeln!(self.out, "{}{}:", indent(level), node.description)?;

            for failure in &node.failed {
                writeln!(
                    self.out,
                    "{}{} {}:",
                    indent(level + 1),
                    fail_mark,
                    failure.description
                )?;
                for message in &failure.messages {
                    writeln!(self.out, "{}-- {}", indent(level + 2), message)?;
                }
            }

            for pass in &node.passed {
                writeln!(
                    self.out,
                    "{}{} {} ({:.2?})",
                    indent(level + 1),
                    pass_mark,
                    pass.description,
                    pass.duration
                )?;
            }

            // Reversed so children pop in declaration order
            pending.extend(node.children.iter().rev().map(|child| (child, level + 1)));
        }

        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.color(color).bold().to_string()
        }
    }
}

impl<W: Write> ResultHandler for Reporter<W> {
    fn handle(&mut self, root: &SpecResult) -> ReportResult<()> {
        Reporter::handle(self, root)
    }

    fn done(&mut self) -> ReportResult<()> {
        Reporter::done(self)
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn reporter(verbose: bool) -> Reporter<Vec<u8>> {
        Reporter::with_writer(Vec::new(), verbose).with_no_color(true)
    }

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn passing_tree() -> SpecResult {
        SpecResult::new("Math")
            .with_passed("adds", Duration::from_millis(5))
            .with_duration(Duration::from_millis(10))
            .with_child(SpecResult::new("Division").with_passed("divides", Duration::from_millis(2)))
    }

    fn failing_tree() -> SpecResult {
        SpecResult::new("Math")
            .with_passed("adds", Duration::from_millis(5))
            .with_duration(Duration::from_millis(10))
            .with_child(
                SpecResult::new("Division")
                    .with_failed("divides by zero", ["expected error", "got 0"])
                    .with_passed("divides", Duration::from_millis(2)),
            )
    }

    #[test]
    fn test_quiet_passing_suite_is_one_line() {
        let mut r = reporter(false);
        r.handle(&passing_tree()).unwrap();
        assert_eq!(output(r), "✔ Math\n");
    }

    #[test]
    fn test_verbose_passing_suite_prints_tree() {
        let mut r = reporter(true);
        r.handle(&passing_tree()).unwrap();
        assert_eq!(
            output(r),
            "Math:\n\
             \x20\x20✔ adds (5.00ms)\n\
             \x20\x20Division:\n\
             \x20\x20\x20\x20✔ divides (2.00ms)\n"
        );
    }

    #[test]
    fn test_failure_prints_tree_even_when_quiet() {
        let mut r = reporter(false);
        r.handle(&failing_tree()).unwrap();
        assert_eq!(
            output(r),
            "Math:\n\
             \x20\x20✔ adds (5.00ms)\n\
             \x20\x20Division:\n\
             \x20\x20\x20\x20✖ divides by zero:\n\
             \x20\x20\x20\x20\x20\x20-- expected error\n\
             \x20\x20\x20\x20\x20\x20-- got 0\n\
             \x20\x20\x20\x20✔ divides (2.00ms)\n"
        );
    }

    #[test]
    fn test_children_in_declaration_order() {
        let tree = SpecResult::new("root")
            .with_child(SpecResult::new("first").with_child(SpecResult::new("first.inner")))
            .with_child(SpecResult::new("second"));
        let mut r = reporter(true);
        r.handle(&tree).unwrap();
        assert_eq!(
            output(r),
            "root:\n  first:\n    first.inner:\n  second:\n"
        );
    }

    #[test]
    fn test_done_prints_totals() {
        let mut r = reporter(false);
        r.handle(&passing_tree()).unwrap();
        r.handle(&failing_tree()).unwrap();
        r.done().unwrap();

        let summary = r.summary();
        assert_eq!(summary.passed, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duration, Duration::from_millis(20));

        let out = output(r);
        assert!(out.starts_with("✔ Math\n"));
        assert!(out.ends_with("Passed: 4 Failed: 1 in 20.00ms\n"));
    }

    #[test]
    fn test_done_without_results() {
        let mut r = reporter(false);
        r.done().unwrap();
        assert_eq!(output(r), "Passed: 0 Failed: 0 in 0.00ns\n");
    }

    #[test]
    fn test_colored_marks_keep_text() {
        let mut r = Reporter::with_writer(Vec::new(), false);
        r.handle(&passing_tree()).unwrap();
        let out = output(r);
        assert!(out.contains("✔"));
        assert!(out.contains("Math"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_deep_failing_tree_renders() {
        let mut node = SpecResult::new("leaf").with_failed("deep failure", ["at the bottom"]);
        for i in 0..1_000 {
            node = SpecResult::new(format!("level {}", i)).with_child(node);
        }

        let mut r = reporter(false);
        r.handle(&node).unwrap();
        let out = output(r);
        assert_eq!(out.lines().count(), 1_003);
        assert!(out.ends_with(&format!("{}-- at the bottom\n", "  ".repeat(1_002))));
    }
}
