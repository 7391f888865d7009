//! Spec result trees and their JSON wire form

use crate::{ReportError, ReportResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::mem;
use std::time::Duration;

/// An expectation that held
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PassedExpectation {
    pub description: String,
    #[serde(default, with = "nanos")]
    pub duration: Duration,
}

/// An expectation that did not hold, with every failure message it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedExpectation {
    pub description: String,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Outcome of one suite, with its nested suites in declaration order
///
/// Handed over complete by the execution side and only read afterwards.
/// Everything that walks a tree does so with an explicit stack.
#[derive(Debug, PartialEq, Eq)]
pub struct SpecResult {
    pub description: String,
    pub passed: Vec<PassedExpectation>,
    pub failed: Vec<FailedExpectation>,
    pub duration: Duration,
    pub children: Vec<SpecResult>,
}

impl SpecResult {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            passed: Vec::new(),
            failed: Vec::new(),
            duration: Duration::ZERO,
            children: Vec::new(),
        }
    }

    pub fn with_passed(mut self, description: impl Into<String>, duration: Duration) -> Self {
        self.passed.push(PassedExpectation {
            description: description.into(),
            duration,
        });
        self
    }

    pub fn with_failed<S: Into<String>>(
        mut self,
        description: impl Into<String>,
        messages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.failed.push(FailedExpectation {
            description: description.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_child(mut self, child: SpecResult) -> Self {
        self.children.push(child);
        self
    }
}

// Suites can nest arbitrarily deep; unwind children iteratively
impl Drop for SpecResult {
    fn drop(&mut self) {
        let mut pending = mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Result tree as received; children may be missing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpecResult {
    description: String,
    #[serde(default)]
    passed: Vec<PassedExpectation>,
    #[serde(default)]
    failed: Vec<FailedExpectation>,
    #[serde(default, with = "nanos")]
    duration: Duration,
    #[serde(default)]
    children: Vec<Option<RawSpecResult>>,
}

impl Drop for RawSpecResult {
    fn drop(&mut self) {
        let mut pending: Vec<RawSpecResult> =
            mem::take(&mut self.children).into_iter().flatten().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(mem::take(&mut node.children).into_iter().flatten());
        }
    }
}

/// A node being rebuilt, with the raw children still to visit
struct Frame {
    node: SpecResult,
    pending: std::vec::IntoIter<Option<RawSpecResult>>,
    next_index: usize,
    path: String,
}

impl Frame {
    fn open(mut raw: RawSpecResult, path: String) -> Self {
        let pending = mem::take(&mut raw.children).into_iter();
        Self {
            node: SpecResult {
                description: mem::take(&mut raw.description),
                passed: mem::take(&mut raw.passed),
                failed: mem::take(&mut raw.failed),
                duration: raw.duration,
                children: Vec::new(),
            },
            pending,
            next_index: 0,
            path,
        }
    }
}

/// Rebuild validated trees depth-first, rejecting the first missing child
fn rebuild(raws: Vec<RawSpecResult>) -> ReportResult<Vec<SpecResult>> {
    let mut roots = Vec::with_capacity(raws.len());

    for (idx, raw) in raws.into_iter().enumerate() {
        let path = format!("[{}] {}", idx, raw.description);
        let mut stack = vec![Frame::open(raw, path)];

        while let Some(mut frame) = stack.pop() {
            match frame.pending.next() {
                Some(child) => {
                    let child_path = format!("{} > children[{}]", frame.path, frame.next_index);
                    frame.next_index += 1;
                    let Some(child) = child else {
                        return Err(ReportError::MalformedNode { path: child_path });
                    };
                    stack.push(frame);
                    stack.push(Frame::open(child, child_path));
                }
                None => match stack.last_mut() {
                    Some(parent) => parent.node.children.push(frame.node),
                    None => roots.push(frame.node),
                },
            }
        }
    }

    Ok(roots)
}

/// Decode result trees from JSON
///
/// Accepts a single tree or an array of trees. Durations are integer
/// nanoseconds. A `null` child is rejected rather than skipped. Nesting depth
/// is not limited; the stack grows on the heap as the parser descends.
pub fn decode<R: Read>(mut reader: R) -> ReportResult<Vec<SpecResult>> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let is_array = input
        .iter()
        .find(|byte| !byte.is_ascii_whitespace())
        .is_some_and(|&byte| byte == b'[');
    let raws = if is_array {
        from_slice_unbounded::<Vec<RawSpecResult>>(&input)?
    } else {
        vec![from_slice_unbounded::<RawSpecResult>(&input)?]
    };

    rebuild(raws)
}

fn from_slice_unbounded<T: DeserializeOwned>(input: &[u8]) -> serde_json::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(input);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Durations as integer nanoseconds
mod nanos {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_single_tree() {
        let json = r#"{
            "description": "Math",
            "passed": [{"description": "adds", "duration": 1500000}],
            "failed": [{"description": "divides", "messages": ["expected 2 got 3"]}],
            "duration": 2000000,
            "children": [{"description": "Nested"}]
        }"#;

        let results = decode(json.as_bytes()).unwrap();
        assert_eq!(results.len(), 1);

        let expected = SpecResult::new("Math")
            .with_passed("adds", Duration::from_micros(1500))
            .with_failed("divides", ["expected 2 got 3"])
            .with_duration(Duration::from_millis(2))
            .with_child(SpecResult::new("Nested"));
        assert_eq!(results[0], expected);
    }

    #[test]
    fn test_decode_array() {
        let json = r#"[{"description": "A"}, {"description": "B"}]"#;
        let results = decode(json.as_bytes()).unwrap();
        let names: Vec<_> = results.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_decode_null_child_is_malformed() {
        let json = r#"{
            "description": "Root",
            "children": [{"description": "ok"}, {"description": "Mid", "children": [null]}]
        }"#;

        match decode(json.as_bytes()) {
            Err(ReportError::MalformedNode { path }) => {
                assert_eq!(path, "[0] Root > children[1] > children[0]");
            }
            other => panic!("expected MalformedNode, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode("not json".as_bytes()),
            Err(ReportError::Decode(_))
        ));
        assert!(decode(r#"{"passed": []}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_decode_accepts_surrounding_whitespace() {
        let json = "\n  [ {\"description\": \"A\", \"passed\": [{\"description\": \"p\"}]} ]\n";
        let results = decode(json.as_bytes()).unwrap();
        assert_eq!(
            results,
            vec![SpecResult::new("A").with_passed("p", Duration::ZERO)]
        );
        assert!(decode(r#"{"description": "A"} trailing"#.as_bytes()).is_err());
    }

    fn nested_json(depth: usize) -> String {
        let mut json = String::new();
        for i in 0..depth {
            json.push_str(&format!(r#"{{"description": "level {}", "children": ["#, i));
        }
        json.push_str(r#"{"description": "leaf", "failed": [{"description": "deep", "messages": ["m"]}]}"#);
        for _ in 0..depth {
            json.push_str("]}");
        }
        json
    }

    #[test]
    fn test_decode_deeply_nested_tree() {
        let depth = 5_000;
        let results = decode(nested_json(depth).as_bytes()).unwrap();

        let mut node = &results[0];
        let mut levels = 0;
        while let Some(child) = node.children.first() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert_eq!(node.description, "leaf");
        assert_eq!(node.failed[0].description, "deep");
    }

    #[test]
    fn test_decode_reports_null_child_deep_in_tree() {
        let json = nested_json(300).replace(
            r#"{"description": "leaf", "failed": [{"description": "deep", "messages": ["m"]}]}"#,
            "null",
        );
        match decode(json.as_bytes()) {
            Err(ReportError::MalformedNode { path }) => {
                assert!(path.starts_with("[0] level 0 > children[0]"));
                assert_eq!(path.matches("children[0]").count(), 300);
            }
            other => panic!("expected MalformedNode, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_deep_tree_drops() {
        let mut node = SpecResult::new("leaf");
        for i in 0..100_000 {
            node = SpecResult::new(format!("level {}", i)).with_child(node);
        }
        drop(node);
    }
}
