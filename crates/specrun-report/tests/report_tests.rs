//! Decoding results and feeding them through the handlers

use pretty_assertions::assert_eq;
use specrun_report::{aggregate, decode, JsonReporter, Reporter, ResultHandler, SpecResult, Stats};
use std::time::Duration;

const RUN: &str = r#"[
  {
    "description": "Parser",
    "duration": 3000000,
    "passed": [
      {"description": "parses numbers", "duration": 1000000},
      {"description": "parses strings", "duration": 1000000}
    ],
    "failed": [
      {"description": "rejects garbage", "messages": ["expected error, got Ok"]}
    ],
    "children": [
      {
        "description": "Literals",
        "passed": [
          {"description": "a", "duration": 0},
          {"description": "b", "duration": 0},
          {"description": "c", "duration": 0}
        ]
      }
    ]
  },
  {
    "description": "Lexer",
    "duration": 1000000,
    "passed": [{"description": "tokenizes", "duration": 500000}]
  }
]"#;

fn handle_all(handler: &mut dyn ResultHandler, results: &[SpecResult]) {
    for root in results {
        handler.handle(root).unwrap();
    }
    handler.done().unwrap();
}

#[test]
fn test_aggregate_decoded_tree() {
    let results = decode(RUN.as_bytes()).unwrap();
    assert_eq!(
        aggregate(&results[0]),
        Stats {
            passed: 5,
            failed: 1
        }
    );
    assert_eq!(
        aggregate(&results[1]),
        Stats {
            passed: 1,
            failed: 0
        }
    );
}

#[test]
fn test_console_report_of_run() {
    let results = decode(RUN.as_bytes()).unwrap();
    let mut reporter = Reporter::with_writer(Vec::new(), false).with_no_color(true);
    handle_all(&mut reporter, &results);

    let summary = reporter.summary();
    assert!(!summary.success());
    assert_eq!(summary.duration, Duration::from_millis(4));

    let out = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(
        out,
        "Parser:\n\
         \x20\x20✖ rejects garbage:\n\
         \x20\x20\x20\x20-- expected error, got Ok\n\
         \x20\x20✔ parses numbers (1.00ms)\n\
         \x20\x20✔ parses strings (1.00ms)\n\
         \x20\x20Literals:\n\
         \x20\x20\x20\x20✔ a (0.00ns)\n\
         \x20\x20\x20\x20✔ b (0.00ns)\n\
         \x20\x20\x20\x20✔ c (0.00ns)\n\
         ✔ Lexer\n\
         Passed: 6 Failed: 1 in 4.00ms\n"
    );
}

#[test]
fn test_handlers_agree_on_totals() {
    let results = decode(RUN.as_bytes()).unwrap();

    let mut console = Reporter::with_writer(Vec::new(), true).with_no_color(true);
    let mut json = JsonReporter::new(Vec::new());
    handle_all(&mut console, &results);
    handle_all(&mut json, &results);

    assert_eq!(console.summary(), json.summary());
}

#[test]
fn test_malformed_tree_never_reaches_handlers() {
    let err = decode(r#"{"description": "Root", "children": [null]}"#.as_bytes()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed result tree: missing child at [0] Root > children[0]"
    );
}
