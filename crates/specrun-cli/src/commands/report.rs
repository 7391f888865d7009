//! Report command - render spec results collected from executed suites

use anyhow::{Context, Result};
use specrun_config::SettingsLoader;
use specrun_report::{decode, JsonReporter, Reporter, ResultHandler, SpecResult};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Result files, each holding one result tree or an array of them
    pub files: Vec<PathBuf>,
    /// Project root whose settings apply
    pub root: PathBuf,
    /// Print passing suites in full, on top of the configured verbosity
    pub verbose: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Also write a JSON report to this file
    pub json: Option<PathBuf>,
    /// Identifier recorded in the JSON report
    pub run_id: Option<String>,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            root: PathBuf::from("."),
            verbose: false,
            no_color: false,
            json: None,
            run_id: None,
        }
    }
}

/// Run the report command
///
/// Returns whether every expectation passed. All files are decoded before
/// anything is printed, so a malformed file aborts the report as a whole.
pub fn run(args: ReportArgs) -> Result<bool> {
    let settings = SettingsLoader::new()
        .load_from_directory(&args.root)
        .with_context(|| format!("failed to load settings from {}", args.root.display()))?;
    let verbose = args.verbose || settings.verbose;

    let results = load_results(&args.files)?;

    let mut console = Reporter::new(verbose).with_no_color(args.no_color);
    let mut json = match &args.json {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let reporter = JsonReporter::new(file);
            Some(match &args.run_id {
                Some(id) => reporter.with_run_id(id.clone()),
                None => reporter,
            })
        }
        None => None,
    };

    // One consumer, so handle calls are serialized
    for root in &results {
        console.handle(root)?;
        if let Some(json) = json.as_mut() {
            json.handle(root)?;
        }
    }

    console.done()?;
    if let Some(json) = json.as_mut() {
        json.done()?;
    }

    Ok(console.summary().success())
}

fn load_results(files: &[PathBuf]) -> Result<Vec<SpecResult>> {
    let mut results = Vec::new();
    for path in files {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let decoded = decode(BufReader::new(file))
            .with_context(|| format!("invalid results in {}", path.display()))?;
        log::debug!("{}: {} result trees", path.display(), decoded.len());
        results.extend(decoded);
    }
    Ok(results)
}
