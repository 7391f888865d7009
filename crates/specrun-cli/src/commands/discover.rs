//! Discover command - list the test packages a run would build

use anyhow::{Context, Result};
use colored::*;
use specrun_config::{resolve_conflicts, Config, SettingsLoader, SourcePackageResolver, TestUnit};
use std::path::{Path, PathBuf};

/// Arguments for the discover command
#[derive(Debug, Clone)]
pub struct DiscoverArgs {
    /// Project root (defaults to current directory)
    pub root: PathBuf,
    /// Override the test directory name
    pub test_dir: Option<String>,
    /// Override the output directory name
    pub output_dir: Option<String>,
    /// Override the root import path
    pub import_path: Option<String>,
    /// Output in JSON format
    pub json: bool,
    /// Show output paths, on top of the configured verbosity
    pub verbose: bool,
}

impl Default for DiscoverArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            test_dir: None,
            output_dir: None,
            import_path: None,
            json: false,
            verbose: false,
        }
    }
}

/// Run the discover command
pub fn run(args: DiscoverArgs) -> Result<()> {
    let config = load(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan_json(&config))?);
    } else {
        print_plan(&config);
    }

    Ok(())
}

/// Load settings, apply flag overrides, discover and resolve units
pub fn load(args: &DiscoverArgs) -> Result<Config> {
    let mut settings = SettingsLoader::new()
        .load_from_directory(&args.root)
        .with_context(|| format!("failed to load settings from {}", args.root.display()))?;

    if let Some(dir) = &args.test_dir {
        settings.test_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(path) = &args.import_path {
        settings.import_path = Some(path.clone());
    }
    settings.verbose |= args.verbose;

    let resolver = SourcePackageResolver::new(&settings.extension);
    let mut config = Config::load(settings, &resolver).context("test discovery failed")?;
    resolve_conflicts(&mut config.units);

    log::info!(
        "run {}: {} test packages under {}",
        config.run_id,
        config.units.len(),
        config.test_path.display()
    );
    Ok(config)
}

fn print_plan(config: &Config) {
    println!(
        "{} {} test package{} in {}",
        "Discovered".bold(),
        config.units.len().to_string().bold(),
        if config.units.len() == 1 { "" } else { "s" },
        config.test_path.display()
    );
    println!("Run: {}", config.run_id);
    println!("Main package: {}", config.output_main_pkg);
    println!();

    let labels: Vec<String> = config.units.iter().map(label).collect();
    let name_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rel_width = config
        .units
        .iter()
        .map(|u| u.relative_path().display().to_string().len())
        .max()
        .unwrap_or(0);

    for (unit, label) in config.units.iter().zip(&labels) {
        println!(
            "  {:<name_width$}  {:<rel_width$}  {}",
            label,
            unit.relative_path().display(),
            unit.import_path(),
            name_width = name_width,
            rel_width = rel_width,
        );
        if config.verbose {
            println!(
                "  {:<name_width$}  -> {}",
                "",
                unit.output_path().display(),
                name_width = name_width,
            );
        }
    }
}

/// `alias (package)` for renamed units, the plain name otherwise
fn label(unit: &TestUnit) -> String {
    match unit.alias() {
        Some(alias) => format!("{} ({})", alias, unit.package_name()),
        None => unit.package_name().to_string(),
    }
}

fn plan_json(config: &Config) -> serde_json::Value {
    let units: Vec<_> = config
        .units
        .iter()
        .map(|unit| {
            serde_json::json!({
                "name": unit.name(),
                "package": unit.package_name(),
                "alias": unit.alias(),
                "relative_path": slash(unit.relative_path()),
                "import_path": unit.import_path(),
                "output_path": unit.output_path().display().to_string(),
            })
        })
        .collect();

    serde_json::json!({
        "run_id": config.run_id,
        "test_path": config.test_path.display().to_string(),
        "output_path": config.output_path.display().to_string(),
        "generated_test_pkg": config.generated_test_pkg,
        "output_main_pkg": config.output_main_pkg,
        "timeout_secs": config.timeout.as_secs(),
        "units": units,
    })
}

fn slash(path: &Path) -> String {
    path.iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
