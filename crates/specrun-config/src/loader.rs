//! Settings Loader
//!
//! Handles loading and merging run settings from multiple sources with proper precedence.

use crate::project::{validate_dir_name, ProjectConfig, TestConfig, PROJECT_FILE};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default name of the directory holding test packages
pub const DEFAULT_TEST_DIR: &str = "tests";

/// Default name of the directory receiving generated packages
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Default source file extension
pub const DEFAULT_EXTENSION: &str = "go";

/// Default per-suite timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Merged run settings
///
/// Input to [`Config::new`](crate::Config::new). Callers apply their own
/// overrides (CLI flags) on the public fields before building the config.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Project root directory
    pub root: PathBuf,

    /// Name of the test directory below the root
    pub test_dir: String,

    /// Name of the generated output directory below the root
    pub output_dir: String,

    /// Import path of the root; defaults to the root's base name
    pub import_path: Option<String>,

    /// Render every result tree and show output paths in plans
    pub verbose: bool,

    /// Per-suite timeout handed to the execution side
    pub timeout: Duration,

    /// Source file extension recognised by the package resolver
    pub extension: String,
}

impl Settings {
    /// Built-in defaults rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            test_dir: DEFAULT_TEST_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            import_path: None,
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Apply the `[test]` table of a project file
    fn apply_project(&mut self, test: &TestConfig) {
        if let Some(dir) = &test.test_dir {
            self.test_dir = dir.clone();
        }
        if let Some(dir) = &test.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(path) = &test.import_path {
            self.import_path = Some(path.clone());
        }
        if let Some(verbose) = test.verbose {
            self.verbose = verbose;
        }
        if let Some(secs) = test.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(ext) = &test.extension {
            self.extension = ext.clone();
        }
    }

    /// Check values that may have come from the environment or flags
    pub fn validate(&self) -> ConfigResult<()> {
        validate_dir_name("test_dir", &self.test_dir)?;
        validate_dir_name("output_dir", &self.output_dir)?;
        if self.test_dir == self.output_dir {
            return Err(ConfigError::InvalidValue {
                field: "output_dir".to_string(),
                reason: "output directory must differ from the test directory".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings loader
///
/// Loads settings from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Project file (specrun.toml) - overrides defaults
/// 3. Environment variables (SPECRUN_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct SettingsLoader;

impl SettingsLoader {
    /// Create a new settings loader
    pub fn new() -> Self {
        Self
    }

    /// Load settings starting from the given directory
    ///
    /// Walks up the directory tree to find specrun.toml. The directory holding
    /// it becomes the root; without one, `start_dir` itself is the root.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Settings> {
        let start_dir = if start_dir.is_absolute() {
            start_dir.to_path_buf()
        } else {
            env::current_dir()?.join(start_dir)
        };

        let (root, project) = match find_project_file(&start_dir) {
            Some(path) => {
                let project = ProjectConfig::load_from_file(&path)?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| start_dir.clone());
                (root, project)
            }
            None => (start_dir, ProjectConfig::default()),
        };

        let mut settings = Settings::new(root);
        if let Some(test) = &project.test {
            settings.apply_project(test);
        }
        self.apply_env_overrides(&mut settings)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Apply environment variable overrides
    ///
    /// Variables follow the pattern SPECRUN_<KEY>, e.g. SPECRUN_TEST_DIR=specs
    fn apply_env_overrides(&self, settings: &mut Settings) -> ConfigResult<()> {
        if let Ok(dir) = env::var("SPECRUN_TEST_DIR") {
            settings.test_dir = dir;
        }

        if let Ok(dir) = env::var("SPECRUN_OUTPUT_DIR") {
            settings.output_dir = dir;
        }

        if let Ok(path) = env::var("SPECRUN_IMPORT_PATH") {
            settings.import_path = Some(path);
        }

        if let Ok(verbose) = env::var("SPECRUN_VERBOSE") {
            settings.verbose = env_flag(&verbose);
        }

        if let Ok(timeout) = env::var("SPECRUN_TIMEOUT") {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SPECRUN_TIMEOUT".to_string(),
                reason: format!("expected whole seconds, got '{}'", timeout),
            })?;
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(())
    }
}

/// Any value except a false literal or the empty string switches a flag on
pub fn env_flag(value: &str) -> bool {
    !matches!(
        value.to_lowercase().as_str(),
        "" | "0" | "n" | "no" | "f" | "false" | "off"
    )
}

fn find_project_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(PROJECT_FILE))
        .find(|path| path.is_file())
}
