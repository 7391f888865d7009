//! Run configuration and discovered test units

use crate::discovery::discover;
use crate::loader::Settings;
use crate::package::PackageResolver;
use crate::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// A discovered test package and where its generated counterpart lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUnit {
    output_path: PathBuf,
    relative_path: PathBuf,
    import_path: String,
    alias: Option<String>,
    package_name: String,
}

impl TestUnit {
    pub fn new(
        output_path: PathBuf,
        relative_path: PathBuf,
        import_path: String,
        package_name: String,
    ) -> Self {
        Self {
            output_path,
            relative_path,
            import_path,
            alias: None,
            package_name,
        }
    }

    /// Absolute path of the generated package
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Path relative to the parent of the test directory, e.g. `tests/sub/dir`
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Import identifier of the generated package
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// Disambiguating name, set only when the package name collided
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Name declared by the package sources
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Name to reference the package by: the alias if any, else the declared name
    pub fn name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.package_name)
    }

    /// `name.func`, unambiguous across all units of a run
    pub fn qualified(&self, func: &str) -> String {
        format!("{}.{}", self.name(), func)
    }

    /// Last segment of the import identifier
    pub fn leaf(&self) -> &str {
        self.import_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.import_path)
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = Some(alias);
    }
}

/// Parameters of one test run
///
/// Built once from [`Settings`]; the derived paths never change afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute project root
    pub root: PathBuf,

    /// Name of the test directory below the root
    pub test_dir: String,

    /// Name of the output directory below the root
    pub output_dir: String,

    /// Absolute path of the test directory
    pub test_path: PathBuf,

    /// Absolute path of the output directory
    pub output_path: PathBuf,

    /// Absolute path the test directory is generated into
    pub generated_test_path: PathBuf,

    /// Import path of the project root
    pub import_path: String,

    /// Import path of the generated test package, e.g. `example.com/app/generated/tests`
    pub generated_test_pkg: String,

    /// Import path of the generated main package, e.g. `example.com/app/generated`
    pub output_main_pkg: String,

    pub verbose: bool,

    pub timeout: Duration,

    /// UUID v4, unique per run
    pub run_id: String,

    /// Discovered test units, in discovery order
    pub units: Vec<TestUnit>,
}

impl Config {
    /// Derive the run configuration and check the test directory exists
    ///
    /// Discovery is not performed; `units` starts empty.
    pub fn new(settings: Settings) -> ConfigResult<Self> {
        settings.validate()?;

        let root = if settings.root.is_absolute() {
            settings.root
        } else {
            env::current_dir()?.join(settings.root)
        };

        let import_path = match settings.import_path {
            Some(path) => path.trim_end_matches('/').to_string(),
            None => root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "import_path".to_string(),
                    reason: format!("cannot derive an import path from {}", root.display()),
                })?,
        };

        let test_path = root.join(&settings.test_dir);
        let output_path = root.join(&settings.output_dir);
        let generated_test_path = output_path.join(&settings.test_dir);
        let output_main_pkg = join_import(&import_path, &settings.output_dir);
        let generated_test_pkg = join_import(&output_main_pkg, &settings.test_dir);

        check_test_dir(&test_path)?;

        Ok(Self {
            root,
            test_dir: settings.test_dir,
            output_dir: settings.output_dir,
            test_path,
            output_path,
            generated_test_path,
            import_path,
            generated_test_pkg,
            output_main_pkg,
            verbose: settings.verbose,
            timeout: settings.timeout,
            run_id: Uuid::new_v4().to_string(),
            units: Vec::new(),
        })
    }

    /// Build the configuration and discover its test units
    pub fn load(settings: Settings, resolver: &dyn PackageResolver) -> ConfigResult<Self> {
        let mut config = Self::new(settings)?;
        config.units = discover(&config, resolver)?;
        Ok(config)
    }

    /// Import identifier to effective package name, for every unit
    pub fn import_map(&self) -> BTreeMap<String, String> {
        self.units
            .iter()
            .map(|unit| (unit.import_path().to_string(), unit.name().to_string()))
            .collect()
    }
}

fn check_test_dir(test_path: &Path) -> ConfigResult<()> {
    let meta = fs::metadata(test_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(test_path.to_path_buf()),
        _ => ConfigError::Io(e),
    })?;
    if !meta.is_dir() {
        return Err(ConfigError::NotADirectory(test_path.to_path_buf()));
    }
    Ok(())
}

/// Append one segment to an import path
pub(crate) fn join_import(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}/{}", base, segment)
    }
}
