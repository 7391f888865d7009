//! specrun Configuration and Discovery
//!
//! Turns a project directory into the list of test units a run operates on:
//! - Settings loading (specrun.toml, environment, caller overrides)
//! - Run configuration with derived output and import paths
//! - Test package discovery under the test directory
//! - Package name conflict resolution among discovered units
//!
//! # Settings Hierarchy
//!
//! Settings are merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project settings (./specrun.toml)
//! 3. Environment variables (SPECRUN_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use specrun_config::{resolve_conflicts, Config, SettingsLoader, SourcePackageResolver};
//! use std::path::Path;
//!
//! let settings = SettingsLoader::new().load_from_directory(Path::new(".")).unwrap();
//! let resolver = SourcePackageResolver::new(&settings.extension);
//! let mut config = Config::load(settings, &resolver).unwrap();
//! resolve_conflicts(&mut config.units);
//! ```

pub mod config;
pub mod conflict;
pub mod discovery;
pub mod loader;
pub mod package;
pub mod paths;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration and discovery errors
///
/// Every variant is fatal for the run. Directories that merely are not
/// packages never surface here; see [`package::PackageError`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Test directory not found: {0}")]
    NotFound(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{path} is outside the test directory {root}")]
    OutsideTestRoot { path: PathBuf, root: PathBuf },

    #[error("No test packages found in any of the directories: {}", display_paths(.searched))]
    NoTestPackages { searched: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use config::{Config, TestUnit};
pub use conflict::{resolve_conflicts, resolve_conflicts_with};
pub use discovery::discover;
pub use loader::{env_flag, Settings, SettingsLoader};
pub use package::{PackageError, PackageResolver, SourcePackageResolver};
pub use paths::{map_path, MappedPath};
pub use project::ProjectConfig;
