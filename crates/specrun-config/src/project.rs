//! Project Settings (specrun.toml)
//!
//! Handles project-level settings stored in `specrun.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the project settings file
pub const PROJECT_FILE: &str = "specrun.toml";

/// Project settings from specrun.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Test run settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<TestConfig>,
}

/// The `[test]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Directory holding the test packages, relative to the root (default: "tests")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_dir: Option<String>,

    /// Directory receiving generated packages, relative to the root (default: "generated")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// Import path of the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,

    /// Render every result tree, not only failing ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Seconds to wait for a suite before it counts as failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Source file extension used to recognise packages (default: "go")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl ProjectConfig {
    /// Load project settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project settings
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(test) = &self.test else {
            return Ok(());
        };

        for (field, value) in [
            ("test.test_dir", &test.test_dir),
            ("test.output_dir", &test.output_dir),
        ] {
            if let Some(dir) = value {
                validate_dir_name(field, dir)?;
            }
        }

        if test.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "test.timeout_secs".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if let Some(ext) = &test.extension {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::InvalidValue {
                    field: "test.extension".to_string(),
                    reason: format!("expected an extension without a leading dot, got '{}'", ext),
                });
            }
        }

        Ok(())
    }
}

/// Directory settings name a single directory below the root
pub(crate) fn validate_dir_name(field: &str, dir: &str) -> ConfigResult<()> {
    let path = Path::new(dir);
    if dir.is_empty()
        || path.is_absolute()
        || path.components().count() != 1
        || matches!(dir, "." | "..")
    {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' must be a single directory name below the root", dir),
        });
    }
    Ok(())
}
