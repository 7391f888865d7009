//! CLI configuration via environment variables
//!
//! Output preferences come from the environment; run settings are loaded
//! separately from specrun.toml by `specrun_config`.

use specrun_config::env_flag;
use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (SPECRUN_JSON=1)
    pub default_json: bool,
    /// Disable colored output (SPECRUN_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Log filter (SPECRUN_LOG, e.g. "debug" or "specrun_config=debug")
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("SPECRUN_JSON")
                .map(|v| env_flag(&v))
                .unwrap_or(false),
            no_color: env::var("SPECRUN_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            log_filter: env::var("SPECRUN_LOG").ok(),
        }
    }

    /// Log filter to install: SPECRUN_LOG wins, else `info` when verbose, else `warn`
    pub fn log_filter(&self, verbose: bool) -> String {
        match &self.log_filter {
            Some(filter) => filter.clone(),
            None if verbose => "info".to_string(),
            None => "warn".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
