//! Test discovery - find test packages below the test directory

use crate::config::{Config, TestUnit};
use crate::package::PackageResolver;
use crate::paths::map_path;
use crate::{ConfigError, ConfigResult};
use log::debug;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Discover every test package below `config.test_path`
///
/// Directories are visited depth-first in pre-order, siblings sorted by name,
/// so the result is reproducible. A directory the resolver rejects is skipped;
/// an unreadable directory aborts discovery. Finding nothing is an error.
pub fn discover(config: &Config, resolver: &dyn PackageResolver) -> ConfigResult<Vec<TestUnit>> {
    let mut searched: Vec<PathBuf> = Vec::new();
    let mut units = Vec::new();

    for entry in WalkDir::new(&config.test_path).sort_by_file_name() {
        let entry = entry.map_err(|e| ConfigError::Walk {
            path: e
                .path()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| config.test_path.clone()),
            source: e,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.into_path();
        match resolver.resolve(&dir) {
            Ok(package_name) => {
                let mapped = map_path(config, &dir, &package_name)?;
                debug!(
                    "discovered package {} at {} ({})",
                    package_name,
                    dir.display(),
                    mapped.import_path
                );
                units.push(TestUnit::new(
                    mapped.output_path,
                    mapped.relative_path,
                    mapped.import_path,
                    package_name,
                ));
            }
            Err(e) => debug!("skipping {}: {}", dir.display(), e),
        }
        searched.push(dir);
    }

    if units.is_empty() {
        return Err(ConfigError::NoTestPackages { searched });
    }

    Ok(units)
}
