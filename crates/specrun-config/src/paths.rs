//! Output, relative and import paths for a candidate test directory

use crate::config::Config;
use crate::{ConfigError, ConfigResult};
use std::path::{Component, Path, PathBuf};

/// Where a test directory is generated to and how it is imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPath {
    pub output_path: PathBuf,
    pub relative_path: PathBuf,
    pub import_path: String,
}

/// Map `dir` (inside the test directory) to its generated locations
///
/// The test directory itself is generated to `output/<package_name>` and
/// imported as the generated test package. Any other directory keeps its
/// position below `output/<test_dir>`. Pure: no filesystem access.
pub fn map_path(config: &Config, dir: &Path, package_name: &str) -> ConfigResult<MappedPath> {
    if dir == config.test_path {
        return Ok(MappedPath {
            output_path: config.output_path.join(package_name),
            relative_path: PathBuf::from(&config.test_dir),
            import_path: config.generated_test_pkg.clone(),
        });
    }

    let rel = relative_to(dir, &config.test_path)?;
    let base = config
        .test_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_default();

    Ok(MappedPath {
        output_path: config.output_path.join(&config.test_dir).join(&rel),
        relative_path: base.join(&rel),
        import_path: format!("{}/{}", config.generated_test_pkg, slash_path(&rel)),
    })
}

/// `dir` relative to `root`, refusing anything that escapes it
fn relative_to(dir: &Path, root: &Path) -> ConfigResult<PathBuf> {
    let outside = || ConfigError::OutsideTestRoot {
        path: dir.to_path_buf(),
        root: root.to_path_buf(),
    };

    let rel = dir.strip_prefix(root).map_err(|_| outside())?;
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(outside());
    }
    Ok(rel.to_path_buf())
}

/// Join path components with `/` regardless of platform
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
