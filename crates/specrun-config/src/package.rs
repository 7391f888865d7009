//! Package introspection - decide whether a directory is a source package

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a directory is not a usable package
///
/// These are soft failures: discovery logs them and moves on.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("no .{extension} source files in {dir}")]
    NoSourceFiles { dir: PathBuf, extension: String },

    #[error("{file} has no package clause")]
    NoPackageClause { file: PathBuf },

    #[error("found packages {first} and {second} in {dir}")]
    MultiplePackages {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves a directory to the name its sources declare
pub trait PackageResolver {
    /// Returns the declared package name of `dir`, or why it is not a package
    fn resolve(&self, dir: &Path) -> Result<String, PackageError>;
}

impl<F> PackageResolver for F
where
    F: Fn(&Path) -> Result<String, PackageError>,
{
    fn resolve(&self, dir: &Path) -> Result<String, PackageError> {
        self(dir)
    }
}

/// Reads `package <name>` clauses from the source files of a directory
#[derive(Debug, Clone)]
pub struct SourcePackageResolver {
    extension: String,
}

impl SourcePackageResolver {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
        }
    }

    fn source_files(&self, dir: &Path) -> Result<Vec<PathBuf>, PackageError> {
        let io_err = |source| PackageError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == self.extension.as_str()) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl PackageResolver for SourcePackageResolver {
    fn resolve(&self, dir: &Path) -> Result<String, PackageError> {
        let files = self.source_files(dir)?;
        if files.is_empty() {
            return Err(PackageError::NoSourceFiles {
                dir: dir.to_path_buf(),
                extension: self.extension.clone(),
            });
        }

        let mut name: Option<String> = None;
        for file in files {
            let source = fs::read_to_string(&file).map_err(|source| PackageError::Io {
                path: file.clone(),
                source,
            })?;
            let Some(mut declared) = package_clause(&source) else {
                return Err(PackageError::NoPackageClause { file });
            };

            // External test files declare `<name>_test` alongside `<name>`
            let is_test_file = file
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.ends_with("_test"));
            if is_test_file {
                if let Some(base) = declared.strip_suffix("_test") {
                    declared = base.to_string();
                }
            }

            match name.take() {
                None => name = Some(declared),
                Some(first) if first != declared => {
                    return Err(PackageError::MultiplePackages {
                        dir: dir.to_path_buf(),
                        first,
                        second: declared,
                    });
                }
                Some(first) => name = Some(first),
            }
        }

        name.ok_or_else(|| PackageError::NoSourceFiles {
            dir: dir.to_path_buf(),
            extension: self.extension.clone(),
        })
    }
}

/// Extract the identifier of the first `package` clause
///
/// Only blank lines, `//` comments and `/* */` blocks may precede it.
fn package_clause(source: &str) -> Option<String> {
    let mut in_block_comment = false;
    for line in source.lines() {
        let mut line = line.trim();

        if in_block_comment {
            match line.find("*/") {
                Some(end) => {
                    in_block_comment = false;
                    line = line[end + 2..].trim();
                }
                None => continue,
            }
        }
        if let Some(rest) = line.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => line = rest[end + 2..].trim(),
                None => {
                    in_block_comment = true;
                    continue;
                }
            }
        }

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let ident = line
            .strip_prefix("package")
            .filter(|rest| rest.starts_with(char::is_whitespace))?
            .split(|c: char| c.is_whitespace() || c == ';' || c == '/')
            .find(|s| !s.is_empty())?;

        let valid = ident
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && ident.chars().all(|c| c.is_alphanumeric() || c == '_');
        return valid.then(|| ident.to_string());
    }
    None
}
