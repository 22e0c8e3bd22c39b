//! Where migration scripts come from.
//!
//! A [Source] only enumerates names and reads script content; it never
//! decides what runs. Enumeration and reading are separate operations so the
//! runner can skip reading scripts that are already applied.

use std::fs;
use std::path::PathBuf;

use crate::error::Error;

/// A collection of named SQL migration scripts.
pub trait Source {
    /// Enumerate the names of every available migration script.
    /// Order is not significant; the runner sorts.
    fn list(&self) -> Result<Vec<String>, Error>;

    /// Read the script content for one named migration.
    fn read(&self, name: &str) -> Result<String, Error>;
}

/// Migration scripts stored as `.sql` files in a single directory.
///
/// Selection rule: regular files directly in the directory whose extension
/// is exactly `sql` (case-sensitive). Subdirectories are not descended into.
/// The migration name is the file name including the extension, so
/// `0001_init.sql` sorts before `0002_add_col.sql` and applies first.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl Source for DirectorySource {
    fn list(&self) -> Result<Vec<String>, Error> {
        let entries = fs::read_dir(&self.root).map_err(|source| Error::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| Error::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    Error::Generic(format!(
                        "migration file name is not valid UTF-8: {}",
                        path.display()
                    ))
                })?;
            names.push(name.to_string());
        }
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String, Error> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
    }
}

/// Migration scripts held in memory as `(name, script)` pairs.
///
/// Useful for tests and for scripts embedded at compile time; see
/// [embedded_source!](crate::embedded_source).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    scripts: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new(scripts: Vec<(String, String)>) -> Self {
        Self { scripts }
    }
}

impl Source for MemorySource {
    fn list(&self) -> Result<Vec<String>, Error> {
        Ok(self.scripts.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read(&self, name: &str) -> Result<String, Error> {
        self.scripts
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, script)| script.clone())
            .ok_or_else(|| Error::Generic(format!("no migration script named '{}'", name)))
    }
}
