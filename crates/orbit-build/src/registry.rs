//! Package registry: the ordered universe of package names
use crate::error::{OrchestratorError, OrchestratorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A package name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Package(String);

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, immutable package registry
#[derive(Debug, Clone, Default)]
pub struct PackageRegistry {
    packages: Vec<Package>,
    /// Directory holding one subdirectory per package
    packages_dir: PathBuf,
}

impl PackageRegistry {
    /// Create a registry rooted at `packages_dir`
    pub fn new<I, S>(packages_dir: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: names.into_iter().map(Package::new).collect(),
            packages_dir: packages_dir.into(),
        }
    }

    /// All packages in registry order
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p.name() == name)
    }

    /// Get a package by name
    pub fn get(&self, name: &str) -> OrchestratorResult<&Package> {
        self.packages
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| OrchestratorError::UnknownPackage {
                package: name.to_string(),
                registry: self.describe(),
            })
    }

    /// Resolve a requested subset
    ///
    /// An empty request selects every package in registry order. Otherwise
    /// the caller's order is kept and repeated names are collapsed to their
    /// first occurrence.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> OrchestratorResult<Vec<Package>> {
        if requested.is_empty() {
            return Ok(self.packages.clone());
        }

        let mut selected: Vec<Package> = Vec::with_capacity(requested.len());
        for name in requested {
            let package = self.get(name.as_ref())?;
            if !selected.contains(package) {
                selected.push(package.clone());
            }
        }
        Ok(selected)
    }

    /// Working directory for a package
    pub fn working_dir(&self, package: &Package) -> PathBuf {
        self.packages_dir.join(package.name())
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    fn describe(&self) -> String {
        if self.packages.is_empty() {
            return "<empty>".to_string();
        }
        self.packages
            .iter()
            .map(Package::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
