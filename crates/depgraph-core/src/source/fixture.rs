//! Local fixture file standing in for a registry.
//!
//! The file is a JSON object mapping package names to
//! `{ "version"?: string, "dependencies"?: { name: constraint } }`.

use super::{MetadataSource, RawPackageDocument};
use crate::error::Error;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A fixture file on disk.
#[derive(Debug, Clone)]
pub struct FixtureFile {
    path: PathBuf,
}

impl FixtureFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and return the entry for `name`.
    ///
    /// # Errors
    /// `SourceFileNotFound` if the file cannot be read, `ResponseParse` if it
    /// is not a JSON object, `PackageNotFound` if `name` is not a top-level key.
    pub async fn read_entry(&self, name: &str) -> Result<Value, Error> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::SourceFileNotFound {
                path: self.path.clone(),
                source,
            })?;

        let origin = self.path.display().to_string();
        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| Error::parse(&origin, e))?;

        let Value::Object(mut packages) = document else {
            return Err(Error::parse(
                origin,
                "top level must be an object keyed by package name",
            ));
        };

        packages
            .remove(name)
            .ok_or_else(|| Error::not_found(name, self.describe()))
    }
}

impl MetadataSource for FixtureFile {
    fn describe(&self) -> String {
        format!("test file {}", self.path.display())
    }

    async fn fetch_package_info(&self, name: &str) -> Result<RawPackageDocument, Error> {
        self.read_entry(name).await.map(RawPackageDocument::Fixture)
    }
}
