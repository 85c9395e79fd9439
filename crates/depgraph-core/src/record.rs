//! Normalized package record.

use serde::Serialize;
use std::collections::BTreeMap;

/// Version reported for fixture entries that omit one.
pub const DEFAULT_FIXTURE_VERSION: &str = "1.0.0";

/// Direct dependencies: dependency name to version constraint.
pub type Dependencies = BTreeMap<String, String>;

/// Canonical `{name, version, dependencies}` record for one package.
///
/// Produced once per successful resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    name: String,
    version: String,
    dependencies: Dependencies,
}

impl PackageRecord {
    /// Create a record. `name` is the caller-supplied identifier, verbatim.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        dependencies: Dependencies,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Direct dependencies, sorted by name. Empty when the package has none.
    #[must_use]
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }
}
