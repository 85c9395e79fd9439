//! Package metadata sources.
//!
//! Two adapters sit behind [`MetadataSource`]:
//! - [`RegistryClient`]: HTTP registry, one GET per package
//! - [`FixtureFile`]: local JSON file, one read per package

pub mod fixture;
pub mod registry;

pub use fixture::FixtureFile;
pub use registry::{RegistryClient, DEFAULT_REGISTRY};

use crate::config::Config;
use crate::error::Error;
use serde_json::Value;
use std::future::Future;

/// Raw metadata as returned by a source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPackageDocument {
    /// Full registry document (`dist-tags`, `versions`, ...).
    Registry(Value),
    /// The fixture entry for one package (`version`, `dependencies`).
    Fixture(Value),
}

/// Capability to fetch raw metadata for a package by name.
pub trait MetadataSource {
    /// Human-readable description used in error messages.
    fn describe(&self) -> String;

    /// Fetch the raw document for `name`. Performs exactly one acquisition.
    fn fetch_package_info(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<RawPackageDocument, Error>> + Send;
}

/// Source selected from the run mode.
#[derive(Debug, Clone)]
pub enum PackageSource {
    Registry(RegistryClient),
    Fixture(FixtureFile),
}

impl PackageSource {
    /// Pick the fixture reader in test mode, the registry client otherwise.
    ///
    /// # Errors
    /// Returns an error if `config.source` is not a usable registry URL.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        if config.test_mode {
            Ok(Self::Fixture(FixtureFile::new(&config.source)))
        } else {
            RegistryClient::new(&config.source).map(Self::Registry)
        }
    }
}

impl MetadataSource for PackageSource {
    fn describe(&self) -> String {
        match self {
            Self::Registry(client) => client.describe(),
            Self::Fixture(file) => file.describe(),
        }
    }

    async fn fetch_package_info(&self, name: &str) -> Result<RawPackageDocument, Error> {
        match self {
            Self::Registry(client) => client.fetch_package_info(name).await,
            Self::Fixture(file) => file.fetch_package_info(name).await,
        }
    }
}
