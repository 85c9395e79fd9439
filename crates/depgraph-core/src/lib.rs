#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Package metadata acquisition and normalization for depgraph.
//!
//! Given a package name and a source (registry URL or fixture file), produce
//! a normalized [`PackageRecord`] or a classified [`Error`].
//!
//! This crate does no logging; the CLI owns that.

pub mod config;
pub mod error;
pub mod record;
pub mod resolve;
pub mod source;

pub use config::{Config, ConfigProblem, DEFAULT_OUTPUT};
pub use error::{codes, Error};
pub use record::{Dependencies, PackageRecord, DEFAULT_FIXTURE_VERSION};
pub use resolve::{normalize_fixture_entry, normalize_packument, resolve, resolve_package};
pub use source::{
    FixtureFile, MetadataSource, PackageSource, RawPackageDocument, RegistryClient,
    DEFAULT_REGISTRY,
};

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
