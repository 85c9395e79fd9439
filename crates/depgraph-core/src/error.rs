//! Error taxonomy for package metadata acquisition.
//!
//! Every failure is a distinct variant with a stable code, so callers can
//! match on the kind instead of parsing messages.

use crate::config::ConfigProblem;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, one per [`Error`] variant.
pub mod codes {
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const PKG_NOT_FOUND: &str = "PKG_NOT_FOUND";
    pub const REGISTRY_HTTP_ERROR: &str = "REGISTRY_HTTP_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const RESPONSE_PARSE_ERROR: &str = "RESPONSE_PARSE_ERROR";
    pub const SOURCE_FILE_NOT_FOUND: &str = "SOURCE_FILE_NOT_FOUND";
    pub const VERSION_UNRESOLVED: &str = "VERSION_UNRESOLVED";
    pub const UNKNOWN_FETCH_ERROR: &str = "UNKNOWN_FETCH_ERROR";
}

/// Core error type for depgraph operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {}", join_problems(.problems))]
    ConfigValidation { problems: Vec<ConfigProblem> },

    #[error("package '{name}' not found in {origin}")]
    PackageNotFound { name: String, origin: String },

    #[error("registry returned status {status} for '{name}'")]
    RegistryHttp { name: String, status: u16 },

    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse JSON from {origin}: {detail}")]
    ResponseParse { origin: String, detail: String },

    #[error("source file not found: {}", .path.display())]
    SourceFileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve a version of '{name}': {detail}")]
    VersionResolution { name: String, detail: String },

    #[error("unexpected failure {context}: {source}")]
    UnknownFetch {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Get the stable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigValidation { .. } => codes::CONFIG_INVALID,
            Self::PackageNotFound { .. } => codes::PKG_NOT_FOUND,
            Self::RegistryHttp { .. } => codes::REGISTRY_HTTP_ERROR,
            Self::Network { .. } => codes::NETWORK_ERROR,
            Self::ResponseParse { .. } => codes::RESPONSE_PARSE_ERROR,
            Self::SourceFileNotFound { .. } => codes::SOURCE_FILE_NOT_FOUND,
            Self::VersionResolution { .. } => codes::VERSION_UNRESOLVED,
            Self::UnknownFetch { .. } => codes::UNKNOWN_FETCH_ERROR,
        }
    }

    /// Create a package not found error.
    pub fn not_found(name: &str, origin: impl Into<String>) -> Self {
        Self::PackageNotFound {
            name: name.to_string(),
            origin: origin.into(),
        }
    }

    /// Create a parse error for a payload from `origin`.
    pub fn parse(origin: impl Into<String>, detail: impl ToString) -> Self {
        Self::ResponseParse {
            origin: origin.into(),
            detail: detail.to_string(),
        }
    }

    /// Create a version resolution error.
    pub fn version_unresolved(name: &str, detail: impl Into<String>) -> Self {
        Self::VersionResolution {
            name: name.to_string(),
            detail: detail.into(),
        }
    }

    /// Wrap any other failure during acquisition. `context` reads after
    /// "unexpected failure", e.g. "fetching 'react'".
    pub fn unknown(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::UnknownFetch {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Classify a transport error from the registry client.
    pub(crate) fn from_transport(name: &str, url: &str, e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::parse(url, e)
        } else if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
            Self::Network {
                url: url.to_string(),
                source: e,
            }
        } else {
            Self::unknown(format!("fetching '{name}'"), e)
        }
    }

    /// Validation problems, if this is a configuration error.
    #[must_use]
    pub fn problems(&self) -> &[ConfigProblem] {
        match self {
            Self::ConfigValidation { problems } => problems,
            _ => &[],
        }
    }
}

fn join_problems(problems: &[ConfigProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
