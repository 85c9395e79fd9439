//! npm-style registry client.

use super::{MetadataSource, RawPackageDocument};
use crate::error::Error;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Public npm registry.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Registry client for fetching package metadata.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: Url,
    http: Client,
}

impl RegistryClient {
    /// Create a new registry client with the given base URL.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid, cannot carry a path, or the
    /// HTTP client cannot be created.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            Error::unknown(format!("parsing registry URL '{base_url}'"), e)
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::unknown(
                format!("parsing registry URL '{base_url}'"),
                "URL cannot be used as a registry base",
            ));
        }

        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("depgraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::unknown("creating HTTP client", e))?;

        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the metadata document for `name`: `<base>/<name>`.
    ///
    /// The name is a single path segment, so `@scope/pkg` becomes
    /// `@scope%2Fpkg`.
    pub fn package_url(&self, name: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::unknown(
                    format!("building URL for '{name}'"),
                    "registry URL cannot carry a path",
                )
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// Fetch the packument (package metadata) for a package.
    ///
    /// Makes exactly one request; there is no retry.
    ///
    /// # Errors
    /// `PackageNotFound` on 404, `RegistryHttp` on any other unsuccessful
    /// status, `Network` on transport failure, `ResponseParse` if the body is
    /// not JSON.
    pub async fn fetch_packument(&self, name: &str) -> Result<Value, Error> {
        let url = self.package_url(name)?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::from_transport(name, url.as_str(), e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(name, self.describe()));
        }

        if !status.is_success() {
            return Err(Error::RegistryHttp {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_transport(name, url.as_str(), e))?;

        serde_json::from_slice(&body).map_err(|e| Error::parse(url.as_str(), e))
    }
}

impl MetadataSource for RegistryClient {
    fn describe(&self) -> String {
        format!("registry {}", self.base_url)
    }

    async fn fetch_package_info(&self, name: &str) -> Result<RawPackageDocument, Error> {
        self.fetch_packument(name)
            .await
            .map(RawPackageDocument::Registry)
    }
}

/// Extract the latest version from a packument.
#[must_use]
pub fn get_latest_version(packument: &Value) -> Option<&str> {
    packument.get("dist-tags")?.get("latest")?.as_str()
}

/// Get all available version strings from a packument, in document order.
#[must_use]
pub fn get_versions(packument: &Value) -> Vec<&str> {
    packument
        .get("versions")
        .and_then(|v| v.as_object())
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Get the metadata object of one version.
#[must_use]
pub fn get_version_entry<'a>(packument: &'a Value, version: &str) -> Option<&'a Value> {
    packument.get("versions")?.get(version)
}
