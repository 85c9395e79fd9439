//! Normalization of raw source documents into a [`PackageRecord`].

use crate::config::Config;
use crate::error::Error;
use crate::record::{Dependencies, PackageRecord, DEFAULT_FIXTURE_VERSION};
use crate::source::registry::{get_latest_version, get_version_entry, get_versions};
use crate::source::{MetadataSource, PackageSource, RawPackageDocument};
use serde_json::Value;

/// Resolve `name` from the source selected by `config.test_mode`.
///
/// # Errors
/// Any acquisition or normalization error, unchanged.
pub async fn resolve_package(config: &Config) -> Result<PackageRecord, Error> {
    let source = PackageSource::from_config(config)?;
    resolve(&config.package, &source).await
}

/// Fetch `name` from `source` and normalize it.
///
/// # Errors
/// Any acquisition or normalization error, unchanged. No record is produced
/// on failure.
pub async fn resolve<S: MetadataSource>(name: &str, source: &S) -> Result<PackageRecord, Error> {
    match source.fetch_package_info(name).await? {
        RawPackageDocument::Registry(packument) => normalize_packument(name, &packument),
        RawPackageDocument::Fixture(entry) => normalize_fixture_entry(name, &entry),
    }
}

/// Build a record from a registry document.
///
/// The version is `dist-tags.latest` when set, otherwise the first key of
/// `versions` in document order.
pub fn normalize_packument(name: &str, packument: &Value) -> Result<PackageRecord, Error> {
    let origin = format!("registry response for '{name}'");

    if !packument.is_object() {
        return Err(Error::parse(
            origin,
            format!("expected an object, got {}", json_type_name(packument)),
        ));
    }

    if let Some(versions) = packument.get("versions") {
        if !versions.is_object() && !versions.is_null() {
            return Err(Error::parse(
                origin,
                format!("'versions' must be an object, got {}", json_type_name(versions)),
            ));
        }
    }

    let version = select_version(name, packument)?;

    let entry = get_version_entry(packument, version).ok_or_else(|| {
        Error::version_unresolved(name, format!("version {version} has no entry in 'versions'"))
    })?;

    let dependencies = extract_dependencies(entry.get("dependencies"), &origin)?;

    Ok(PackageRecord::new(name, version, dependencies))
}

/// Build a record from a fixture entry.
pub fn normalize_fixture_entry(name: &str, entry: &Value) -> Result<PackageRecord, Error> {
    let origin = format!("test entry for '{name}'");

    let Some(fields) = entry.as_object() else {
        return Err(Error::parse(
            origin,
            format!("expected an object, got {}", json_type_name(entry)),
        ));
    };

    let version = match fields.get("version") {
        None | Some(Value::Null) => DEFAULT_FIXTURE_VERSION,
        Some(Value::String(v)) if v.trim().is_empty() => DEFAULT_FIXTURE_VERSION,
        Some(Value::String(v)) => v.as_str(),
        Some(other) => {
            return Err(Error::parse(
                origin,
                format!("'version' must be a string, got {}", json_type_name(other)),
            ));
        }
    };

    let dependencies = extract_dependencies(fields.get("dependencies"), &origin)?;

    Ok(PackageRecord::new(name, version, dependencies))
}

fn select_version<'a>(name: &str, packument: &'a Value) -> Result<&'a str, Error> {
    if let Some(latest) = get_latest_version(packument).filter(|v| !v.trim().is_empty()) {
        return Ok(latest);
    }

    // No ordering beyond document order is applied here.
    get_versions(packument)
        .into_iter()
        .find(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            Error::version_unresolved(name, "no 'dist-tags.latest' and no non-blank keys in 'versions'")
        })
}

/// Missing or null means no dependencies; anything but an object of strings
/// is malformed.
fn extract_dependencies(value: Option<&Value>, origin: &str) -> Result<Dependencies, Error> {
    let section = match value {
        None | Some(Value::Null) => return Ok(Dependencies::new()),
        Some(Value::Object(section)) => section,
        Some(other) => {
            return Err(Error::parse(
                origin,
                format!("'dependencies' must be an object, got {}", json_type_name(other)),
            ));
        }
    };

    section
        .iter()
        .map(|(dep, constraint)| match constraint.as_str() {
            Some(c) => Ok((dep.clone(), c.to_string())),
            None => Err(Error::parse(
                origin,
                format!(
                    "constraint for '{dep}' must be a string, got {}",
                    json_type_name(constraint)
                ),
            )),
        })
        .collect()
}

/// Get a human-readable type name for a JSON value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts calls.
    struct StaticSource {
        result: fn() -> Result<RawPackageDocument, Error>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(result: fn() -> Result<RawPackageDocument, Error>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl MetadataSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch_package_info(&self, _name: &str) -> Result<RawPackageDocument, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn deps(pairs: &[(&str, &str)]) -> Dependencies {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_latest_tag_selects_version() {
        let packument = json!({
            "dist-tags": { "latest": "2.0.0" },
            "versions": {
                "1.0.0": { "dependencies": { "old": "^0.1" } },
                "2.0.0": { "dependencies": { "a": "^1.0" } }
            }
        });

        let record = normalize_packument("pkg", &packument).unwrap();
        assert_eq!(record, PackageRecord::new("pkg", "2.0.0", deps(&[("a", "^1.0")])));
    }

    #[test]
    fn test_first_version_without_dist_tags() {
        let packument: Value = serde_json::from_str(
            r#"{"versions": {"3.0.0": {"dependencies": {"x": "1"}}, "1.0.0": {}}}"#,
        )
        .unwrap();

        let record = normalize_packument("pkg", &packument).unwrap();
        assert_eq!(record.version(), "3.0.0");
        assert_eq!(record.dependencies(), &deps(&[("x", "1")]));
    }

    #[test]
    fn test_empty_latest_falls_back_to_versions() {
        let packument = json!({
            "dist-tags": { "latest": "" },
            "versions": { "0.1.0": {} }
        });

        let record = normalize_packument("pkg", &packument).unwrap();
        assert_eq!(record.version(), "0.1.0");
    }

    #[test]
    fn test_blank_version_keys_skipped() {
        let packument = json!({
            "dist-tags": { "latest": "  " },
            "versions": {
                "": { "dependencies": { "a": "1" } },
                "1.2.0": { "dependencies": { "b": "2" } }
            }
        });

        let record = normalize_packument("pkg", &packument).unwrap();
        assert_eq!(record.version(), "1.2.0");
        assert_eq!(record.dependencies(), &deps(&[("b", "2")]));
    }

    #[test]
    fn test_only_blank_version_keys() {
        let packument = json!({ "versions": { "": { "dependencies": { "a": "1" } } } });
        let err = normalize_packument("pkg", &packument).unwrap_err();
        assert!(matches!(err, Error::VersionResolution { .. }));
    }

    #[test]
    fn test_no_versions_at_all() {
        let packument = json!({ "name": "pkg" });
        let err = normalize_packument("pkg", &packument).unwrap_err();
        assert!(matches!(err, Error::VersionResolution { ref name, .. } if name == "pkg"));

        let packument = json!({ "dist-tags": {}, "versions": {} });
        let err = normalize_packument("pkg", &packument).unwrap_err();
        assert!(matches!(err, Error::VersionResolution { .. }));
    }

    #[test]
    fn test_latest_without_entry() {
        let packument = json!({
            "dist-tags": { "latest": "9.9.9" },
            "versions": { "1.0.0": {} }
        });

        let err = normalize_packument("pkg", &packument).unwrap_err();
        assert!(matches!(err, Error::VersionResolution { .. }));
        assert!(err.to_string().contains("9.9.9"));
    }

    #[test]
    fn test_missing_dependencies_is_empty() {
        let packument = json!({
            "dist-tags": { "latest": "1.0.0" },
            "versions": { "1.0.0": { "name": "pkg" } }
        });

        let record = normalize_packument("pkg", &packument).unwrap();
        assert!(record.dependencies().is_empty());
    }

    #[test]
    fn test_non_string_constraint_rejected() {
        let packument = json!({
            "dist-tags": { "latest": "1.0.0" },
            "versions": { "1.0.0": { "dependencies": { "a": 1 } } }
        });

        let err = normalize_packument("pkg", &packument).unwrap_err();
        assert!(matches!(err, Error::ResponseParse { .. }));
    }

    #[test]
    fn test_non_object_packument_rejected() {
        let err = normalize_packument("pkg", &json!("nope")).unwrap_err();
        assert!(matches!(err, Error::ResponseParse { .. }));

        let err = normalize_packument("pkg", &json!({ "versions": [] })).unwrap_err();
        assert!(matches!(err, Error::ResponseParse { .. }));
    }

    #[test]
    fn test_fixture_version_defaults() {
        let entry = json!({ "dependencies": { "bar": "1.2.3" } });
        let record = normalize_fixture_entry("foo", &entry).unwrap();
        assert_eq!(
            record,
            PackageRecord::new("foo", "1.0.0", deps(&[("bar", "1.2.3")]))
        );
    }

    #[test]
    fn test_fixture_explicit_version() {
        let entry = json!({ "version": "4.5.6" });
        let record = normalize_fixture_entry("foo", &entry).unwrap();
        assert_eq!(record.version(), "4.5.6");
        assert!(record.dependencies().is_empty());
    }

    #[test]
    fn test_fixture_null_fields_default() {
        let entry = json!({ "version": null, "dependencies": null });
        let record = normalize_fixture_entry("foo", &entry).unwrap();
        assert_eq!(record.version(), DEFAULT_FIXTURE_VERSION);
        assert!(record.dependencies().is_empty());
    }

    #[test]
    fn test_fixture_bad_shapes() {
        for entry in [
            json!([]),
            json!({ "version": 1 }),
            json!({ "dependencies": ["a"] }),
        ] {
            let err = normalize_fixture_entry("foo", &entry).unwrap_err();
            assert!(matches!(err, Error::ResponseParse { .. }), "{entry}");
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_source_once() {
        let source = StaticSource::new(|| {
            Ok(RawPackageDocument::Fixture(
                json!({ "version": "2.1.0", "dependencies": { "b": "~1" } }),
            ))
        });

        let record = resolve("a", &source).await.unwrap();
        assert_eq!(record.name(), "a");
        assert_eq!(record.version(), "2.1.0");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_propagates_source_error() {
        let source = StaticSource::new(|| Err(Error::not_found("a", "static")));

        let err = resolve("a", &source).await.unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { ref name, .. } if name == "a"));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let source = StaticSource::new(|| {
            Ok(RawPackageDocument::Registry(json!({
                "dist-tags": { "latest": "1.0.0" },
                "versions": { "1.0.0": { "dependencies": { "z": "1", "a": "2", "m": "3" } } }
            })))
        });

        let first = resolve("pkg", &source).await.unwrap();
        let second = resolve("pkg", &source).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_name_echoes_request() {
        let source = StaticSource::new(|| {
            Ok(RawPackageDocument::Registry(json!({
                "name": "something-else",
                "dist-tags": { "latest": "1.0.0" },
                "versions": { "1.0.0": {} }
            })))
        });

        let record = resolve("requested", &source).await.unwrap();
        assert_eq!(record.name(), "requested");
    }
}
