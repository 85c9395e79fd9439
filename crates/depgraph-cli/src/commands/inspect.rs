//! Resolve one package and print its direct dependencies.

use depgraph_core::{resolve, Config, Error, PackageRecord, PackageSource, VERSION};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info};

const RULE_WIDE: usize = 40;
const RULE_NARROW: usize = 30;

/// Result for JSON output.
#[derive(Serialize)]
struct InspectJsonResult<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a Config>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package: Option<&'a PackageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    problems: Vec<String>,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            problems: err.problems().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Run the inspect command.
///
/// Exits the process with status 1 on any validation or resolution error.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let span = tracing::info_span!("inspect", package = %config.package, test_mode = config.test_mode);
    let _guard = span.enter();
    debug!(version = VERSION, "starting");

    if let Err(err) = config.validate() {
        fail(&err, json);
    }

    if !json {
        write_configuration(&mut io::stdout().lock(), config).into_diagnostic()?;
    }

    debug!(
        output = %config.output,
        ascii_tree = config.ascii_tree,
        "rendering options accepted, not used at this stage"
    );

    let record = match acquire(config) {
        Ok(record) => record,
        Err(err) => fail(&err, json),
    };

    info!(
        version = record.version(),
        dependencies = record.dependencies().len(),
        "resolved package"
    );

    if json {
        let result = InspectJsonResult {
            ok: true,
            config: Some(config),
            package: Some(&record),
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        let mut out = io::stdout().lock();
        write_dependencies(&mut out, &record).into_diagnostic()?;
        writeln!(out, "\nDependency collection finished successfully.").into_diagnostic()?;
    }

    Ok(())
}

/// Select the source and resolve on a single-threaded runtime.
fn acquire(config: &Config) -> std::result::Result<PackageRecord, Error> {
    let source = PackageSource::from_config(config)?;

    match &source {
        PackageSource::Registry(client) => {
            if let Ok(url) = client.package_url(&config.package) {
                info!(url = %url, "requesting package metadata");
            }
        }
        PackageSource::Fixture(file) => {
            info!(path = %file.path().display(), "reading test file");
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::unknown("starting async runtime", e))?;

    runtime.block_on(resolve(&config.package, &source))
}

/// Report `err` and exit with status 1.
fn fail(err: &Error, json: bool) -> ! {
    debug!(code = err.code(), error = ?err, "run failed");

    if json {
        let result = InspectJsonResult {
            ok: false,
            config: None,
            package: None,
            error: Some(ErrorInfo::from(err)),
        };
        match serde_json::to_string_pretty(&result) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("error: {err} (JSON encoding failed: {e})"),
        }
    } else {
        let _ = write_error(&mut io::stderr().lock(), err);
    }

    std::process::exit(1)
}

fn write_error(out: &mut impl Write, err: &Error) -> io::Result<()> {
    let problems = err.problems();
    if problems.is_empty() {
        return writeln!(out, "error: {err}");
    }

    writeln!(out, "Configuration errors:")?;
    for problem in problems {
        writeln!(out, "  - {problem}")?;
    }
    Ok(())
}

fn write_configuration(out: &mut impl Write, config: &Config) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDE);
    writeln!(out, "Configuration:")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Package:          {}", config.package)?;
    writeln!(out, "Source:           {}", config.source)?;
    writeln!(out, "Test mode:        {}", on_off(config.test_mode))?;
    writeln!(out, "Output file:      {}", config.output)?;
    writeln!(out, "ASCII tree mode:  {}", on_off(config.ascii_tree))?;
    writeln!(out, "{rule}")
}

fn write_dependencies(out: &mut impl Write, record: &PackageRecord) -> io::Result<()> {
    if record.dependencies().is_empty() {
        return writeln!(out, "No direct dependencies found");
    }

    let rule = "-".repeat(RULE_NARROW);
    writeln!(
        out,
        "\nDirect dependencies of {}@{}:",
        record.name(),
        record.version()
    )?;
    writeln!(out, "{rule}")?;
    for (name, constraint) in record.dependencies() {
        writeln!(out, "  {name}: {constraint}")?;
    }
    writeln!(out, "{rule}")
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
