use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Default image file for the (future) graph rendering stage.
pub const DEFAULT_OUTPUT: &str = "dependency_graph.png";

/// Run configuration, built once from the command line and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Package to inspect.
    pub package: String,

    /// Registry base URL, or a fixture file path in test mode.
    pub source: String,

    /// Read metadata from a local fixture file instead of the registry.
    pub test_mode: bool,

    /// Output image file. Reserved for the rendering stage.
    pub output: String,

    /// Print dependencies as an ASCII tree. Reserved for the rendering stage.
    pub ascii_tree: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package: String::new(),
            source: String::new(),
            test_mode: false,
            output: DEFAULT_OUTPUT.to_string(),
            ascii_tree: false,
        }
    }
}

impl Config {
    /// Create a new config for the given package and source.
    #[must_use]
    pub fn new(package: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    /// Set test (fixture) mode.
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Set output file.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Set ASCII tree mode.
    #[must_use]
    pub fn with_ascii_tree(mut self, ascii_tree: bool) -> Self {
        self.ascii_tree = ascii_tree;
        self
    }

    /// Collect every configuration problem, in a fixed order.
    ///
    /// Performs no network access. In test mode the only filesystem access is
    /// an existence check on the fixture path.
    #[must_use]
    pub fn problems(&self) -> Vec<ConfigProblem> {
        let mut problems = Vec::new();

        if self.package.trim().is_empty() {
            problems.push(ConfigProblem::EmptyPackage);
        }

        if self.source.trim().is_empty() {
            problems.push(ConfigProblem::EmptySource);
        }

        if self.output.trim().is_empty() {
            problems.push(ConfigProblem::EmptyOutput);
        }

        if self.test_mode && !Path::new(&self.source).exists() {
            problems.push(ConfigProblem::FixtureMissing(self.source.clone()));
        }

        problems
    }

    /// Validate the configuration, reporting all problems together.
    pub fn validate(&self) -> Result<(), Error> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation { problems })
        }
    }
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProblem {
    EmptyPackage,
    EmptySource,
    EmptyOutput,
    FixtureMissing(String),
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPackage => f.write_str("package name must not be empty"),
            Self::EmptySource => f.write_str("source (URL or file path) must not be empty"),
            Self::EmptyOutput => f.write_str("output file name must not be empty"),
            Self::FixtureMissing(path) => write!(f, "test file not found: {path}"),
        }
    }
}
