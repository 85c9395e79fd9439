#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use clap::Parser;
use depgraph_core::{Config, DEFAULT_OUTPUT};
use miette::Result;

#[derive(Parser, Debug)]
#[command(name = "depgraph")]
#[command(author, version, about = "Inspect the direct dependencies of a package", long_about = None)]
struct Cli {
    /// Name of the package to analyze
    #[arg(long, value_name = "NAME")]
    package: String,

    /// Registry base URL, or a test file path with --test-mode
    #[arg(long, value_name = "URL_OR_PATH")]
    source: String,

    /// Read package data from a local test file instead of the registry
    #[arg(long)]
    test_mode: bool,

    /// Image file for the rendered graph (reserved, not written yet)
    #[arg(long, default_value = DEFAULT_OUTPUT, value_name = "PATH")]
    output: String,

    /// Print dependencies as an ASCII tree (reserved, not used yet)
    #[arg(long)]
    ascii_tree: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_config(&self) -> Config {
        Config::new(self.package.clone(), self.source.clone())
            .with_test_mode(self.test_mode)
            .with_output(self.output.clone())
            .with_ascii_tree(self.ascii_tree)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    let config = cli.to_config();
    commands::inspect::run(&config, cli.json)
}
