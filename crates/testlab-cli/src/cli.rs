//! Command-line surface shared by every harness binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use testlab_config::ReporterKind;

/// TestLab test harness.
///
/// Discovers `*.test.rs` sources under the test directory, runs every test
/// they register and reports the results.
///
/// EXAMPLES:
///     testlab-demo run                          Run ./tests
///     testlab-demo run -d demos/tests -t 1000   Custom directory and timeout
///     testlab-demo run --reporter json          Console output plus a JSON report
///
/// ENVIRONMENT VARIABLES:
///     TESTLAB_TEST_DIRECTORY, TESTLAB_TIMEOUT, TESTLAB_DEBUG, TESTLAB_REPORTER
///     override testlab.toml; command-line flags override both.
///     RUST_LOG controls diagnostic output on stderr.
#[derive(Parser, Debug)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tests
    ///
    /// Exits with 1 when the run cannot complete (configuration error, a
    /// failing beforeAll/afterAll hook). Failing tests alone exit with 0.
    Run {
        /// Test directory (default: "./tests")
        #[arg(short = 'd', long, value_name = "PATH")]
        directory: Option<PathBuf>,

        /// Per-test timeout in milliseconds (default: 5000)
        #[arg(short = 't', long, value_name = "MS")]
        timeout: Option<u64>,

        /// Enable debug-level diagnostics for discovery and registration
        #[arg(short = 'x', long)]
        debug: bool,

        /// Reporter used for the results
        #[arg(long, value_parser = parse_reporter)]
        reporter: Option<ReporterKind>,

        /// Directory the JSON report is written to (enables the report)
        #[arg(long, value_name = "DIR")]
        report_path: Option<PathBuf>,

        /// File name of the JSON report (enables the report)
        #[arg(long, value_name = "FILE")]
        report_file: Option<String>,

        /// Disable colored output
        #[arg(long, env = "TESTLAB_NO_COLOR")]
        no_color: bool,
    },
}

fn parse_reporter(value: &str) -> Result<ReporterKind, String> {
    value.parse().map_err(|e: testlab_config::ConfigError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["testlab", "run"]).unwrap();
        let Commands::Run {
            directory,
            timeout,
            debug,
            reporter,
            ..
        } = cli.command;

        assert_eq!(directory, None);
        assert_eq!(timeout, None);
        assert!(!debug);
        assert_eq!(reporter, None);
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "testlab", "run", "-d", "checks", "-t", "250", "-x", "--reporter", "JSON",
        ])
        .unwrap();
        let Commands::Run {
            directory,
            timeout,
            debug,
            reporter,
            ..
        } = cli.command;

        assert_eq!(directory, Some(PathBuf::from("checks")));
        assert_eq!(timeout, Some(250));
        assert!(debug);
        assert_eq!(reporter, Some(ReporterKind::Json));
    }

    #[test]
    fn test_rejects_unknown_reporter_and_bad_timeout() {
        assert!(Cli::try_parse_from(["testlab", "run", "--reporter", "xml"]).is_err());
        assert!(Cli::try_parse_from(["testlab", "run", "--timeout", "soon"]).is_err());
    }
}
