//! Run command - discover, register and execute tests

use crate::logging;
use crate::testing::{discover_test_files, SuiteSet};
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use testlab_config::{ConfigLoader, ReporterKind, SettingsOverrides};
use testlab_runtime::{AnyReporter, Run, RunSummary};

/// Arguments for the run command
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Test directory, relative to the working directory
    pub directory: Option<PathBuf>,
    /// Per-test timeout in milliseconds
    pub timeout: Option<u64>,
    /// Debug diagnostics
    pub debug: bool,
    /// Reporter override
    pub reporter: Option<ReporterKind>,
    /// Report directory, relative to the working directory
    pub report_path: Option<PathBuf>,
    /// Report file name
    pub report_file: Option<String>,
    /// Disable colored output
    pub no_color: bool,
}

impl RunArgs {
    /// Settings overrides carried by the flags; paths are anchored at `cwd`
    fn overrides(&self, cwd: &Path) -> SettingsOverrides {
        let writes_report = self.report_path.is_some() || self.report_file.is_some();

        SettingsOverrides {
            test_directory: self.directory.as_ref().map(|dir| cwd.join(dir)),
            timeout: self.timeout,
            debug: self.debug.then_some(true),
            reporter: self.reporter,
            report_enabled: writes_report.then_some(true),
            report_path: self.report_path.as_ref().map(|dir| cwd.join(dir)),
            report_file: self.report_file.clone(),
        }
    }
}

/// Run the command from the process working directory
pub fn run(args: &RunArgs, suites: &SuiteSet) -> Result<Option<RunSummary>> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    run_in(&cwd, args, suites)
}

/// Run the command as if started in `cwd`
///
/// Returns `None` when no test files were discovered. Failing tests are
/// not an error; a failing beforeAll/afterAll hook is.
pub fn run_in(cwd: &Path, args: &RunArgs, suites: &SuiteSet) -> Result<Option<RunSummary>> {
    let mut config = ConfigLoader::new()
        .load_from_directory(cwd)
        .context("failed to load configuration")?;
    config
        .settings
        .apply_overrides(args.overrides(cwd))
        .context("invalid command-line option")?;

    logging::init(config.settings.debug);
    if args.no_color {
        colored::control::set_override(false);
    }

    let settings = &config.settings;
    let test_dir = cwd.join(config.test_directory());
    tracing::debug!(?settings, config_root = ?config.config_root, "effective settings");

    println!("{} {}\n", "Version:".cyan(), testlab_runtime::VERSION);
    println!(
        "{} - Running tests in directory: {}\n",
        "TestLab".blue(),
        test_dir.display().to_string().cyan()
    );

    let files = discover_test_files(&test_dir);
    if files.is_empty() {
        eprintln!("{}", "No test files found.".yellow());
        return Ok(None);
    }

    let mut run = Run::with_base_dir(cwd);
    let loaded = suites.load(&test_dir, &files, &mut run);
    tracing::debug!(
        loaded = loaded.loaded.len(),
        failed = loaded.failed.len(),
        unregistered = loaded.unregistered.len(),
        tests = run.catalog().len(),
        "test files loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let mut reporter = AnyReporter::from_settings(settings);
    let timeout = Duration::from_millis(settings.timeout);
    let summary = runtime.block_on(run.execute(&mut reporter, timeout))?;

    if settings.writes_report() {
        if let Some(json) = reporter.as_json_mut() {
            let target = cwd.join(settings.report_output_path());
            if let Err(e) = json.write_report(&target) {
                tracing::error!(error = %e, "failed to write JSON report");
            }
        }
    }

    Ok(Some(summary))
}
