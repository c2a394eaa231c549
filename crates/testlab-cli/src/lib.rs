//! TestLab command-line harness
//!
//! A harness binary compiles its `*.test.rs` sources in, lists them in a
//! [`SuiteSet`] and hands control to [`main_with`]:
//!
//! ```no_run
//! use testlab_cli::SuiteSet;
//! use testlab_runtime::Registrar;
//!
//! fn math(r: &mut Registrar) -> anyhow::Result<()> {
//!     r.test("adds", |t| async move {
//!         t.is(1 + 1, 2)?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     testlab_cli::main_with(SuiteSet::new().source("math.test.rs", math))
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod logging;
pub mod testing;

pub use cli::{Cli, Commands};
pub use testing::{discover_test_files, SuiteSet};

use anyhow::Result;
use clap::Parser;

/// Parse the process arguments and dispatch
///
/// Returning `Err` from `main` exits with status 1.
pub fn main_with(suites: SuiteSet) -> Result<()> {
    execute(Cli::parse(), &suites)
}

/// Dispatch already-parsed arguments
pub fn execute(cli: Cli, suites: &SuiteSet) -> Result<()> {
    match cli.command {
        Commands::Run {
            directory,
            timeout,
            debug,
            reporter,
            report_path,
            report_file,
            no_color,
        } => {
            let args = commands::run::RunArgs {
                directory,
                timeout,
                debug,
                reporter,
                report_path,
                report_file,
                no_color,
            };
            commands::run::run(&args, suites)?;
        }
    }

    Ok(())
}
