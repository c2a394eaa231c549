//! Test source plumbing for harness binaries
//!
//! Discovery walks the test directory; the suite table turns each
//! discovered file into registrations on a [`testlab_runtime::Run`].

pub mod discovery;
pub mod suites;

pub use discovery::discover_test_files;
pub use suites::{LoadReport, RegisterFn, SuiteSet};
