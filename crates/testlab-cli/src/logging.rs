//! Tracing subscriber setup
//!
//! Diagnostics go to stderr so stdout carries only the report stream.

use tracing_subscriber::EnvFilter;

/// Directive used when `debug` is enabled and `RUST_LOG` is unset
const DEBUG_DIRECTIVES: &str = "warn,testlab_runtime=debug,testlab_cli=debug,testlab_config=debug";

/// Install the global subscriber; later calls are no-ops
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new(DEBUG_DIRECTIVES)
        } else {
            EnvFilter::new("warn")
        }
    })
}
