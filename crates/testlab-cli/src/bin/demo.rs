//! Harness running the sample suites under `demos/tests`
//!
//! From the `demos/` directory: `cargo run --bin testlab-demo -- run`

#[path = "../../../../demos/tests/math.test.rs"]
mod math;

#[path = "../../../../demos/tests/async.test.rs"]
mod asynchronous;

#[path = "../../../../demos/tests/assertions.test.rs"]
mod assertions;

use testlab_cli::SuiteSet;

fn main() -> anyhow::Result<()> {
    let suites = SuiteSet::new()
        .source("math.test.rs", math::register)
        .source("async.test.rs", asynchronous::register)
        .source("assertions.test.rs", assertions::register);

    testlab_cli::main_with(suites)
}
