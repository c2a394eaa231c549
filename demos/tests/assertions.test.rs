//! Tour of the assertion library

use std::collections::BTreeMap;
use testlab_runtime::anyhow::Result;
use testlab_runtime::{ErrorExpectation, Registrar};

pub fn register(r: &mut Registrar) -> Result<()> {
    r.test_sync("compares structures deeply", |t| {
        let mut scores = BTreeMap::new();
        scores.insert("alice", vec![90, 85]);
        scores.insert("bob", vec![70]);

        let mut expected = BTreeMap::new();
        expected.insert("bob", vec![70]);
        expected.insert("alice", vec![90, 85]);

        t.deep_equal(&scores, &expected)?;
        Ok(())
    })?;

    r.test_sync("matches patterns", |t| {
        t.matches("testlab-0.1.0", r"^testlab-\d+\.\d+\.\d+$")?;
        Ok(())
    })?;

    r.test_sync("orders values", |t| {
        t.less_than(1, 2)?;
        t.not_greater_than(2, 2)?;
        t.not_less_than(3.5, 3.5)?;
        t.not("left", "right")?;
        t.is_true("testlab".starts_with("test"))?;
        Ok(())
    })?;

    r.test_sync("checks error messages", |t| {
        let parse = || "forty-two".parse::<i32>();
        t.throws_with(parse, &ErrorExpectation::message("invalid digit found in string"))?;
        t.not_throws(|| "42".parse::<i32>())?;
        Ok(())
    })?;

    r.test_sync("catches panics", |t| {
        let message = t.panics(|| {
            let items: Vec<u8> = Vec::new();
            let _ = items[3];
        })?;
        t.matches(&message, "index out of bounds")?;
        Ok(())
    })?;

    Ok(())
}
