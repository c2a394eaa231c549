//! Asynchronous bodies, simulated I/O and cooperative cancellation

use std::time::Duration;
use testlab_runtime::anyhow::{self, Result};
use testlab_runtime::{ErrorExpectation, Registrar};

#[derive(Debug, PartialEq)]
struct Response {
    status: u16,
    message: &'static str,
}

async fn fetch_data(url: &str) -> Result<Response> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    if url == "https://valid.url" {
        Ok(Response {
            status: 200,
            message: "Data fetched successfully!",
        })
    } else {
        anyhow::bail!("404 Not Found")
    }
}

pub fn register(r: &mut Registrar) -> Result<()> {
    r.before_all(|_| async {
        tracing::debug!("warming up the fake network");
        Ok(())
    });

    r.test("fetches data from a valid url", |t| async move {
        let response = fetch_data("https://valid.url").await?;
        t.is(response.status, 200)?;
        t.with_message("expected the success message")
            .is(response.message, "Data fetched successfully!")?;
        Ok(())
    })?;

    r.test("reports a missing resource", |t| async move {
        t.throws_async(
            fetch_data("https://invalid.url"),
            &ErrorExpectation::matching(r"^404"),
        )
        .await?;
        Ok(())
    })?;

    r.test("stops work when cancelled", |t| async move {
        tokio::select! {
            _ = t.cancelled() => Ok(()),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {
                t.is_false(t.is_cancelled())?;
                Ok(())
            }
        }
    })?;

    Ok(())
}
