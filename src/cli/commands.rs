use chrono::Local;

use crate::app::{AppContext, Result};
use crate::domain::{DataKind, FetchOutcome, SnapshotSummary};

pub async fn fetch_all(ctx: &AppContext) -> Result<()> {
    let outcome = ctx.requestor.request_all_data().await?;
    print_snapshot(&outcome);
    Ok(())
}

pub async fn fetch_object(ctx: &AppContext, kind: DataKind, key: &str) -> Result<()> {
    tracing::debug!("Fetching {} object {}", kind, key);
    let outcome = ctx.requestor.request_object(kind, key).await?;
    println!("{}", String::from_utf8_lossy(outcome.body()));
    Ok(())
}

/// Runs until interrupted, `count` polls complete, or an unrecoverable error.
pub async fn poll(ctx: &AppContext, count: Option<u64>) -> Result<()> {
    let poller = ctx.poller(count)?;

    tokio::select! {
        result = poller.run(|outcome| print_snapshot(&outcome)) => {
            let polls = result?;
            println!("Finished after {} polls", polls);
        }
        _ = tokio::signal::ctrl_c() => {
            poller.stop();
            println!("Interrupted");
        }
    }

    Ok(())
}

fn print_snapshot(outcome: &FetchOutcome) {
    let state = if outcome.is_cached() {
        "not modified"
    } else {
        "updated"
    };

    match SnapshotSummary::from_body(outcome.body()) {
        Ok(summary) => println!(
            "[{}] {}: {} flags, {} segments ({} bytes)",
            Local::now().format("%H:%M:%S"),
            state,
            summary.flag_count(),
            summary.segment_count(),
            outcome.body().len()
        ),
        Err(e) => {
            tracing::warn!("Could not summarize snapshot: {}", e);
            println!(
                "[{}] {}: {} bytes",
                Local::now().format("%H:%M:%S"),
                state,
                outcome.body().len()
            );
        }
    }
}
