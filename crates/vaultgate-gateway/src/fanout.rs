//! Concurrency helpers for multi-service joins.
//!
//! Two disciplines exist and must not be conflated:
//!
//! - **Best-effort settle**: run every operation to completion and hand each
//!   outcome back. Used where partial failure is tolerated (answer-generation
//!   sub-fetches, captured appends). Heterogeneous pairs use `tokio::join!`
//!   directly; [`settle_all`] covers the homogeneous N-way case.
//! - **First-failure-aborts**: stop the world on the first error. Used by the
//!   vault deletion fan-out, where continuing after a failed chat deletion
//!   only widens the partial-deletion window.

use std::future::Future;

use futures::future::join_all;
use tokio::task::JoinSet;
use tracing::error;

use vaultgate_core::{Error, Result};

/// Run every future to completion and return all outcomes in input order.
///
/// Never short-circuits; a failed operation does not stop its siblings.
pub async fn settle_all<T, F>(futures: Vec<F>) -> Vec<Result<T>>
where
    F: Future<Output = Result<T>>,
{
    join_all(futures).await
}

/// Run every future concurrently, aborting the rest on the first failure.
///
/// Tasks that finished before the failing one stand; their effects are not
/// rolled back. Returns the first error observed, or `Ok(())` when every task
/// succeeded. Panicked tasks surface as `Error::Internal`.
pub async fn abort_on_first_failure<F>(futures: Vec<F>) -> Result<()>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let mut set = JoinSet::new();
    for future in futures {
        set.spawn(future);
    }

    while let Some(joined) = set.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Fan-out task panicked: {}", e);
                Err(Error::Internal(format!("fan-out task failed: {}", e)))
            }
        };
        if let Err(e) = outcome {
            set.abort_all();
            // Drain so aborted tasks are fully retired before returning.
            while set.join_next().await.is_some() {}
            return Err(e);
        }
    }
    Ok(())
}
