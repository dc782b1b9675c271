//! Timeout-guarded dispatch of account store operations.
//!
//! A store operation runs on its own task and reports over a single-use
//! channel while the request task waits for whichever comes first: the
//! result or the deadline. The losing store task is cancelled, and any result
//! it still produces is dropped without reaching the requester.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{DispatchError, StoreError};

/// Deadline for a single store operation.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs `operation` on a separate task and waits at most `limit` for it.
///
/// The spawned task always sends exactly one message: the operation's result,
/// or [`StoreError::Cancelled`] if cancellation wins. Cancellation happens when
/// the deadline passes or when the returned future is dropped.
pub async fn dispatch_with_timeout<T, Fut>(limit: Duration, operation: Fut) -> Result<T, DispatchError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
{
    let cancel_token = CancellationToken::new();
    let task_token = cancel_token.clone();
    let (result_tx, result_rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = tokio::select! {
            biased;
            _ = task_token.cancelled() => Err(StoreError::Cancelled),
            result = operation => result,
        };

        if result_tx.send(result).is_err() {
            debug!("Discarding store result; requester stopped waiting");
        }
    });

    let _cancel_on_exit = cancel_token.drop_guard();

    match tokio::time::timeout(limit, result_rx).await {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(_)) => Err(StoreError::Internal(anyhow::anyhow!(
            "store task exited without reporting a result"
        ))
        .into()),
        Err(_) => {
            warn!("Store operation exceeded {:?}; cancelling", limit);
            Err(DispatchError::TimedOut(limit))
        }
    }
}
