//! Interrupt handling for the poll loop.
//!
//! The first signal cancels the loop so the current cycle can finish cleanly. A second
//! signal means the operator does not want to wait, and the watcher returns so the caller
//! can end the process.

use std::future::Future;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::strings::logs;

/// Waits for signals from `next_signal`. Cancels `cancel` on the first and returns on the
/// second. An error from the listener is returned as is.
pub async fn watch<F, Fut>(cancel: CancellationToken, mut next_signal: F) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    next_signal().await?;
    info!("{}", logs::SHUTDOWN_REQUESTED);
    cancel.cancel();

    next_signal().await?;
    warn!("{}", logs::FORCE_EXIT);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::{Mutex, mpsc};

    #[tokio::test]
    async fn test_second_signal_ends_watch() {
        let (tx, rx) = mpsc::unbounded_channel::<()>();
        let rx = Arc::new(Mutex::new(rx));
        let next_signal = move || {
            let rx = rx.clone();
            async move {
                rx.lock()
                    .await
                    .recv()
                    .await
                    .ok_or_else(|| io::Error::other("signal source closed"))
            }
        };
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(watch(cancel.clone(), next_signal));

        tx.send(()).unwrap();
        cancel.cancelled().await;
        assert!(!watcher.is_finished());

        tx.send(()).unwrap();
        watcher.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_listener_error_leaves_loop_running() {
        let cancel = CancellationToken::new();
        let result = watch(cancel.clone(), || async {
            Err(io::Error::other("no signal handler"))
        })
        .await;

        assert!(result.is_err());
        assert!(!cancel.is_cancelled());
    }
}
