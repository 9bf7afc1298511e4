use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::metrics::RunState;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// Fires the run's stop signal when the first shutdown notice arrives.
///
/// The task exits without stopping the run when every sender is dropped.
pub fn stop_run_on_shutdown(
    shutdown_tx: &ShutdownSender,
    state: Arc<RunState>,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        match shutdown_rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                if state.request_stop() {
                    warn!(
                        "Stop requested after {} ms; waiting for in-flight requests",
                        state.elapsed().as_millis()
                    );
                }
            }
            Err(broadcast::error::RecvError::Closed) => {}
        }
    })
}
