//! Backend main loop: owns the Tokio runtime and the REST client.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tokio::runtime::Runtime;

use super::client::RestClient;
use super::handlers;
use crate::feed::SenderDirectory;
use crate::protocol::{BackendAction, ErrorContext, GuiEvent};

/// Run the backend event loop on a tokio runtime.
///
/// Every action runs on its own task, so a slow history fetch never holds up
/// a channel switch queued behind it. Returns when `Shutdown` arrives or the
/// UI side drops its sender.
pub fn run_backend(action_rx: Receiver<BackendAction>, event_tx: Sender<GuiEvent>, base_url: String) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to build backend runtime: {}", e);
            let _ = event_tx.send(GuiEvent::error(
                ErrorContext::Backend,
                format!("Failed to create Tokio runtime: {}", e),
            ));
            return;
        }
    };

    let client = RestClient::new(&base_url);
    let directory = Arc::new(SenderDirectory::new());
    tracing::info!(backend = client.base_url(), "backend worker ready");

    rt.block_on(async move {
        loop {
            match action_rx.try_recv() {
                Ok(BackendAction::Shutdown) => break,
                Ok(action) => {
                    let client = client.clone();
                    let directory = Arc::clone(&directory);
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        handlers::handle_backend_action(action, &client, &directory, &event_tx)
                            .await;
                    });
                }
                Err(TryRecvError::Empty) => {
                    // Nothing queued, sleep a bit to avoid busy-looping
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }
    });
    tracing::info!("backend worker stopped");
}
