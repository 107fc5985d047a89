use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use wacapture_core::GatewayEvent;

use crate::handler::IngestionHandler;

/// Drive the handler set until the event channel closes.
///
/// Each event gets its own task so a slow download never holds up the next
/// message. Returns the number of events dispatched once every task has finished.
pub async fn run(handler: Arc<IngestionHandler>, mut events: mpsc::Receiver<GatewayEvent>) -> usize {
    let mut tasks = JoinSet::new();
    let mut dispatched = 0usize;

    while let Some(event) = events.recv().await {
        dispatched += 1;
        let handler = Arc::clone(&handler);
        tasks.spawn(async move {
            let kind = event.kind();
            if let Err(e) = handler.handle(event).await {
                error!(event = kind, error = %e, "Handler failed");
            }
        });

        while let Some(joined) = tasks.try_join_next() {
            reap(joined);
        }
    }

    debug!(pending = tasks.len(), "Event stream closed; draining handlers");
    while let Some(joined) = tasks.join_next().await {
        reap(joined);
    }
    info!(dispatched, "Ingestion stopped");
    dispatched
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Handler task panicked");
    }
}
