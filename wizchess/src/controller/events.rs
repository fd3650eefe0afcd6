use chess::{MoveRecord, MoveRequest};
use tokio::sync::broadcast;

/// Events broadcast from the controller actor to all subscribers.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    MoveCommitted(MoveRecord),
    /// No single legal candidate; nothing moved.
    MoveRejected { request: MoveRequest, reason: String },
    /// The gantry failed; the board model was left as it was.
    ActuationFailed { request: MoveRequest, error: String },
}

/// Log every event until the actor goes away. Returns how many were seen.
pub async fn log_events(mut events: broadcast::Receiver<ControllerEvent>) -> usize {
    let mut seen = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                seen += 1;
                match event {
                    ControllerEvent::MoveCommitted(record) => {
                        tracing::info!(%record, ply = record.ply, "event: move committed");
                    }
                    ControllerEvent::MoveRejected { request, reason } => {
                        tracing::info!(%request, %reason, "event: move rejected");
                    }
                    ControllerEvent::ActuationFailed { request, error } => {
                        tracing::error!(%request, %error, "event: actuation failed");
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    seen
}
