use chess::{MoveError, Request, Response, StatusSnapshot};
use tokio::sync::{broadcast, oneshot};

use super::events::ControllerEvent;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Commands sent to the controller actor. Each embeds a oneshot for the reply.
pub enum ControllerCommand {
    Submit {
        request: Request,
        reply: oneshot::Sender<Result<Response, ControllerError>>,
    },
    GetSnapshot {
        reply: oneshot::Sender<StatusSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<(StatusSnapshot, broadcast::Receiver<ControllerEvent>)>,
    },
    Shutdown,
}
