use chess::{MoveOutcome, MoveRequest, Request, Response, StatusSnapshot};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::commands::*;
use super::events::ControllerEvent;

/// Cheap, cloneable handle to the controller actor.
#[derive(Clone)]
pub struct ControllerHandle {
    cmd_tx: mpsc::Sender<ControllerCommand>,
}

impl ControllerHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<ControllerCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn submit(&self, request: Request) -> Result<Response, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(ControllerCommand::Submit { request, reply: tx })
            .await?;
        rx.await
            .map_err(|_| ControllerError::Internal("Reply dropped".into()))?
    }

    pub async fn make_move(&self, request: MoveRequest) -> Result<MoveOutcome, ControllerError> {
        match self.submit(Request::Move(request)).await? {
            Response::Moved(outcome) => Ok(outcome),
            Response::Status(_) => Err(ControllerError::Internal(
                "Status returned for a move request".into(),
            )),
        }
    }

    pub async fn get_snapshot(&self) -> Result<StatusSnapshot, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(ControllerCommand::GetSnapshot { reply: tx })
            .await?;
        rx.await
            .map_err(|_| ControllerError::Internal("Reply dropped".into()))
    }

    pub async fn subscribe(
        &self,
    ) -> Result<(StatusSnapshot, broadcast::Receiver<ControllerEvent>), ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.send(ControllerCommand::Subscribe { reply: tx }).await?;
        rx.await
            .map_err(|_| ControllerError::Internal("Reply dropped".into()))
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(ControllerCommand::Shutdown).await;
    }

    async fn send(&self, cmd: ControllerCommand) -> Result<(), ControllerError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ControllerError::Internal("Controller actor closed".into()))
    }
}
