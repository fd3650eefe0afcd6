use chess::{Actuator, MoveError, MoveResolver, Request, Response};
use tokio::sync::{broadcast, mpsc};
use tracing::Instrument;

use super::commands::*;
use super::events::*;

/// The controller actor loop. Owns the resolver; commands run one at a time.
pub(crate) async fn run_controller<A: Actuator>(
    resolver: MoveResolver<A>,
    cmd_rx: mpsc::Receiver<ControllerCommand>,
    event_tx: broadcast::Sender<ControllerEvent>,
) {
    run_controller_inner(resolver, cmd_rx, event_tx)
        .instrument(tracing::info_span!("controller"))
        .await;
}

async fn run_controller_inner<A: Actuator>(
    mut resolver: MoveResolver<A>,
    mut cmd_rx: mpsc::Receiver<ControllerCommand>,
    event_tx: broadcast::Sender<ControllerEvent>,
) {
    tracing::info!("Controller actor started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            ControllerCommand::Shutdown => {
                tracing::info!("Controller actor shutting down");
                break;
            }
            cmd => handle_command(&mut resolver, cmd, &event_tx),
        }
    }

    tracing::info!("Controller actor exited");
}

fn handle_command<A: Actuator>(
    resolver: &mut MoveResolver<A>,
    cmd: ControllerCommand,
    event_tx: &broadcast::Sender<ControllerEvent>,
) {
    match cmd {
        ControllerCommand::Submit { request, reply } => {
            let result = match request {
                Request::Status => Ok(Response::Status(resolver.status())),
                Request::Move(request) => {
                    // Returns only once the gantry is back home.
                    let result = tokio::task::block_in_place(|| resolver.execute(request));
                    let event = match &result {
                        Ok(outcome) => ControllerEvent::MoveCommitted(outcome.record),
                        Err(MoveError::NoCandidate(reason)) => ControllerEvent::MoveRejected {
                            request,
                            reason: reason.to_string(),
                        },
                        Err(MoveError::Actuation(error)) => ControllerEvent::ActuationFailed {
                            request,
                            error: error.to_string(),
                        },
                    };
                    let _ = event_tx.send(event);
                    result.map(Response::Moved)
                }
            };
            let _ = reply.send(result.map_err(ControllerError::from));
        }
        ControllerCommand::GetSnapshot { reply } => {
            let _ = reply.send(resolver.status());
        }
        ControllerCommand::Subscribe { reply } => {
            let _ = reply.send((resolver.status(), event_tx.subscribe()));
        }
        ControllerCommand::Shutdown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{spawn, ControllerHandle};
    use chess::{
        ActuatorError, MoveRequest, NoCandidate, PieceColor, PieceKind, RecordingActuator, Square,
    };

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn spawn_test_actor(actuator: RecordingActuator) -> ControllerHandle {
        spawn(MoveResolver::new(actuator))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_make_move_via_actor() {
        let handle = spawn_test_actor(RecordingActuator::new());
        let (_, mut events) = handle.subscribe().await.unwrap();

        let outcome = handle
            .make_move(MoveRequest::new(PieceKind::Pawn, sq("E4")))
            .await
            .unwrap();
        assert_eq!(outcome.turn, PieceColor::Black);

        let event = events.recv().await.unwrap();
        assert!(matches!(event, ControllerEvent::MoveCommitted(r) if r.to == sq("E4")));

        let snapshot = handle.get_snapshot().await.unwrap();
        assert_eq!(snapshot.turn, PieceColor::Black);
        assert_eq!(snapshot.history.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejected_move_is_reported() {
        let handle = spawn_test_actor(RecordingActuator::new());
        let (_, mut events) = handle.subscribe().await.unwrap();

        let result = handle
            .make_move(MoveRequest::new(PieceKind::Rook, sq("A5")))
            .await;
        assert!(matches!(
            result,
            Err(ControllerError::Move(MoveError::NoCandidate(
                NoCandidate::NoLegalCandidate(PieceKind::Rook)
            )))
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ControllerEvent::MoveRejected { .. }
        ));
        assert_eq!(handle.get_snapshot().await.unwrap().turn, PieceColor::White);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_actuation_failure_is_reported() {
        let handle = spawn_test_actor(RecordingActuator::failing_at(
            0,
            ActuatorError::Hardware("limit switch".into()),
        ));
        let (before, mut events) = handle.subscribe().await.unwrap();

        let result = handle
            .make_move(MoveRequest::new(PieceKind::Knight, sq("F3")))
            .await;
        assert!(matches!(
            result,
            Err(ControllerError::Move(MoveError::Actuation(_)))
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            ControllerEvent::ActuationFailed { .. }
        ));
        assert_eq!(handle.get_snapshot().await.unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_status_request_does_not_broadcast() {
        let handle = spawn_test_actor(RecordingActuator::new());
        let (_, mut events) = handle.subscribe().await.unwrap();

        let response = handle.submit(Request::Status).await.unwrap();
        assert!(matches!(response, Response::Status(s) if s.turn == PieceColor::White));
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_requests_are_serialized() {
        let handle = spawn_test_actor(RecordingActuator::new());
        let white = handle.clone();
        let black = handle.clone();

        white
            .make_move(MoveRequest::new(PieceKind::Pawn, sq("D4")))
            .await
            .unwrap();
        black
            .make_move(MoveRequest::new(PieceKind::Pawn, sq("D5")))
            .await
            .unwrap();

        let snapshot = handle.get_snapshot().await.unwrap();
        let plies: Vec<_> = snapshot.history.iter().map(|r| (r.ply, r.color)).collect();
        assert_eq!(plies, vec![(1, PieceColor::White), (2, PieceColor::Black)]);
        assert!(!snapshot.history.iter().any(|r| r.captured.is_some()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_event_log_drains_until_shutdown() {
        let handle = spawn_test_actor(RecordingActuator::new());
        let (_, events) = handle.subscribe().await.unwrap();
        let logger = tokio::spawn(crate::controller::log_events(events));

        handle
            .make_move(MoveRequest::new(PieceKind::Pawn, sq("E4")))
            .await
            .unwrap();
        assert!(handle
            .make_move(MoveRequest::new(PieceKind::Rook, sq("A5")))
            .await
            .is_err());
        handle.shutdown().await;

        assert_eq!(logger.await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_closes_the_handle() {
        let handle = spawn_test_actor(RecordingActuator::new());
        handle.shutdown().await;
        tokio::task::yield_now().await;
        let mut closed = false;
        for _ in 0..50 {
            if handle.get_snapshot().await.is_err() {
                closed = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(closed);
    }
}
