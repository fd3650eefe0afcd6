//! The controller actor: owns the move resolver and serializes every request
//! through one task.

pub mod actor;
pub mod commands;
pub mod events;
pub mod handle;

use chess::{Actuator, MoveResolver};
use tokio::sync::{broadcast, mpsc};

use actor::run_controller;
pub use commands::ControllerError;
pub use events::{log_events, ControllerEvent};
pub use handle::ControllerHandle;

/// Spawn the actor onto the current runtime and return a handle to it.
///
/// Actuation blocks the actor's worker thread, so the runtime must be
/// multi-threaded.
pub fn spawn<A>(resolver: MoveResolver<A>) -> ControllerHandle
where
    A: Actuator + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, _) = broadcast::channel(100);
    tokio::spawn(run_controller(resolver, cmd_rx, event_tx));
    ControllerHandle::new(cmd_tx)
}
