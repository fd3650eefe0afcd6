//! The seam between the rules engine and the gantry hardware.
//!
//! The resolver is the only caller. Piece managers never see an actuator.

use crate::error::ActuatorError;
use crate::square::Square;

/// Physical mover of pieces.
pub trait Actuator {
    /// Carry the piece standing on `from` to `to` along one straight or
    /// diagonal leg. The effector travels to `from` first if it is elsewhere.
    fn move_effector(&mut self, from: Square, to: Square) -> Result<(), ActuatorError>;

    /// Release the piece and return the effector to its home square.
    fn retract_effector(&mut self) -> Result<(), ActuatorError>;

    /// Tell the operator that the piece on `at` has been captured and must be
    /// lifted off the board.
    fn signal_capture(&mut self, _at: Square) -> Result<(), ActuatorError> {
        Ok(())
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn move_effector(&mut self, from: Square, to: Square) -> Result<(), ActuatorError> {
        (**self).move_effector(from, to)
    }

    fn retract_effector(&mut self) -> Result<(), ActuatorError> {
        (**self).retract_effector()
    }

    fn signal_capture(&mut self, at: Square) -> Result<(), ActuatorError> {
        (**self).signal_capture(at)
    }
}

/// Reject legs the gantry cannot drag a piece along.
pub fn check_leg(from: Square, to: Square) -> Result<(), ActuatorError> {
    let (df, dr) = from.delta_to(to);
    let straight = df == 0 || dr == 0;
    let diagonal = df.abs() == dr.abs();
    if from.is_off_board() || to.is_off_board() || !(straight || diagonal) {
        return Err(ActuatorError::InvalidPath { from, to });
    }
    Ok(())
}

/// Split a move into legs the gantry accepts. Knight moves become two
/// axis-aligned legs, long axis first; everything else is a single leg.
pub fn transport_legs(from: Square, to: Square) -> Vec<(Square, Square)> {
    let (df, dr) = from.delta_to(to);
    let corner = match (df.abs(), dr.abs()) {
        (2, 1) => from.offset(df, 0),
        (1, 2) => from.offset(0, dr),
        _ => None,
    };
    match corner {
        Some(corner) => vec![(from, corner), (corner, to)],
        None => vec![(from, to)],
    }
}

/// A call observed by [`RecordingActuator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuatorCall {
    Move { from: Square, to: Square },
    Retract,
    SignalCapture(Square),
}

/// In-memory actuator that records every call and validates legs like the
/// real gantry. Can be told to fail on a given call.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    calls: Vec<ActuatorCall>,
    fail_at: Option<(usize, ActuatorError)>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call with zero-based position `call` (counted over the
    /// actuator's lifetime) with `error`.
    pub fn failing_at(call: usize, error: ActuatorError) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some((call, error)),
        }
    }

    pub fn calls(&self) -> &[ActuatorCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: ActuatorCall) -> Result<(), ActuatorError> {
        let position = self.calls.len();
        self.calls.push(call);
        match &self.fail_at {
            Some((at, error)) if *at == position => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl Actuator for RecordingActuator {
    fn move_effector(&mut self, from: Square, to: Square) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Move { from, to })?;
        check_leg(from, to)
    }

    fn retract_effector(&mut self) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Retract)
    }

    fn signal_capture(&mut self, at: Square) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::SignalCapture(at))
    }
}
