use std::time::Duration;

use crate::plan::{Axis, Direction};
use crate::GantryError;

/// Switched power outputs of the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    /// Stepper driver board.
    Board,
    /// Electromagnet under the effector.
    Magnet,
    /// Lamp asking the operator to lift a captured piece.
    Alert,
}

impl Rail {
    fn index(self) -> usize {
        match self {
            Rail::Board => 0,
            Rail::Magnet => 1,
            Rail::Alert => 2,
        }
    }
}

/// Pulse generation for the two stepper axes and the power rails.
///
/// Implementations talk to the hardware; planning and sequencing live in
/// [`GantryActuator`](crate::GantryActuator).
pub trait MotionBackend {
    fn set_power(&mut self, rail: Rail, on: bool) -> Result<(), GantryError>;

    fn step(&mut self, axis: Axis, direction: Direction, steps: u32) -> Result<(), GantryError>;

    fn pause(&mut self, duration: Duration);
}

impl<B: MotionBackend + ?Sized> MotionBackend for Box<B> {
    fn set_power(&mut self, rail: Rail, on: bool) -> Result<(), GantryError> {
        (**self).set_power(rail, on)
    }

    fn step(&mut self, axis: Axis, direction: Direction, steps: u32) -> Result<(), GantryError> {
        (**self).step(axis, direction, steps)
    }

    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

/// Backend without hardware. Logs every pulse train and, unless running
/// instantly, sleeps for as long as the real steppers would take.
#[derive(Debug)]
pub struct SimulatedBackend {
    pulse: Duration,
    realtime: bool,
    rails: [bool; 3],
    steps_taken: u64,
}

impl SimulatedBackend {
    /// `pulse` is the half period of one step pulse.
    pub fn new(pulse: Duration) -> Self {
        Self {
            pulse,
            realtime: true,
            rails: [false; 3],
            steps_taken: 0,
        }
    }

    /// A backend that never sleeps.
    pub fn instant() -> Self {
        Self {
            realtime: false,
            ..Self::new(Duration::ZERO)
        }
    }

    pub fn is_powered(&self, rail: Rail) -> bool {
        self.rails[rail.index()]
    }

    /// Total steps issued over the backend's lifetime.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    fn sleep(&self, duration: Duration) {
        if self.realtime && !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl MotionBackend for SimulatedBackend {
    fn set_power(&mut self, rail: Rail, on: bool) -> Result<(), GantryError> {
        tracing::trace!(?rail, on, "switch rail");
        self.rails[rail.index()] = on;
        Ok(())
    }

    fn step(&mut self, axis: Axis, direction: Direction, steps: u32) -> Result<(), GantryError> {
        if !self.is_powered(Rail::Board) {
            return Err(GantryError::Unpowered);
        }
        tracing::trace!(?axis, ?direction, steps, "step");
        self.steps_taken += u64::from(steps);
        self.sleep(self.pulse.saturating_mul(steps).saturating_mul(2));
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        self.sleep(duration);
    }
}
