//! Two-axis gantry with an electromagnet effector.
//!
//! [`GantryActuator`] implements [`chess::Actuator`]: it plans each leg into
//! step segments, sequences board and magnet power around the motion and
//! hands the pulses to a [`MotionBackend`].

pub mod backend;
pub mod plan;

pub use backend::{MotionBackend, Rail, SimulatedBackend};
pub use plan::{Axis, Direction, Segment, StepPosition};

use std::time::Duration;

use chess::{Actuator, ActuatorError, Square};

pub const DEFAULT_STEPS_PER_SQUARE: u32 = 200;
pub const DEFAULT_DIAGONAL_CHUNK: u32 = 5;
pub const DEFAULT_POWER_UP: Duration = Duration::from_millis(1000);
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);
pub const DEFAULT_PULSE: Duration = Duration::from_micros(800);
pub const DEFAULT_ALERT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GantryError {
    #[error("cannot carry a piece from {from} to {to} in one leg")]
    InvalidLeg { from: Square, to: Square },
    #[error("step count does not fit the stepper counter")]
    Overflow,
    #[error("stepper driver is not powered")]
    Unpowered,
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<GantryError> for ActuatorError {
    fn from(error: GantryError) -> Self {
        match error {
            GantryError::InvalidLeg { from, to } => ActuatorError::InvalidPath { from, to },
            other => ActuatorError::Hardware(other.to_string()),
        }
    }
}

/// Mechanical and timing parameters of the gantry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GantryConfig {
    pub steps_per_square: u32,
    /// Steps per axis before switching axes on a diagonal leg.
    pub diagonal_chunk: u32,
    /// Wait after powering the driver board.
    pub power_up: Duration,
    /// Wait after the last pulse before powering off.
    pub settle: Duration,
    /// How long the capture lamp stays lit.
    pub alert: Duration,
}

impl Default for GantryConfig {
    fn default() -> Self {
        Self {
            steps_per_square: DEFAULT_STEPS_PER_SQUARE,
            diagonal_chunk: DEFAULT_DIAGONAL_CHUNK,
            power_up: DEFAULT_POWER_UP,
            settle: DEFAULT_SETTLE,
            alert: DEFAULT_ALERT,
        }
    }
}

/// The effector homes at A1 and returns there after every move.
pub struct GantryActuator<B> {
    config: GantryConfig,
    backend: B,
    head: StepPosition,
}

impl<B: MotionBackend> GantryActuator<B> {
    pub fn new(config: GantryConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            head: StepPosition::HOME,
        }
    }

    pub fn config(&self) -> &GantryConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Effector location in steps from A1.
    pub fn head(&self) -> StepPosition {
        self.head
    }

    fn drive(&mut self, segments: &[Segment]) -> Result<(), GantryError> {
        for segment in segments {
            self.backend
                .step(segment.axis, segment.direction, segment.steps)?;
            self.head.advance(segment);
        }
        Ok(())
    }

    /// Run `segments` between power-up and power-down of `rails`. Rails are
    /// switched off even when a segment fails.
    fn powered(&mut self, rails: &[Rail], segments: &[Segment]) -> Result<(), GantryError> {
        if segments.is_empty() {
            return Ok(());
        }
        let result = self.power_and_drive(rails, segments);
        for rail in rails.iter().rev() {
            if let Err(e) = self.backend.set_power(*rail, false) {
                tracing::error!(?rail, error = %e, "failed to switch rail off");
            }
        }
        result
    }

    fn power_and_drive(&mut self, rails: &[Rail], segments: &[Segment]) -> Result<(), GantryError> {
        for rail in rails {
            self.backend.set_power(*rail, true)?;
        }
        self.backend.pause(self.config.power_up);
        self.drive(segments)?;
        self.backend.pause(self.config.settle);
        Ok(())
    }

    /// Move the empty effector to `to` axis by axis.
    fn travel_to(&mut self, to: StepPosition) -> Result<(), GantryError> {
        let segments = plan::travel(self.head, to)?;
        tracing::debug!(from = ?self.head, ?to, segments = segments.len(), "travel");
        self.powered(&[Rail::Board], &segments)
    }

    fn carry(&mut self, from: Square, to: Square) -> Result<(), GantryError> {
        let segments = plan::carry(
            from,
            to,
            self.config.steps_per_square,
            self.config.diagonal_chunk,
        )?;
        let start = StepPosition::of(from, self.config.steps_per_square);
        if self.head != start {
            self.travel_to(start)?;
        }
        tracing::debug!(%from, %to, segments = segments.len(), "carry");
        self.powered(&[Rail::Board, Rail::Magnet], &segments)
    }
}

impl<B: MotionBackend> Actuator for GantryActuator<B> {
    fn move_effector(&mut self, from: Square, to: Square) -> Result<(), ActuatorError> {
        Ok(self.carry(from, to)?)
    }

    fn retract_effector(&mut self) -> Result<(), ActuatorError> {
        Ok(self.travel_to(StepPosition::HOME)?)
    }

    fn signal_capture(&mut self, at: Square) -> Result<(), ActuatorError> {
        tracing::info!(%at, "remove the captured piece");
        self.backend.set_power(Rail::Alert, true)?;
        self.backend.pause(self.config.alert);
        Ok(self.backend.set_power(Rail::Alert, false)?)
    }
}
