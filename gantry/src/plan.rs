//! Motion planning: turn board legs into per-axis step segments.

use chess::Square;

use crate::GantryError;

/// Stepper axis. X runs along the files, Y along the ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Stepping direction, `Forward` towards file H / rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn of(delta: i64) -> Self {
        if delta < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    fn sign(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// A run of steps on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub axis: Axis,
    pub direction: Direction,
    pub steps: u32,
}

impl Segment {
    /// Signed displacement of this segment in steps.
    pub fn delta(&self) -> i64 {
        self.direction.sign() * self.steps as i64
    }
}

/// Effector location in steps from the home corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepPosition {
    pub x: i64,
    pub y: i64,
}

impl StepPosition {
    pub const HOME: StepPosition = StepPosition { x: 0, y: 0 };

    pub fn of(square: Square, steps_per_square: u32) -> Self {
        Self {
            x: square.file() as i64 * steps_per_square as i64,
            y: square.rank() as i64 * steps_per_square as i64,
        }
    }

    pub fn advance(&mut self, segment: &Segment) {
        match segment.axis {
            Axis::X => self.x += segment.delta(),
            Axis::Y => self.y += segment.delta(),
        }
    }
}

fn segment(axis: Axis, delta: i64) -> Result<Option<Segment>, GantryError> {
    if delta == 0 {
        return Ok(None);
    }
    let steps = u32::try_from(delta.unsigned_abs()).map_err(|_| GantryError::Overflow)?;
    Ok(Some(Segment {
        axis,
        direction: Direction::of(delta),
        steps,
    }))
}

/// Free transport with the magnet off: X first, then Y.
pub fn travel(from: StepPosition, to: StepPosition) -> Result<Vec<Segment>, GantryError> {
    let x = segment(Axis::X, to.x - from.x)?;
    let y = segment(Axis::Y, to.y - from.y)?;
    Ok(x.into_iter().chain(y).collect())
}

/// Transport with the magnet engaged along one straight or diagonal leg.
///
/// Diagonal legs alternate X and Y in runs of `chunk` steps so the piece
/// stays close to the diagonal; the last pair carries any remainder.
pub fn carry(
    from: Square,
    to: Square,
    steps_per_square: u32,
    chunk: u32,
) -> Result<Vec<Segment>, GantryError> {
    if from.is_off_board() || to.is_off_board() {
        return Err(GantryError::InvalidLeg { from, to });
    }
    let (df, dr) = from.delta_to(to);

    if df == 0 || dr == 0 {
        return travel(
            StepPosition::of(from, steps_per_square),
            StepPosition::of(to, steps_per_square),
        );
    }
    if df.abs() != dr.abs() {
        return Err(GantryError::InvalidLeg { from, to });
    }

    let total = u32::from(df.unsigned_abs())
        .checked_mul(steps_per_square)
        .ok_or(GantryError::Overflow)?;
    let chunk = chunk.clamp(1, total.max(1));
    let x = Direction::of(df as i64);
    let y = Direction::of(dr as i64);

    let mut segments = Vec::with_capacity(2 * (total / chunk + 1) as usize);
    let mut remaining = total;
    while remaining > 0 {
        let steps = remaining.min(chunk);
        segments.push(Segment { axis: Axis::X, direction: x, steps });
        segments.push(Segment { axis: Axis::Y, direction: y, steps });
        remaining -= steps;
    }
    Ok(segments)
}
