use crate::board_display::DisplayBoardError;
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// Why a move request has no single legal candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoCandidate {
    #[error("{0} is occupied by a piece of the side to move")]
    OwnPieceOnDestination(Square),
    #[error("no {kind} of the side to move stands on {square}")]
    NoPieceAtSource { kind: PieceKind, square: Square },
    #[error("no {0} can reach the destination")]
    NoLegalCandidate(PieceKind),
    #[error("{count} pieces of kind {kind} can reach the destination; name the source square")]
    Ambiguous { kind: PieceKind, count: usize },
    #[error("a pawn cannot be promoted to {0}")]
    InvalidPromotion(PieceKind),
    #[error("promotion requested but {0} is not on the last rank")]
    NotLastRank(Square),
}

/// Failure reported by an [`Actuator`](crate::Actuator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    /// The leg is neither straight nor diagonal.
    #[error("path {from} -> {to} is neither straight nor diagonal")]
    InvalidPath { from: Square, to: Square },
    #[error("hardware failure: {0}")]
    Hardware(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("illegal move: {0}")]
    NoCandidate(#[from] NoCandidate),
    #[error("actuation failed: {0}")]
    Actuation(#[from] ActuatorError),
}

/// Failure while building a custom position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{0} is already occupied")]
    Occupied(Square),
    #[error("{color} already has every {kind} on the board")]
    RosterFull { color: PieceColor, kind: PieceKind },
    #[error("{0} is not a board square")]
    OffBoard(Square),
    #[error("a pawn cannot be promoted to {0}")]
    InvalidPromotion(PieceKind),
    #[error(transparent)]
    Placement(#[from] DisplayBoardError),
}
