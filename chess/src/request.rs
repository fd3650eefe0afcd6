//! Structured requests handed to the resolver by the command tokenizer.

use serde::{Deserialize, Serialize};

use crate::square::Square;
use crate::types::PieceKind;

/// A request to move one piece.
///
/// `promotion` on a pawn request either names the kind of an already
/// promoted pawn to move, or the kind a pawn reaching the last rank becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub piece: PieceKind,
    pub promotion: Option<PieceKind>,
    pub source: Option<Square>,
    pub destination: Square,
}

impl MoveRequest {
    pub fn new(piece: PieceKind, destination: Square) -> Self {
        Self {
            piece,
            promotion: None,
            source: None,
            destination,
        }
    }

    pub fn from_square(mut self, source: Square) -> Self {
        self.source = Some(source);
        self
    }

    pub fn promoted(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }
}

impl std::fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.piece)?;
        if let Some(promotion) = self.promotion {
            write!(f, " ({promotion})")?;
        }
        if let Some(source) = self.source {
            write!(f, " from {source}")?;
        }
        write!(f, " to {}", self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    Move(MoveRequest),
    /// Read-only dump of the board and rosters.
    Status,
}

impl From<MoveRequest> for Request {
    fn from(request: MoveRequest) -> Self {
        Self::Move(request)
    }
}
