//! Piece records and the fixed per-color rosters that hold them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::BACK_RANK;
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// One physical piece. Records are never dropped: a captured piece is parked
/// on [`Square::OFF_BOARD`] with `alive == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub square: Square,
    pub alive: bool,
    /// Pawns only: the two-step advance is still available.
    pub first_move: bool,
    /// Pawns only: kind this pawn moves as after reaching the last rank.
    pub promoted_kind: Option<PieceKind>,
}

impl PieceRecord {
    pub fn new(square: Square) -> Self {
        Self {
            square,
            alive: true,
            first_move: false,
            promoted_kind: None,
        }
    }

    pub fn pawn(square: Square) -> Self {
        Self {
            first_move: true,
            ..Self::new(square)
        }
    }

    /// A record for a piece that is not on the board.
    pub fn captured() -> Self {
        Self {
            square: Square::OFF_BOARD,
            alive: false,
            first_move: false,
            promoted_kind: None,
        }
    }

    pub fn is_at(&self, square: Square) -> bool {
        self.alive && self.square == square
    }

    pub(crate) fn retire(&mut self) {
        self.alive = false;
        self.square = Square::OFF_BOARD;
    }
}

/// Fixed-size collection of one kind's pieces for one color. Built at full
/// length and never grown or shrunk afterwards.
pub type Roster = SmallVec<[PieceRecord; 8]>;

/// Starting squares of `kind` for `color`.
pub fn starting_squares(kind: PieceKind, color: PieceColor) -> Vec<Square> {
    if kind == PieceKind::Pawn {
        return (0..8)
            .filter_map(|file| Square::new(file, color.pawn_rank()))
            .collect();
    }
    BACK_RANK
        .iter()
        .enumerate()
        .filter(|(_, k)| **k == kind)
        .filter_map(|(file, _)| Square::new(file as u8, color.back_rank()))
        .collect()
}

pub(crate) fn standard_roster(kind: PieceKind, color: PieceColor) -> Roster {
    starting_squares(kind, color)
        .into_iter()
        .map(|square| match kind {
            PieceKind::Pawn => PieceRecord::pawn(square),
            _ => PieceRecord::new(square),
        })
        .collect()
}

pub(crate) fn empty_roster(kind: PieceKind) -> Roster {
    std::iter::repeat(PieceRecord::captured())
        .take(kind.roster_size())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::sq;

    #[test]
    fn test_standard_rosters() {
        let rooks = standard_roster(PieceKind::Rook, PieceColor::Black);
        assert_eq!(rooks.len(), 2);
        assert_eq!(rooks[0].square, sq("A8"));
        assert_eq!(rooks[1].square, sq("H8"));

        let pawns = standard_roster(PieceKind::Pawn, PieceColor::White);
        assert_eq!(pawns.len(), 8);
        assert!(pawns.iter().all(|p| p.first_move && p.alive));

        let king = standard_roster(PieceKind::King, PieceColor::White);
        assert_eq!(king.len(), 1);
        assert!(!king[0].first_move);
    }

    #[test]
    fn test_empty_roster_is_full_length_and_dead() {
        let knights = empty_roster(PieceKind::Knight);
        assert_eq!(knights.len(), 2);
        assert!(knights.iter().all(|k| !k.alive && k.square.is_off_board()));
    }

    #[test]
    fn test_retire() {
        let mut record = PieceRecord::pawn(sq("C2"));
        record.retire();
        assert!(!record.alive);
        assert_eq!(record.square, Square::OFF_BOARD);
        assert!(!record.is_at(sq("C2")));
    }
}
