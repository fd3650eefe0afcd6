//! The 64-cell occupancy grid.
//!
//! `BoardState` is a passive store: it records which square holds what and
//! enforces no rule. All legality lives in the piece managers and every
//! mutation goes through the resolver's commit step.

use serde::{Deserialize, Serialize};

use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// Color slot of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColor {
    White,
    Black,
    Empty,
    /// The occupant is an opposing piece that must be retired before the
    /// moving piece lands here. Only ever set on a staged board.
    PendingRemoval,
}

impl From<PieceColor> for CellColor {
    fn from(c: PieceColor) -> Self {
        match c {
            PieceColor::White => Self::White,
            PieceColor::Black => Self::Black,
        }
    }
}

/// Occupancy record bound to one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub occupied: bool,
    pub color: CellColor,
    pub kind: Option<PieceKind>,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        occupied: false,
        color: CellColor::Empty,
        kind: None,
    };

    pub fn with_piece(color: PieceColor, kind: PieceKind) -> Self {
        Self {
            occupied: true,
            color: color.into(),
            kind: Some(kind),
        }
    }

    /// Owner of the occupant, if the cell holds a settled piece.
    pub fn piece_color(&self) -> Option<PieceColor> {
        match self.color {
            CellColor::White => Some(PieceColor::White),
            CellColor::Black => Some(PieceColor::Black),
            CellColor::Empty | CellColor::PendingRemoval => None,
        }
    }

    pub fn is_pending_removal(&self) -> bool {
        self.color == CellColor::PendingRemoval
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Order of the pieces on each back rank, file A to H.
pub(crate) const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    cells: [Cell; 64],
}

impl BoardState {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [Cell::EMPTY; 64],
        }
    }

    /// The standard starting arrangement.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in [PieceColor::White, PieceColor::Black] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                if let Some(square) = Square::new(file as u8, color.back_rank()) {
                    board.place(square, color, *kind);
                }
                if let Some(square) = Square::new(file as u8, color.pawn_rank()) {
                    board.place(square, color, PieceKind::Pawn);
                }
            }
        }
        board
    }

    /// Read the cell bound to `square`. The off-board sentinel reads as empty.
    pub fn cell_at(&self, square: Square) -> Cell {
        if square.is_off_board() {
            return Cell::EMPTY;
        }
        self.cells[square.index()]
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.cell_at(square).occupied
    }

    /// Color of the settled piece on `square`, if any.
    pub fn color_at(&self, square: Square) -> Option<PieceColor> {
        self.cell_at(square).piece_color()
    }

    /// Whether every square strictly between `from` and `to` is empty.
    pub fn path_is_clear(&self, from: Square, to: Square) -> bool {
        from.between(to).into_iter().all(|s| !self.is_occupied(s))
    }

    /// Occupied squares with their cells, A1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.occupied)
            .map(|(i, cell)| (Square::from_index(i), *cell))
    }

    pub(crate) fn set_occupied(&mut self, square: Square, occupied: bool) {
        self.cells[square.index()].occupied = occupied;
    }

    pub(crate) fn set_color(&mut self, square: Square, color: CellColor) {
        self.cells[square.index()].color = color;
    }

    pub(crate) fn set_kind(&mut self, square: Square, kind: Option<PieceKind>) {
        self.cells[square.index()].kind = kind;
    }

    pub(crate) fn place(&mut self, square: Square, color: PieceColor, kind: PieceKind) {
        self.set_occupied(square, true);
        self.set_color(square, color.into());
        self.set_kind(square, Some(kind));
    }

    pub(crate) fn clear(&mut self, square: Square) {
        self.set_occupied(square, false);
        self.set_color(square, CellColor::Empty);
        self.set_kind(square, None);
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::sq;

    #[test]
    fn test_standard_layout() {
        let board = BoardState::standard();
        assert_eq!(
            board.cell_at(sq("E1")),
            Cell::with_piece(PieceColor::White, PieceKind::King)
        );
        assert_eq!(
            board.cell_at(sq("D8")),
            Cell::with_piece(PieceColor::Black, PieceKind::Queen)
        );
        assert_eq!(
            board.cell_at(sq("G7")),
            Cell::with_piece(PieceColor::Black, PieceKind::Pawn)
        );
        assert_eq!(board.cell_at(sq("E4")), Cell::EMPTY);
        assert_eq!(board.occupied().count(), 32);
    }

    #[test]
    fn test_off_board_reads_empty() {
        let board = BoardState::standard();
        assert_eq!(board.cell_at(Square::OFF_BOARD), Cell::EMPTY);
    }

    #[test]
    fn test_pending_removal_has_no_piece_color() {
        let mut board = BoardState::standard();
        board.set_color(sq("D7"), CellColor::PendingRemoval);
        let cell = board.cell_at(sq("D7"));
        assert!(cell.is_pending_removal());
        assert!(cell.occupied);
        assert_eq!(cell.piece_color(), None);
        assert_eq!(cell.kind, Some(PieceKind::Pawn));
    }

    #[test]
    fn test_path_is_clear() {
        let board = BoardState::standard();
        assert!(!board.path_is_clear(sq("A1"), sq("A8")));
        assert!(board.path_is_clear(sq("A2"), sq("A7")));
        assert!(board.path_is_clear(sq("B1"), sq("C3")));
    }
}
