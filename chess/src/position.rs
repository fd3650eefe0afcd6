//! Everything the resolver mutates when it commits a move: board, rosters,
//! en passant memos and the turn flag.
//!
//! The resolver stages a move on a clone of the current `Position` and swaps
//! it in only after the actuator succeeds, so outside observers never see a
//! half-applied move.

use crate::board::BoardState;
use crate::board_display::DisplayBoard;
use crate::error::SetupError;
use crate::manager::Managers;
use crate::rules::{EnPassantMemo, RuleContext};
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: BoardState,
    managers: Managers,
    memo: EnPassantMemo,
    turn: PieceColor,
}

impl Position {
    /// Standard starting position, White to move.
    pub fn standard() -> Self {
        Self {
            board: BoardState::standard(),
            managers: Managers::standard(),
            memo: EnPassantMemo::default(),
            turn: PieceColor::White,
        }
    }

    /// No pieces on the board, White to move.
    pub fn empty() -> Self {
        Self {
            board: BoardState::empty(),
            managers: Managers::empty(),
            memo: EnPassantMemo::default(),
            turn: PieceColor::White,
        }
    }

    /// Build a position from a FEN placement field. Pawns standing on their
    /// starting rank keep their two-step advance.
    pub fn from_placement(placement: &str, turn: PieceColor) -> Result<Self, SetupError> {
        let display = DisplayBoard::from_placement(placement)?;
        let mut position = Self::empty();
        for (square, kind, color) in display.pieces() {
            position.place(color, kind, square)?;
        }
        position.turn = turn;
        Ok(position)
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn managers(&self) -> &Managers {
        &self.managers
    }

    pub fn en_passant(&self) -> &EnPassantMemo {
        &self.memo
    }

    pub fn turn(&self) -> PieceColor {
        self.turn
    }

    pub fn set_turn(&mut self, turn: PieceColor) {
        self.turn = turn;
    }

    /// Put a piece on an empty square, taking a spare record from its roster.
    pub fn place(
        &mut self,
        color: PieceColor,
        kind: PieceKind,
        square: Square,
    ) -> Result<(), SetupError> {
        self.check_free(square)?;
        self.managers.get_mut(kind).place(color, square, None)?;
        self.board.place(square, color, kind);
        Ok(())
    }

    /// Put a pawn already promoted to `kind` on `square`.
    pub fn place_promoted_pawn(
        &mut self,
        color: PieceColor,
        kind: PieceKind,
        square: Square,
    ) -> Result<(), SetupError> {
        if !kind.is_promotion_target() {
            return Err(SetupError::InvalidPromotion(kind));
        }
        self.check_free(square)?;
        self.managers
            .get_mut(PieceKind::Pawn)
            .place(color, square, Some(kind))?;
        self.board.place(square, color, kind);
        Ok(())
    }

    /// Builder form of [`Position::place`].
    pub fn with_piece(
        mut self,
        color: PieceColor,
        kind: PieceKind,
        square: Square,
    ) -> Result<Self, SetupError> {
        self.place(color, kind, square)?;
        Ok(self)
    }

    fn check_free(&self, square: Square) -> Result<(), SetupError> {
        if square.is_off_board() {
            return Err(SetupError::OffBoard(square));
        }
        if self.board.is_occupied(square) {
            return Err(SetupError::Occupied(square));
        }
        Ok(())
    }

    pub(crate) fn context(&self) -> RuleContext<'_> {
        RuleContext {
            board: &self.board,
            memo: &self.memo,
            color: self.turn,
        }
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&mut BoardState, &mut Managers, &mut EnPassantMemo, &mut PieceColor) {
        (
            &mut self.board,
            &mut self.managers,
            &mut self.memo,
            &mut self.turn,
        )
    }

    /// Check that the live roster entries and the occupied cells describe the
    /// same set of pieces.
    pub fn verify(&self) -> Result<(), Inconsistency> {
        let mut seen: [Option<(PieceColor, PieceKind)>; 64] = [None; 64];
        for (color, kind, square) in self.managers.live_pieces() {
            if square.is_off_board() {
                return Err(Inconsistency::LiveOffBoard { color, kind });
            }
            let slot = &mut seen[square.index()];
            if slot.is_some() {
                return Err(Inconsistency::Duplicate(square));
            }
            *slot = Some((color, kind));
        }
        for square in Square::all() {
            let cell = self.board.cell_at(square);
            if cell.is_pending_removal() {
                return Err(Inconsistency::PendingRemoval(square));
            }
            let on_board = match (cell.occupied, cell.piece_color(), cell.kind) {
                (true, Some(color), Some(kind)) => Some((color, kind)),
                (false, None, None) => None,
                _ => return Err(Inconsistency::MalformedCell(square)),
            };
            if on_board != seen[square.index()] {
                return Err(Inconsistency::Mismatch {
                    square,
                    cell: on_board,
                    roster: seen[square.index()],
                });
            }
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

/// A divergence between the rosters and the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    #[error("live {color} {kind} has no square")]
    LiveOffBoard { color: PieceColor, kind: PieceKind },
    #[error("two live pieces on {0}")]
    Duplicate(Square),
    #[error("removal marker left on {0}")]
    PendingRemoval(Square),
    #[error("cell {0} is half filled")]
    MalformedCell(Square),
    #[error("{square}: cell holds {cell:?}, rosters hold {roster:?}")]
    Mismatch {
        square: Square,
        cell: Option<(PieceColor, PieceKind)>,
        roster: Option<(PieceColor, PieceKind)>,
    },
}
