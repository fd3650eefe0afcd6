//! Movement predicates, one per piece kind.
//!
//! A predicate looks at a single piece and a destination and decides whether
//! the move has a legal shape on the current board. It never mutates
//! anything; the manager that owns the piece decides what to do with the
//! answer.

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::roster::PieceRecord;
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// The two single-slot en passant memos, one per color.
///
/// A slot holds the landing square of that color's two-step pawn advance and
/// lives for exactly one ply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassantMemo {
    white: Option<Square>,
    black: Option<Square>,
}

impl EnPassantMemo {
    pub fn get(&self, color: PieceColor) -> Option<Square> {
        match color {
            PieceColor::White => self.white,
            PieceColor::Black => self.black,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none()
    }

    /// Remember a two-step advance by `color`, forgetting the opponent's.
    pub(crate) fn record(&mut self, color: PieceColor, landing: Square) {
        match color {
            PieceColor::White => {
                self.white = Some(landing);
                self.black = None;
            }
            PieceColor::Black => {
                self.black = Some(landing);
                self.white = None;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.white = None;
        self.black = None;
    }
}

/// How an accepted move relates to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Any non-pawn move, capturing or not.
    Plain,
    PawnStep,
    PawnDoubleStep,
    PawnCapture,
    /// Diagonal pawn move onto an empty square; the captured pawn stands on
    /// `captured`, one rank behind the destination.
    EnPassant { captured: Square },
}

/// Read-only view the predicates evaluate against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleContext<'a> {
    pub board: &'a BoardState,
    pub memo: &'a EnPassantMemo,
    pub color: PieceColor,
}

/// Evaluate `rule` for `piece` moving to `to`.
///
/// The caller has already rejected destinations held by the mover's own
/// color.
pub(crate) fn accepts(
    rule: PieceKind,
    piece: &PieceRecord,
    to: Square,
    ctx: &RuleContext<'_>,
) -> Option<Shape> {
    let from = piece.square;
    if from.is_off_board() || to.is_off_board() || from == to {
        return None;
    }
    match rule {
        PieceKind::Rook => rook(from, to, ctx.board).then_some(Shape::Plain),
        PieceKind::Bishop => bishop(from, to, ctx.board).then_some(Shape::Plain),
        PieceKind::Queen => {
            (rook(from, to, ctx.board) || bishop(from, to, ctx.board)).then_some(Shape::Plain)
        }
        PieceKind::Knight => knight(from, to).then_some(Shape::Plain),
        PieceKind::King => king(from, to).then_some(Shape::Plain),
        PieceKind::Pawn => pawn(piece, to, ctx),
    }
}

fn rook(from: Square, to: Square, board: &BoardState) -> bool {
    let (df, dr) = from.delta_to(to);
    (df == 0) != (dr == 0) && board.path_is_clear(from, to)
}

fn bishop(from: Square, to: Square, board: &BoardState) -> bool {
    let (df, dr) = from.delta_to(to);
    df != 0 && df.abs() == dr.abs() && board.path_is_clear(from, to)
}

fn knight(from: Square, to: Square) -> bool {
    let (df, dr) = from.delta_to(to);
    matches!((df.abs(), dr.abs()), (1, 2) | (2, 1))
}

// Shape only. Whether the destination is attacked is never checked.
fn king(from: Square, to: Square) -> bool {
    let (df, dr) = from.delta_to(to);
    df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0)
}

fn pawn(piece: &PieceRecord, to: Square, ctx: &RuleContext<'_>) -> Option<Shape> {
    let forward = ctx.color.forward();
    let (df, dr) = piece.square.delta_to(to);
    let target = ctx.board.cell_at(to);

    if df == 0 && dr == forward {
        return (!target.occupied).then_some(Shape::PawnStep);
    }

    if df == 0 && dr == 2 * forward {
        let middle = piece.square.offset(0, forward)?;
        let clear = piece.first_move && !ctx.board.is_occupied(middle) && !target.occupied;
        return clear.then_some(Shape::PawnDoubleStep);
    }

    if df.abs() == 1 && dr == forward {
        if target.occupied {
            let opposing = target.piece_color() == Some(ctx.color.opponent());
            return opposing.then_some(Shape::PawnCapture);
        }
        let behind = to.offset(0, -forward)?;
        let memo = ctx.memo.get(ctx.color.opponent())?;
        let victim = ctx.board.cell_at(behind);
        let passed = memo == behind
            && victim.kind == Some(PieceKind::Pawn)
            && victim.piece_color() == Some(ctx.color.opponent());
        return passed.then_some(Shape::EnPassant { captured: behind });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::sq;

    fn ctx<'a>(board: &'a BoardState, memo: &'a EnPassantMemo, color: PieceColor) -> RuleContext<'a> {
        RuleContext { board, memo, color }
    }

    #[test]
    fn test_rook_requires_single_axis_and_clear_path() {
        let mut board = BoardState::empty();
        let memo = EnPassantMemo::default();
        let rook = PieceRecord::new(sq("A1"));
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Rook, &rook, sq("A8"), &c), Some(Shape::Plain));
        assert_eq!(accepts(PieceKind::Rook, &rook, sq("H1"), &c), Some(Shape::Plain));
        assert_eq!(accepts(PieceKind::Rook, &rook, sq("B2"), &c), None);

        board.place(sq("A4"), PieceColor::Black, PieceKind::Pawn);
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Rook, &rook, sq("A8"), &c), None);
        assert_eq!(accepts(PieceKind::Rook, &rook, sq("A4"), &c), Some(Shape::Plain));
    }

    #[test]
    fn test_bishop_and_queen() {
        let board = BoardState::empty();
        let memo = EnPassantMemo::default();
        let c = ctx(&board, &memo, PieceColor::White);
        let piece = PieceRecord::new(sq("C1"));
        assert!(accepts(PieceKind::Bishop, &piece, sq("H6"), &c).is_some());
        assert!(accepts(PieceKind::Bishop, &piece, sq("C5"), &c).is_none());
        assert!(accepts(PieceKind::Queen, &piece, sq("C5"), &c).is_some());
        assert!(accepts(PieceKind::Queen, &piece, sq("H6"), &c).is_some());
        assert!(accepts(PieceKind::Queen, &piece, sq("D3"), &c).is_none());
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let board = BoardState::standard();
        let memo = EnPassantMemo::default();
        let c = ctx(&board, &memo, PieceColor::White);
        let knight = PieceRecord::new(sq("G1"));
        assert!(accepts(PieceKind::Knight, &knight, sq("F3"), &c).is_some());
        assert!(accepts(PieceKind::Knight, &knight, sq("H3"), &c).is_some());
        assert!(accepts(PieceKind::Knight, &knight, sq("G3"), &c).is_none());
    }

    #[test]
    fn test_king_single_step_only() {
        let board = BoardState::empty();
        let memo = EnPassantMemo::default();
        let c = ctx(&board, &memo, PieceColor::Black);
        let king = PieceRecord::new(sq("E8"));
        assert!(accepts(PieceKind::King, &king, sq("D7"), &c).is_some());
        assert!(accepts(PieceKind::King, &king, sq("E6"), &c).is_none());
        assert!(accepts(PieceKind::King, &king, sq("E8"), &c).is_none());
    }

    #[test]
    fn test_pawn_steps_follow_color_direction() {
        let board = BoardState::standard();
        let memo = EnPassantMemo::default();
        let white = ctx(&board, &memo, PieceColor::White);
        let black = ctx(&board, &memo, PieceColor::Black);
        let e2 = PieceRecord::pawn(sq("E2"));
        let d7 = PieceRecord::pawn(sq("D7"));
        assert_eq!(accepts(PieceKind::Pawn, &e2, sq("E3"), &white), Some(Shape::PawnStep));
        assert_eq!(
            accepts(PieceKind::Pawn, &e2, sq("E4"), &white),
            Some(Shape::PawnDoubleStep)
        );
        assert_eq!(accepts(PieceKind::Pawn, &e2, sq("E1"), &white), None);
        assert_eq!(
            accepts(PieceKind::Pawn, &d7, sq("D5"), &black),
            Some(Shape::PawnDoubleStep)
        );
        assert_eq!(accepts(PieceKind::Pawn, &d7, sq("D8"), &black), None);
    }

    #[test]
    fn test_pawn_double_step_needs_first_move_and_clear_squares() {
        let mut board = BoardState::empty();
        let memo = EnPassantMemo::default();
        let mut pawn = PieceRecord::pawn(sq("B2"));
        board.place(sq("B2"), PieceColor::White, PieceKind::Pawn);
        board.place(sq("B3"), PieceColor::Black, PieceKind::Knight);
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("B4"), &c), None);

        board.clear(sq("B3"));
        pawn.first_move = false;
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("B4"), &c), None);
    }

    #[test]
    fn test_pawn_diagonal_needs_opponent() {
        let mut board = BoardState::empty();
        let memo = EnPassantMemo::default();
        let pawn = PieceRecord::pawn(sq("E4"));
        board.place(sq("D5"), PieceColor::Black, PieceKind::Bishop);
        board.place(sq("F5"), PieceColor::White, PieceKind::Bishop);
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("D5"), &c), Some(Shape::PawnCapture));
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("F5"), &c), None);
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("E5"), &c), Some(Shape::PawnStep));
    }

    #[test]
    fn test_en_passant_uses_opponent_memo() {
        let mut board = BoardState::empty();
        board.place(sq("E5"), PieceColor::White, PieceKind::Pawn);
        board.place(sq("D5"), PieceColor::Black, PieceKind::Pawn);
        let pawn = PieceRecord::new(sq("E5"));

        let mut memo = EnPassantMemo::default();
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("D6"), &c), None);

        memo.record(PieceColor::Black, sq("D5"));
        let c = ctx(&board, &memo, PieceColor::White);
        assert_eq!(
            accepts(PieceKind::Pawn, &pawn, sq("D6"), &c),
            Some(Shape::EnPassant { captured: sq("D5") })
        );
        assert_eq!(accepts(PieceKind::Pawn, &pawn, sq("F6"), &c), None);
    }

    #[test]
    fn test_memo_record_clears_other_color() {
        let mut memo = EnPassantMemo::default();
        memo.record(PieceColor::White, sq("E4"));
        assert_eq!(memo.get(PieceColor::White), Some(sq("E4")));
        memo.record(PieceColor::Black, sq("D5"));
        assert_eq!(memo.get(PieceColor::White), None);
        assert_eq!(memo.get(PieceColor::Black), Some(sq("D5")));
        memo.clear();
        assert!(memo.is_empty());
    }
}
