use serde::{Deserialize, Serialize};

use crate::board_display::DisplayBoard;
use crate::position::Position;
use crate::resolver::Phase;
use crate::roster::PieceRecord;
use crate::rules::EnPassantMemo;
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// A piece taken off the board by a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedPiece {
    pub kind: PieceKind,
    pub square: Square,
}

/// A single committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// One-based half-move number.
    pub ply: usize,
    pub color: PieceColor,
    /// Kind the piece moved as; a promoted pawn reports its promoted kind.
    pub kind: PieceKind,
    pub from: Square,
    pub to: Square,
    pub captured: Option<CapturedPiece>,
    pub promotion: Option<PieceKind>,
    pub en_passant: bool,
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}. {} {} {}-{}",
            self.ply, self.color, self.kind, self.from, self.to
        )?;
        if let Some(captured) = self.captured {
            write!(f, " x{} on {}", captured.kind, captured.square)?;
        }
        if self.en_passant {
            write!(f, " e.p.")?;
        }
        if let Some(promotion) = self.promotion {
            write!(f, " ={}", promotion.to_char_upper())?;
        }
        Ok(())
    }
}

/// One color's roster of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub kind: PieceKind,
    pub color: PieceColor,
    pub pieces: Vec<PieceRecord>,
}

/// Read-only dump of the controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub turn: PieceColor,
    pub phase: Phase,
    pub placement: String,
    pub en_passant: EnPassantMemo,
    pub rosters: Vec<RosterSnapshot>,
    pub history: Vec<MoveRecord>,
}

impl StatusSnapshot {
    pub(crate) fn capture(position: &Position, phase: Phase, history: &[MoveRecord]) -> Self {
        let rosters = position
            .managers()
            .iter()
            .flat_map(|manager| {
                [PieceColor::White, PieceColor::Black]
                    .into_iter()
                    .map(move |color| RosterSnapshot {
                        kind: manager.kind(),
                        color,
                        pieces: manager.roster(color).to_vec(),
                    })
            })
            .collect();
        Self {
            turn: position.turn(),
            phase,
            placement: DisplayBoard::from_board(position.board()).placement(),
            en_passant: *position.en_passant(),
            rosters,
            history: history.to_vec(),
        }
    }

    /// Operator-facing text dump: grid, turn, memos and rosters.
    pub fn render(&self) -> String {
        let mut out = String::from("--- Game State ---\n");
        if let Ok(board) = DisplayBoard::from_placement(&self.placement) {
            out.push_str(&board.render());
        }
        out.push_str(&format!("Turn: {}\n", self.turn));
        for color in [PieceColor::White, PieceColor::Black] {
            if let Some(square) = self.en_passant.get(color) {
                out.push_str(&format!("En passant ({color}): {square}\n"));
            }
        }
        for roster in &self.rosters {
            let squares: Vec<String> = roster
                .pieces
                .iter()
                .map(|p| match p.promoted_kind {
                    Some(kind) => format!("{}={}", p.square, kind.to_char_upper()),
                    None => p.square.to_string(),
                })
                .collect();
            out.push_str(&format!(
                "{} {}: {}\n",
                roster.color,
                roster.kind,
                squares.join(" ")
            ));
        }
        if let Some(last) = self.history.last() {
            out.push_str(&format!("Last move: {last}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::sq;

    #[test]
    fn test_snapshot_of_standard_position() {
        let snapshot = StatusSnapshot::capture(&Position::standard(), Phase::WaitingForMove, &[]);
        assert_eq!(snapshot.turn, PieceColor::White);
        assert_eq!(snapshot.rosters.len(), 12);
        assert_eq!(
            snapshot.placement,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        let text = snapshot.render();
        assert!(text.contains("Turn: white"));
        assert!(text.contains("white rook: A1 H1"));
        assert!(text.contains("black king: E8"));
    }

    #[test]
    fn test_move_record_display() {
        let record = MoveRecord {
            ply: 5,
            color: PieceColor::White,
            kind: PieceKind::Pawn,
            from: sq("E5"),
            to: sq("D6"),
            captured: Some(CapturedPiece {
                kind: PieceKind::Pawn,
                square: sq("D5"),
            }),
            promotion: None,
            en_passant: true,
        };
        assert_eq!(record.to_string(), "5. white pawn E5-D6 xpawn on D5 e.p.");
    }
}
