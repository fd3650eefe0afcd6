//! Text renderings of the board: FEN-style placement strings and an ASCII
//! grid for the operator console.

use crate::board::BoardState;
use crate::square::Square;
use crate::types::{PieceColor, PieceKind};

/// An 8x8 snapshot of piece placement, detached from the rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBoard {
    squares: [[Option<(PieceKind, PieceColor)>; 8]; 8],
}

impl DisplayBoard {
    pub fn from_board(board: &BoardState) -> Self {
        let mut squares = [[None; 8]; 8];
        for (square, cell) in board.occupied() {
            if let (Some(kind), Some(color)) = (cell.kind, cell.piece_color()) {
                squares[square.rank() as usize][square.file() as usize] = Some((kind, color));
            }
        }
        Self { squares }
    }

    /// Parse the placement field of a FEN string. Any fields after the
    /// first are ignored.
    pub fn from_placement(fen: &str) -> Result<Self, DisplayBoardError> {
        let placement = fen
            .split_whitespace()
            .next()
            .ok_or(DisplayBoardError::InvalidPlacement)?;

        let mut squares = [[None; 8]; 8];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(DisplayBoardError::InvalidPlacement);
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if file > 7 {
                    return Err(DisplayBoardError::InvalidPlacement);
                }
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let color = if c.is_uppercase() {
                        PieceColor::White
                    } else {
                        PieceColor::Black
                    };
                    let kind =
                        PieceKind::from_char(c).ok_or(DisplayBoardError::InvalidPiece(c))?;
                    squares[rank][file] = Some((kind, color));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(DisplayBoardError::InvalidPlacement);
            }
        }

        Ok(DisplayBoard { squares })
    }

    pub fn piece_at(&self, file: u8, rank: u8) -> Option<(PieceKind, PieceColor)> {
        if file > 7 || rank > 7 {
            return None;
        }
        self.squares[rank as usize][file as usize]
    }

    /// Every piece with its square, A1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, PieceKind, PieceColor)> + '_ {
        Square::all().filter_map(|square| {
            self.piece_at(square.file(), square.rank())
                .map(|(kind, color)| (square, kind, color))
        })
    }

    /// FEN placement field, rank 8 first.
    pub fn placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[rank][file] {
                    Some((kind, color)) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(letter(kind, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// ASCII grid with rank and file labels, rank 8 at the top.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            out.push_str(&format!("{} ", rank + 1));
            for file in 0..8 {
                let c = self.squares[rank][file]
                    .map(|(kind, color)| letter(kind, color))
                    .unwrap_or('.');
                out.push(' ');
                out.push(c);
            }
            out.push('\n');
        }
        out.push_str("   A B C D E F G H\n");
        out
    }
}

fn letter(kind: PieceKind, color: PieceColor) -> char {
    match color {
        PieceColor::White => kind.to_char_upper(),
        PieceColor::Black => kind.to_char_lower(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayBoardError {
    #[error("Invalid placement string")]
    InvalidPlacement,
    #[error("Invalid piece character: {0}")]
    InvalidPiece(char),
}
