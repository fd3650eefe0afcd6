//! Canonical piece and color types for the controller.

use serde::{Deserialize, Serialize};

/// Kind of a chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Side owning a piece, also used as the turn flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// Kinds a pawn may be promoted to.
    pub const PROMOTIONS: [PieceKind; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];

    pub fn to_char_upper(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub fn to_char_lower(self) -> char {
        self.to_char_upper().to_ascii_lowercase()
    }

    /// Parse a single piece letter. `H` (horse) is accepted for the knight,
    /// matching the labels printed on the physical board.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Self::Pawn),
            'n' | 'h' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'r' => Some(Self::Rook),
            'q' => Some(Self::Queen),
            'k' => Some(Self::King),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Number of pieces of this kind each side starts with.
    pub fn roster_size(self) -> usize {
        match self {
            Self::Pawn => 8,
            Self::Knight | Self::Bishop | Self::Rook => 2,
            Self::Queen | Self::King => 1,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Pawn => 0,
            Self::Knight => 1,
            Self::Bishop => 2,
            Self::Rook => 3,
            Self::Queen => 4,
            Self::King => 5,
        }
    }
}

impl PieceColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a single pawn step.
    pub fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Rank index pawns of this color start on.
    pub fn pawn_rank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// Rank index of the back row, where pieces start and pawns promote
    /// for the opponent.
    pub fn back_rank(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Rank index on which pawns of this color promote.
    pub fn promotion_rank(self) -> u8 {
        self.opponent().back_rank()
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for PieceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_accepts_horse_for_knight() {
        assert_eq!(PieceKind::from_char('H'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_char('n'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_promotion_ranks() {
        assert_eq!(PieceColor::White.promotion_rank(), 7);
        assert_eq!(PieceColor::Black.promotion_rank(), 0);
    }

    #[test]
    fn test_roster_sizes_sum_to_sixteen() {
        let total: usize = PieceKind::ALL.iter().map(|k| k.roster_size()).sum();
        assert_eq!(total, 16);
    }
}
