//! Board addressing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A board position as (file, rank), both zero based.
///
/// [`Square::OFF_BOARD`] is the parking spot for captured pieces. It never
/// indexes a cell and is rendered as `Z9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub const OFF_BOARD: Square = Square { file: 25, rank: 8 };

    /// Build an on-board square. Returns `None` outside the 8x8 grid.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn is_off_board(self) -> bool {
        self.file >= 8 || self.rank >= 8
    }

    /// Index into a 64-entry cell array (rank major).
    pub(crate) fn index(self) -> usize {
        debug_assert!(!self.is_off_board());
        self.rank as usize * 8 + self.file as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        }
    }

    /// Iterate over all 64 squares, A1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Self::from_index)
    }

    /// The square shifted by the given file and rank deltas, if on the board.
    pub fn offset(self, dfile: i8, drank: i8) -> Option<Square> {
        if self.is_off_board() {
            return None;
        }
        let file = self.file as i8 + dfile;
        let rank = self.rank as i8 + drank;
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }

    /// Signed (file, rank) difference `to - self`.
    pub fn delta_to(self, to: Square) -> (i8, i8) {
        (
            to.file as i8 - self.file as i8,
            to.rank as i8 - self.rank as i8,
        )
    }

    /// Squares strictly between `self` and `to` along a straight or diagonal
    /// line. Empty for adjacent squares or when the two squares do not share
    /// a line.
    pub fn between(self, to: Square) -> Vec<Square> {
        let (df, dr) = self.delta_to(to);
        let straight = df == 0 || dr == 0;
        let diagonal = df.abs() == dr.abs();
        if (df, dr) == (0, 0) || !(straight || diagonal) {
            return Vec::new();
        }
        let steps = df.abs().max(dr.abs());
        (1..steps)
            .filter_map(|i| self.offset(df.signum() * i, dr.signum() * i))
            .collect()
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_off_board() {
            return write!(f, "Z9");
        }
        write!(f, "{}{}", (b'A' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    /// Parse external notation: one file letter A-H (either case) followed by
    /// one rank digit 1-8.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseSquareError::Length(s.to_string()));
        }
        let file = bytes[0].to_ascii_uppercase();
        if !(b'A'..=b'H').contains(&file) {
            return Err(ParseSquareError::File(bytes[0] as char));
        }
        let rank = bytes[1];
        if !(b'1'..=b'8').contains(&rank) {
            return Err(ParseSquareError::Rank(bytes[1] as char));
        }
        Ok(Square {
            file: file - b'A',
            rank: rank - b'1',
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSquareError {
    #[error("square must be two characters, got {0:?}")]
    Length(String),
    #[error("invalid file: {0}")]
    File(char),
    #[error("invalid rank: {0}")]
    Rank(char),
}

/// Shorthand for tests and fixed layouts. Panics on malformed input.
#[cfg(test)]
pub(crate) fn sq(s: &str) -> Square {
    s.parse().unwrap()
}
