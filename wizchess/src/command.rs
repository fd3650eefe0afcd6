//! Text commands to structured requests.
//!
//! Grammar: `<piece> [<promotion>] [<prep>] [<source> <prep>] <destination>`,
//! or `status` / `check`. Words are case-insensitive; English and Italian
//! piece names are accepted along with single letters. Prepositions are
//! filler and may appear anywhere after the piece.

use chess::{MoveRequest, ParseSquareError, PieceKind, Request, Square};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown piece '{0}'")]
    UnknownPiece(String),
    #[error("only a pawn can carry a promotion, not a {0}")]
    PromotionOnNonPawn(PieceKind),
    #[error("expected a destination and at most one source square, got {0} squares")]
    SquareCount(usize),
    #[error("invalid square: {0}")]
    Square(#[from] ParseSquareError),
}

const PREPOSITIONS: [&str; 5] = ["to", "from", "da", "a", "in"];

fn piece_word(word: &str) -> Option<PieceKind> {
    let kind = match word {
        "pawn" | "pedina" | "p" => PieceKind::Pawn,
        "rook" | "torre" | "r" => PieceKind::Rook,
        "knight" | "cavallo" | "n" | "h" => PieceKind::Knight,
        "bishop" | "alfiere" | "b" => PieceKind::Bishop,
        "queen" | "regina" | "q" => PieceKind::Queen,
        "king" | "re" | "k" => PieceKind::King,
        _ => return None,
    };
    Some(kind)
}

/// Parse one operator command.
pub fn parse(line: &str) -> Result<Request, ParseError> {
    let lowered = line.to_lowercase();
    let mut words = lowered
        .split_whitespace()
        .filter(|w| !PREPOSITIONS.contains(w))
        .peekable();

    let first = words.next().ok_or(ParseError::Empty)?;
    if matches!(first, "status" | "check") && words.peek().is_none() {
        return Ok(Request::Status);
    }
    let piece = piece_word(first).ok_or_else(|| ParseError::UnknownPiece(first.to_string()))?;

    let promotion = match words.peek().and_then(|w| piece_word(w)) {
        Some(kind) => {
            words.next();
            if piece != PieceKind::Pawn {
                return Err(ParseError::PromotionOnNonPawn(piece));
            }
            Some(kind)
        }
        None => None,
    };

    let squares = words.map(str::parse).collect::<Result<Vec<Square>, _>>()?;
    let request = match squares.as_slice() {
        [destination] => MoveRequest::new(piece, *destination),
        [source, destination] => MoveRequest::new(piece, *destination).from_square(*source),
        other => return Err(ParseError::SquareCount(other.len())),
    };
    Ok(Request::Move(match promotion {
        Some(kind) => request.promoted(kind),
        None => request,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn parsed(line: &str) -> MoveRequest {
        match parse(line) {
            Ok(Request::Move(request)) => request,
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_destination_only() {
        assert_eq!(parsed("pawn to e4"), MoveRequest::new(PieceKind::Pawn, sq("E4")));
        assert_eq!(parsed("PAWN E4"), MoveRequest::new(PieceKind::Pawn, sq("E4")));
        assert_eq!(parsed("N f3"), MoveRequest::new(PieceKind::Knight, sq("F3")));
    }

    #[test]
    fn test_source_and_destination() {
        assert_eq!(
            parsed("rook from h1 to d1"),
            MoveRequest::new(PieceKind::Rook, sq("D1")).from_square(sq("H1"))
        );
        assert_eq!(
            parsed("torre da h1 a d1"),
            MoveRequest::new(PieceKind::Rook, sq("D1")).from_square(sq("H1"))
        );
    }

    #[test]
    fn test_italian_words() {
        assert_eq!(parsed("cavallo in c3").piece, PieceKind::Knight);
        assert_eq!(parsed("alfiere c4").piece, PieceKind::Bishop);
        assert_eq!(parsed("regina d4").piece, PieceKind::Queen);
        assert_eq!(parsed("re e2").piece, PieceKind::King);
        assert_eq!(parsed("H c3").piece, PieceKind::Knight);
    }

    #[test]
    fn test_promotion() {
        assert_eq!(
            parsed("pawn queen to a8"),
            MoveRequest::new(PieceKind::Pawn, sq("A8")).promoted(PieceKind::Queen)
        );
        assert_eq!(
            parsed("pedina regina da a8 a a2"),
            MoveRequest::new(PieceKind::Pawn, sq("A2"))
                .from_square(sq("A8"))
                .promoted(PieceKind::Queen)
        );
        assert_eq!(
            parse("rook queen a4"),
            Err(ParseError::PromotionOnNonPawn(PieceKind::Rook))
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(parse("status"), Ok(Request::Status));
        assert_eq!(parse("  CHECK "), Ok(Request::Status));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("to"), Err(ParseError::Empty));
        assert_eq!(
            parse("dragon e4"),
            Err(ParseError::UnknownPiece("dragon".into()))
        );
        assert_eq!(parse("pawn"), Err(ParseError::SquareCount(0)));
        assert_eq!(parse("rook a1 a4 a8"), Err(ParseError::SquareCount(3)));
        assert!(matches!(parse("pawn e9"), Err(ParseError::Square(_))));
        assert!(matches!(parse("pawn to e44"), Err(ParseError::Square(_))));
    }
}
