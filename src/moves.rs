//! Describing the moves that can be done in a chessboard.
use crate::chess_errors::*;
use crate::pieces::*;
use crate::squares::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A move request: just an origin and a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// The same move played backwards.
    pub const fn reversed(self) -> Self {
        Move {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Parses coordinate notation such as `g2g4`.
impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.is_ascii() {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        Ok(Move::new(s[..2].parse()?, s[2..].parse()?))
    }
}

/// The second, non-destination side effect of a move, recorded so the move
/// can be reversed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Special {
    None,
    /// The pawn removed by an en passant capture and where it stood.
    EnPassant { pawn: Piece, square: Square },
    /// The rook relocated by castling.
    Castle { rook: Piece, from: Square, to: Square },
}

/// A move that passed its piece's legality rule, ready to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub mv: Move,
    pub piece: Piece,
    pub special: Special,
}

impl PlannedMove {
    /// Whether this move lands a pawn on the far rank.
    pub fn is_promotion(&self) -> bool {
        self.piece.is_pawn() && self.mv.to.rank() == self.piece.color.promotion_rank()
    }
}

/// One committed half-move, with everything needed to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct MoveRecord {
    pub mv: Move,
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub special: Special,
    pub promotion: Option<PieceKind>,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || matches!(self.special, Special::EnPassant { .. })
    }

    pub fn is_pawn_move(&self) -> bool {
        self.moved.is_pawn()
    }

    pub fn is_two_square_advance(&self) -> bool {
        let offset = self.mv.from.offset_to(self.mv.to);
        self.is_pawn_move() && offset.files == 0 && offset.ranks.abs() == 2
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.special, Special::Castle { .. })
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.algebraic().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_move() {
        let mv: Move = "g2g4".parse().unwrap();
        assert_eq!(mv, Move::new(sq("g2"), sq("g4")));
        assert_eq!(mv.to_string(), "g2g4");
        assert_eq!(mv.reversed(), Move::new(sq("g4"), sq("g2")));
        assert!("g2g9".parse::<Move>().is_err());
        assert!("g2".parse::<Move>().is_err());
    }

    #[test]
    fn test_record_classification() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let advance = MoveRecord {
            mv: Move::new(sq("e2"), sq("e4")),
            moved: pawn,
            captured: None,
            special: Special::None,
            promotion: None,
        };
        assert!(advance.is_two_square_advance());
        assert!(!advance.is_capture());

        let en_passant = MoveRecord {
            mv: Move::new(sq("e5"), sq("d6")),
            moved: pawn,
            captured: None,
            special: Special::EnPassant {
                pawn: Piece::new(Color::Black, PieceKind::Pawn),
                square: sq("d5"),
            },
            promotion: None,
        };
        assert!(en_passant.is_capture());
        assert!(!en_passant.is_two_square_advance());
    }

    #[test]
    fn test_promotion_display() {
        let record = MoveRecord {
            mv: Move::new(sq("a7"), sq("a8")),
            moved: Piece::new(Color::White, PieceKind::Pawn),
            captured: None,
            special: Special::None,
            promotion: Some(PieceKind::Queen),
        };
        assert_eq!(record.to_string(), "a7a8q");
    }
}
