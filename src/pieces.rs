use crate::chess_errors::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

// ---------------------------------------------
// Pieces
// ---------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Color {
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Side to move for a given turn counter. Even turns belong to White.
    pub const fn to_move(turn: u32) -> Color {
        if turn % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Rank index of this side's back rank (rank 0 is Black's).
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Direction pawns of this color travel in rank indices.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The rank a pawn of this color promotes on.
    pub const fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl PieceKind {
    /// The pieces a pawn may become on the last rank.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    pub const fn material_value(self) -> i32 {
        match self {
            PieceKind::Pawn => 10,
            PieceKind::Knight => 30,
            PieceKind::Bishop => 30,
            PieceKind::Rook => 50,
            PieceKind::Queen => 90,
            PieceKind::King => 1000,
        }
    }

    pub const fn algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_algebraic(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

/// Parses a promotion choice (`N`, `B`, `R` or `Q`, any case).
impl FromStr for PieceKind {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(PieceKind::from_algebraic), chars.next()) {
            (Some(kind), None) if kind.is_promotion_choice() => Ok(kind),
            _ => Err(ChessError::InvalidPromotion(s.to_string())),
        }
    }
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    pub const fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
    }

    /// Letter used in placement strings: upper case for White, lower case for Black.
    pub fn placement_char(&self) -> char {
        let c = self.kind.algebraic();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_placement_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_algebraic(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, kind))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Color::*;
        use PieceKind::*;
        let symbol = match (self.color, self.kind) {
            (White, King) => '\u{2654}',
            (White, Queen) => '\u{2655}',
            (White, Rook) => '\u{2656}',
            (White, Bishop) => '\u{2657}',
            (White, Knight) => '\u{2658}',
            (White, Pawn) => '\u{2659}',
            (Black, King) => '\u{265a}',
            (Black, Queen) => '\u{265b}',
            (Black, Rook) => '\u{265c}',
            (Black, Bishop) => '\u{265d}',
            (Black, Knight) => '\u{265e}',
            (Black, Pawn) => '\u{265f}',
        };
        write!(f, "{}", symbol)
    }
}
