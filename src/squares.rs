use crate::chess_errors::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops;
use std::str::FromStr;

// Chessboard squares on a 8x8 board, indexed by (rank, file).
// Rank 0 is Black's back rank, rank 7 is White's.
//
//     a  b  c  d  e  f  g  h      <- file 0..7
//   ---------------------------
// 8 | 0  1  2  3  4  5  6  7  | 8   <- rank 0
// 7 | 8  9  10 11 12 13 14 15 | 7
// 6 | 16 17 18 19 20 21 22 23 | 6
// 5 | 24 25 26 27 28 29 30 31 | 5
// 4 | 32 33 34 35 36 37 38 39 | 4
// 3 | 40 41 42 43 44 45 46 47 | 3
// 2 | 48 49 50 51 52 53 54 55 | 2
// 1 | 56 57 58 59 60 61 62 63 | 1   <- rank 7
//   ---------------------------
//    a  b  c  d  e  f  g  h
//
// ---------------------------------------------
// Squares
// ---------------------------------------------

pub const BOARD_SIZE: u8 = 8;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Square(u8);

/// A (rank, file) step between two squares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Offset {
    pub ranks: i8,
    pub files: i8,
}

impl Offset {
    pub const fn new(ranks: i8, files: i8) -> Offset {
        Offset { ranks, files }
    }
}

impl Square {
    /// Checked constructor for untrusted coordinates.
    pub fn new(rank: i32, file: i32) -> Option<Square> {
        if Square::in_board(rank, file) {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Rank and file must be in 0..8.
    pub const fn from_rank_file(rank: u8, file: u8) -> Square {
        debug_assert!(rank < BOARD_SIZE && file < BOARD_SIZE);
        Square(rank * BOARD_SIZE + file)
    }

    pub const fn in_board(rank: i32, file: i32) -> bool {
        rank >= 0 && file >= 0 && rank < BOARD_SIZE as i32 && file < BOARD_SIZE as i32
    }

    pub const fn rank(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    pub const fn file(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Step between two squares.
    pub fn offset_to(self, other: Square) -> Offset {
        Offset::new(
            other.rank() as i8 - self.rank() as i8,
            other.file() as i8 - self.file() as i8,
        )
    }

    /// Allows to iterate over all squares of the board, rank 0 first.
    pub fn all() -> SquareIterator {
        SquareIterator(0)
    }
}

pub struct SquareIterator(u8);

impl Iterator for SquareIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 > 63 {
            None
        } else {
            self.0 += 1;
            Some(Square(self.0 - 1))
        }
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ChessError::InvalidSquare(s.to_string());
        let mut chars = s.trim().chars();

        let file = chars.next().ok_or_else(err)?;
        let row = chars.next().and_then(|r| r.to_digit(10)).ok_or_else(err)?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&row) {
            return Err(err());
        }

        Ok(Square::from_rank_file(8 - row as u8, file as u8 - b'a'))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, 8 - self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self, self.rank(), self.file())
    }
}

impl_op_ex!(+ |a: &Square, b: &Offset| -> Option<Square> {
    Square::new(
        a.rank() as i32 + b.ranks as i32,
        a.file() as i32 + b.files as i32,
    )
});
