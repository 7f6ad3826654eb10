use crate::chess_errors::*;
use crate::pieces::*;
use crate::squares::*;
use array_init::array_init;
use lazy_static::lazy_static;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops;

// ---------------------------------------------
// Board Types
// ---------------------------------------------

pub const STANDARD_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

lazy_static! {
    static ref STANDARD_BOARD: Board = standard_board();
}

fn standard_board() -> Board {
    let mut board = Board::empty();
    let back_rank = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    for color in [Color::White, Color::Black] {
        for (file, kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.set(
                Square::from_rank_file(color.home_rank(), file),
                Some(Piece::new(color, *kind)),
            );
            board.set(
                Square::from_rank_file(color.pawn_rank(), file),
                Some(Piece::new(color, PieceKind::Pawn)),
            );
        }
    }
    board
}

// Displays the first 64 items from an iterator in a chessboard style:
//
//   a  b  c  d  e  f  g
// 8 i1 i2 i3 ...        8
// 7 ....
//
// Where i1,...i64 are the items of the iterator.
// Ends early with an error if the iterator runs dry.
fn display_chessboard_style<I, C>(it: &mut I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: Iterator<Item = C>,
    C: Display,
{
    write!(f, " ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    for row in 0..BOARD_SIZE {
        write!(f, "\n{} ", 8 - row)?;
        for _col in 0..BOARD_SIZE {
            let i = it.next().ok_or(fmt::Error)?;
            write!(f, "{} ", i)?;
        }
        write!(f, "{} ", 8 - row)?;
    }
    write!(f, "\n ")?;
    for c in 'a'..'i' {
        write!(f, " {}", c)?;
    }
    Ok(())
}

/// An 8x8 mailbox of optional pieces.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            cells: array_init(|_| None),
        }
    }

    /// The standard chess starting position.
    pub fn standard() -> Board {
        STANDARD_BOARD.clone()
    }

    /// Builds a board from the piece-placement field of a FEN string,
    /// starting at rank 8 (index 0), e.g. `4k3/8/8/8/8/8/8/4K3`.
    pub fn from_placement(placement: &str) -> ChessResult<Board> {
        let err = || ChessError::InvalidPlacement(placement.to_string());
        let rows: Vec<&str> = placement.trim().split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(err());
        }

        let mut board = Board::empty();
        for (rank, row) in rows.iter().enumerate() {
            let mut file: u8 = 0;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_placement_char(c).ok_or_else(err)?;
                    if file >= BOARD_SIZE {
                        return Err(err());
                    }
                    board.set(Square::from_rank_file(rank as u8, file), Some(piece));
                    file += 1;
                }
                if file > BOARD_SIZE {
                    return Err(err());
                }
            }
            if file != BOARD_SIZE {
                return Err(err());
            }
        }
        Ok(board)
    }

    /// Inverse of `from_placement`.
    pub fn placement(&self) -> String {
        let mut res = String::new();
        for rank in 0..BOARD_SIZE {
            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                match self[Square::from_rank_file(rank, file)] {
                    Some(piece) => {
                        if empty > 0 {
                            res.push_str(&empty.to_string());
                            empty = 0;
                        }
                        res.push(piece.placement_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                res.push_str(&empty.to_string());
            }
            if rank + 1 < BOARD_SIZE {
                res.push('/');
            }
        }
        res
    }

    pub fn from_cells(cells: [Option<Piece>; 64]) -> Board {
        Board { cells }
    }

    pub fn cells(&self) -> &[Option<Piece>; 64] {
        &self.cells
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    /// Removes and returns whatever stands on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    /// Whether `sq` holds a piece of the given color.
    pub fn holds(&self, sq: Square, color: Color) -> bool {
        matches!(self.get(sq), Some(p) if p.color == color)
    }

    /// All occupied squares with their pieces, rank 0 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| *p == Piece::new(color, PieceKind::King))
            .map(|(sq, _)| sq)
    }
}

impl ops::Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.cells[index.index()]
    }
}

struct Cell(Option<Piece>);

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{}", p),
            None => write!(f, "\u{00b7}"),
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_chessboard_style(&mut self.cells.iter().map(|c| Cell(*c)), f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.placement())
    }
}

// ---------------------------------------------
// King Locations
// ---------------------------------------------

/// Where each king stands. Kept in lock-step with the board by every apply/undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct KingLocations {
    pub white: Square,
    pub black: Square,
}

impl KingLocations {
    pub fn locate(board: &Board) -> ChessResult<KingLocations> {
        Ok(KingLocations {
            white: board
                .find_king(Color::White)
                .ok_or(ChessError::MissingKing(Color::White))?,
            black: board
                .find_king(Color::Black)
                .ok_or(ChessError::MissingKing(Color::Black))?,
        })
    }

    pub fn get(&self, color: Color) -> Square {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn set(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white = sq,
            Color::Black => self.black = sq,
        }
    }
}
