use crate::pieces::Color;
use thiserror::Error;

// ---------------------------------------------
// Error Handling
// ---------------------------------------------

/// Failures while parsing input or building/resuming a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid chess square `{0}`")]
    InvalidSquare(String),

    #[error("invalid piece placement `{0}`")]
    InvalidPlacement(String),

    #[error("invalid promotion piece `{0}` (expected one of N, B, R, Q)")]
    InvalidPromotion(String),

    #[error("invalid difficulty level {0} (expected 0 to 3)")]
    InvalidDifficulty(u8),

    #[error("board has no {0} king")]
    MissingKing(Color),

    #[error("saved game was played with a different computer opponent setup")]
    OpponentMismatch,

    #[error("saved game is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("move `{0}` rejected: {1}")]
    RejectedMove(String, Rejection),
}

pub type ChessResult<T> = std::result::Result<T, ChessError>;

/// Why a submitted move was not committed. None of these are fatal; the game
/// state is exactly as it was before the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the game has ended")]
    GameEnded,

    #[error("it is not your turn")]
    WrongTurn,

    #[error("the coordinates are out of bounds")]
    OutOfBounds,

    #[error("please move a piece")]
    SameSquare,

    #[error("there is no piece on the original square")]
    EmptyOrigin,

    #[error("the destination square is occupied by an ally piece")]
    OwnPieceAtDestination,

    #[error("illegal move")]
    IllegalPieceMove,

    #[error("the king is in check")]
    LeavesKingInCheck,

    #[error("a pawn can only be promoted to a knight, bishop, rook or queen")]
    InvalidPromotion,
}
