//! Rules, referee and computer opponent for a game of chess.
//!
//! A [`GameState`] holds the board and the move history and is only ever
//! changed through apply/undo. [`Game`] wraps it into a session that
//! validates moves, detects the end of the game and can let the computer
//! play one or both sides.
#[macro_use]
extern crate impl_ops;

pub mod agents;
pub mod algorithms;
pub mod attacks;
pub mod boards;
pub mod chess_errors;
pub mod draws;
pub mod evaluation;
pub mod game;
pub mod game_state;
pub mod history;
pub mod moves;
pub mod persistence;
pub mod pieces;
pub mod rules;
pub mod squares;
pub mod utils;

pub use agents::{Agent, ComputerAgent, Difficulty};
pub use boards::{Board, KingLocations};
pub use chess_errors::{ChessError, ChessResult, Rejection};
pub use draws::DrawKind;
pub use game::{
    Decisions, FixedDecisions, Game, GameConfig, GameEvent, GameResult, Notifier,
    OpponentConfig, Outcome, Question,
};
pub use game_state::{Coordinates, GameState, Status, Trial};
pub use moves::{Move, MoveRecord};
pub use persistence::Snapshot;
pub use pieces::{Color, Piece, PieceKind};
pub use squares::Square;
