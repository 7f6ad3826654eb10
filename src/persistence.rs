use crate::agents::Difficulty;
use crate::boards::*;
use crate::chess_errors::*;
use crate::game::{GameResult, OpponentConfig};
use crate::game_state::GameState;
use crate::history::MoveHistory;
use crate::moves::MoveRecord;
use crate::pieces::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Everything needed to resume a game later. Storing it is left to the
/// caller; with the `serialize` feature it derives the serde traits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub kings: KingLocations,
    pub turn: u32,
    pub records: Vec<MoveRecord>,
    /// Rank 0 first, 64 entries.
    pub cells: Vec<Option<Piece>>,
    pub opponent: OpponentConfig,
    pub difficulty: Difficulty,
    pub result: Option<GameResult>,
}

impl Snapshot {
    pub fn capture(
        state: &GameState,
        opponent: OpponentConfig,
        difficulty: Difficulty,
        result: Option<GameResult>,
    ) -> Snapshot {
        Snapshot {
            kings: state.kings(),
            turn: state.turn(),
            records: state.history().records().to_vec(),
            cells: state.board().cells().to_vec(),
            opponent,
            difficulty,
            result,
        }
    }

    /// A saved game may only be resumed by a session with the same computer
    /// opponent setup.
    pub fn check_compatible(&self, opponent: &OpponentConfig) -> ChessResult<()> {
        if self.opponent == *opponent {
            Ok(())
        } else {
            Err(ChessError::OpponentMismatch)
        }
    }

    /// Rebuilds the game state, checking the board size, the turn counter and
    /// the king locations.
    pub fn restore(&self) -> ChessResult<GameState> {
        let cells = <[Option<Piece>; 64]>::try_from(self.cells.as_slice()).map_err(|_| {
            ChessError::CorruptSnapshot(format!("expected 64 cells, found {}", self.cells.len()))
        })?;
        if (self.turn as usize) < self.records.len() {
            return Err(ChessError::CorruptSnapshot(format!(
                "turn {} is behind {} recorded moves",
                self.turn,
                self.records.len()
            )));
        }
        GameState::from_parts(
            Board::from_cells(cells),
            self.kings,
            self.turn,
            MoveHistory::from_records(self.records.clone()),
        )
    }
}
