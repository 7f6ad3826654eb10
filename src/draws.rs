use crate::boards::*;
use crate::game_state::GameState;
use crate::pieces::*;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-moves without a pawn move or capture after which a draw may be claimed.
pub const FIFTY_MOVE_RULE: usize = 50;
/// Half-moves without a pawn move or capture after which the game is drawn.
pub const SEVENTY_FIVE_MOVE_RULE: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum DrawKind {
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
    SeventyFiveMoveRule,
    Agreement,
}

impl DrawKind {
    /// Claimable draws need the player to ask for them; the rest end the game.
    pub fn is_claimable(self) -> bool {
        matches!(
            self,
            DrawKind::ThreefoldRepetition | DrawKind::InsufficientMaterial | DrawKind::FiftyMoveRule
        )
    }
}

impl fmt::Display for DrawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrawKind::Stalemate => "stalemate",
            DrawKind::ThreefoldRepetition => "threefold repetition",
            DrawKind::InsufficientMaterial => "insufficient material",
            DrawKind::FiftyMoveRule => "the 50 move rule",
            DrawKind::SeventyFiveMoveRule => "the 75 move rule",
            DrawKind::Agreement => "agreement",
        };
        write!(f, "{}", s)
    }
}

/// Neither side can force mate: no pawns, rooks or queens anywhere, and each
/// side has fewer than two bishops, fewer than three knights and never a
/// bishop together with a knight.
pub fn insufficient_material(board: &Board) -> bool {
    [Color::White, Color::Black]
        .iter()
        .all(|color| cannot_force_mate(board, *color))
}

fn cannot_force_mate(board: &Board, color: Color) -> bool {
    let mut bishops = 0;
    let mut knights = 0;
    for (_, piece) in board.pieces_of(color) {
        match piece.kind {
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Bishop => bishops += 1,
            PieceKind::Knight => knights += 1,
            PieceKind::King => {}
        }
    }
    bishops < 2 && knights < 3 && !(bishops > 0 && knights > 0)
}

/// Every draw condition that currently holds, in the order they are checked:
/// stalemate, repetition, material, then the move-count rules.
pub fn draw_conditions(state: &mut GameState) -> Vec<DrawKind> {
    let mut found = Vec::new();
    if state.is_stalemate() {
        found.push(DrawKind::Stalemate);
    }
    if state.history().is_threefold_repetition() {
        found.push(DrawKind::ThreefoldRepetition);
    }
    if insufficient_material(state.board()) {
        found.push(DrawKind::InsufficientMaterial);
    }
    if state.history().quiet_for(FIFTY_MOVE_RULE) {
        found.push(DrawKind::FiftyMoveRule);
    }
    if state.history().quiet_for(SEVENTY_FIVE_MOVE_RULE) {
        found.push(DrawKind::SeventyFiveMoveRule);
    }
    found
}

/// A draw that ends the game without anyone claiming it.
pub fn forced_draw(conditions: &[DrawKind]) -> Option<DrawKind> {
    conditions.iter().copied().find(|kind| !kind.is_claimable())
}

pub fn claimable_draw(conditions: &[DrawKind]) -> Option<DrawKind> {
    conditions.iter().copied().find(|kind| kind.is_claimable())
}
