use crate::agents::Difficulty;
use crate::boards::*;
use crate::pieces::*;

/// Material balance from `color`'s point of view: its pieces count for it,
/// the opponent's count against it.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    board
        .pieces()
        .map(|(_, piece)| {
            let value = piece.kind.material_value();
            if piece.color == color {
                value
            } else {
                -value
            }
        })
        .sum()
}

/// Score awarded to the winner of a decisive game. Beating a computer
/// opponent multiplies it by the opponent's level plus one.
pub fn final_score(board: &Board, winner: Color, computer: Option<Difficulty>) -> i32 {
    let base = evaluate(board, winner);
    match computer {
        Some(level) => base * (level.level() as i32 + 1),
        None => base,
    }
}
