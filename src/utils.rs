use crate::chess_errors::*;
use crate::game_state::GameState;
use crate::moves::*;

// Parses a square in algebraic notation, panicking on bad input.
// Meant for tests and hard-coded positions.
#[macro_export]
macro_rules! sq {
    ($s:expr) => {
        $s.parse::<$crate::squares::Square>()
            .expect("invalid square literal")
    };
}

// For testing purposes: Easily creates a list of squares.
#[macro_export]
macro_rules! squares {
    ( $( $x:expr ),* $(,)? ) => {
        {
            #[allow(unused_mut)]
            let mut v: Vec<$crate::squares::Square> = Vec::new();
            $(
                v.push($crate::sq!($x));
            )*
            v
        }
    };
}

/// Plays a sequence of moves in coordinate notation (`e2e4`, `a7a8q`),
/// stopping at the first one that is malformed or rejected.
pub fn replay(state: &mut GameState, moves: &[&str]) -> ChessResult<Vec<MoveRecord>> {
    let mut records = Vec::with_capacity(moves.len());
    for text in moves {
        let text = text.trim();
        let (coords, promotion) = if text.len() == 5 && text.is_ascii() {
            (&text[..4], Some(text[4..].parse()?))
        } else {
            (text, None)
        };
        let mv: Move = coords.parse()?;
        let record = state
            .validate_move(mv)
            .and_then(|plan| state.commit(plan, promotion))
            .map_err(|rejection| ChessError::RejectedMove(text.to_string(), rejection))?;
        records.push(record);
    }
    Ok(records)
}

// Functions relevant for tests
#[cfg(test)]
pub fn play(state: &mut GameState, moves: &[&str]) {
    if let Err(e) = replay(state, moves) {
        panic!("{}\n{:?}", e, state);
    }
}
