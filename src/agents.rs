//! Computer players of differing strength
use crate::algorithms::{MaterialSearch, TreeSearch};
use crate::chess_errors::*;
use crate::evaluation::evaluate;
use crate::game_state::GameState;
use crate::moves::Move;
use crate::pieces::PieceKind;
use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use tracing::debug;

pub const MINIMAX_DEPTH: u16 = 2;
pub const ALPHABETA_DEPTH: u16 = 3;

/// An agent is an object that can play chess by choosing moves appropriate to a
/// current game state.
pub trait Agent {
    /// A legal move for the side to move, or `None` if there is none.
    /// The state must be left exactly as it was found.
    fn choose_move(&mut self, state: &mut GameState) -> Option<Move>;

    /// What a pawn of this agent becomes on the last rank.
    fn choose_promotion(&mut self) -> PieceKind;
}

/// Strength of the computer opponent, from 0 (random) to 3 (alpha-beta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MAX: u8 = 3;

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(Difficulty::MAX)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ChessError;

    fn try_from(level: u8) -> ChessResult<Difficulty> {
        if level <= Difficulty::MAX {
            Ok(Difficulty(level))
        } else {
            Err(ChessError::InvalidDifficulty(level))
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uniformly random legal move.
pub fn random_move<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<Move> {
    state.legal_moves().choose(rng).copied()
}

/// The move that leaves the best material balance one ply ahead. Ties are
/// broken uniformly at random.
pub fn greedy_move<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<Move> {
    let player_color = state.side_to_move();
    let mut best_moves = Vec::new();
    let mut best_material_gain = i32::MIN;

    for mv in state.legal_moves() {
        let Some(trial) = state.trial(mv) else {
            continue;
        };
        let material_gain = evaluate(trial.board(), player_color);
        if material_gain > best_material_gain {
            best_material_gain = material_gain;
            best_moves.clear();
        }
        if material_gain == best_material_gain {
            best_moves.push(mv);
        }
    }
    best_moves.choose(rng).copied()
}

/// The built-in computer opponent. Owns its random source so runs can be
/// reproduced from a seed.
pub struct ComputerAgent<R: Rng> {
    difficulty: Difficulty,
    rng: R,
}

impl<R: Rng> ComputerAgent<R> {
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        ComputerAgent { difficulty, rng }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

impl<R: Rng> Agent for ComputerAgent<R> {
    fn choose_move(&mut self, state: &mut GameState) -> Option<Move> {
        let rng = &mut self.rng;
        let choice = match self.difficulty.level() {
            0 => random_move(state, rng),
            1 => greedy_move(state, rng),
            2 => MaterialSearch.minimax(state, MINIMAX_DEPTH, rng),
            _ => MaterialSearch.alphabeta(state, ALPHABETA_DEPTH, rng),
        };
        // Every move can look equally lost; play something anyway.
        let choice = choice.or_else(|| random_move(state, rng));
        debug!(level = self.difficulty.level(), choice = ?choice, "computer move");
        choice
    }

    fn choose_promotion(&mut self) -> PieceKind {
        *PieceKind::PROMOTIONS
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::Queen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Color;
    use crate::utils::play;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_difficulty_bounds() {
        assert_eq!(Difficulty::try_from(0).unwrap().level(), 0);
        assert_eq!(Difficulty::try_from(3).unwrap().level(), 3);
        assert_eq!(
            Difficulty::try_from(4),
            Err(ChessError::InvalidDifficulty(4))
        );
        assert_eq!(Difficulty::default().level(), 3);
    }

    #[test]
    fn test_greedy_takes_material() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut g = GameState::from_placement("k7/8/8/3q4/8/8/8/3RK3", Color::White).unwrap();
        assert_eq!(greedy_move(&mut g, &mut rng), Some("d1d5".parse().unwrap()));
    }

    #[test]
    fn test_greedy_breaks_ties_randomly() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut g = GameState::standard_setup();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            seen.insert(greedy_move(&mut g, &mut rng).unwrap());
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_every_level_plays_legal_moves() {
        let mut g = GameState::standard_setup();
        play(&mut g, &["e2e4", "e7e5", "g1f3", "b8c6"]);
        for level in 0..=Difficulty::MAX {
            let difficulty = Difficulty::try_from(level).unwrap();
            let mut agent = ComputerAgent::new(difficulty, SmallRng::seed_from_u64(level as u64));
            let before = g.clone();
            let legal = g.legal_moves();
            let mv = agent.choose_move(&mut g).unwrap();
            assert!(legal.contains(&mv));
            assert_eq!(g, before);
        }
    }

    #[test]
    fn test_alphabeta_agent_stays_legal_in_sparse_games() {
        let mut agent = ComputerAgent::new(Difficulty::default(), SmallRng::seed_from_u64(9));
        let mut g = GameState::from_placement("r3k3/1p6/8/8/8/8/6P1/4K2R", Color::White).unwrap();
        for _ in 0..6 {
            let legal = g.legal_moves();
            let Some(mv) = agent.choose_move(&mut g) else {
                break;
            };
            assert!(legal.contains(&mv));
            let plan = g.validate_move(mv).unwrap();
            g.commit(plan, Some(agent.choose_promotion())).unwrap();
        }
    }

    #[test]
    fn test_no_move_when_mated() {
        let mut agent = ComputerAgent::new(Difficulty::default(), SmallRng::seed_from_u64(0));
        let mut g = GameState::standard_setup();
        play(&mut g, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(agent.choose_move(&mut g), None);
    }

    #[test]
    fn test_random_promotion_choice() {
        let mut agent = ComputerAgent::new(Difficulty::default(), SmallRng::seed_from_u64(2));
        for _ in 0..20 {
            assert!(agent.choose_promotion().is_promotion_choice());
        }
    }
}
