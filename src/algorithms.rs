use crate::evaluation::evaluate;
use crate::game_state::*;
use crate::moves::Move;
use crate::pieces::Color;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::{max, min};
use tracing::debug;

/// Value of a won position. A lost one is worth `-INFINITY`.
pub const INFINITY: i32 = 9999;

/// Fixed-depth game tree search over trial moves. Every explored move is
/// applied through a `Trial`, so the state is restored on every return path.
pub trait TreeSearch {
    /// Static value of a position from `perspective`'s point of view. Higher => Better
    fn score(&self, state: &GameState, perspective: Color) -> i32;

    /// Plain minimax to `depth` plies. Ties go to whichever move the
    /// shuffled root order reaches first.
    fn minimax<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        depth: u16,
        rng: &mut R,
    ) -> Option<Move> {
        let root = state.side_to_move();
        let mut moves = state.legal_moves();
        moves.shuffle(rng);

        let mut best_val = -INFINITY;
        let mut best_move = None;
        for mv in moves {
            let Some(mut trial) = state.trial(mv) else {
                continue;
            };
            let move_val = self.minimax_helper(&mut trial, root, depth.saturating_sub(1), false);
            if move_val > best_val {
                best_val = move_val;
                best_move = Some(mv);
            }
        }
        debug!(depth, best_val, best_move = ?best_move, "minimax");
        best_move
    }

    /// Alpha-beta to `depth` plies. Moves are shuffled at every node before
    /// iterating.
    fn alphabeta<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        depth: u16,
        rng: &mut R,
    ) -> Option<Move> {
        let root = state.side_to_move();
        let mut moves = state.legal_moves();
        moves.shuffle(rng);

        let mut best_val = -INFINITY;
        let mut best_move = None;
        let mut alpha_ = i32::MIN;
        let beta_ = i32::MAX;

        for mv in moves {
            let Some(mut trial) = state.trial(mv) else {
                continue;
            };
            let move_val = self.alphabeta_helper(
                &mut trial,
                root,
                depth.saturating_sub(1),
                alpha_,
                beta_,
                false,
                rng,
            );
            if move_val > best_val {
                best_val = move_val;
                best_move = Some(mv);
            }
            alpha_ = max(alpha_, best_val);
        }
        debug!(depth, best_val, best_move = ?best_move, "alphabeta");
        best_move
    }

    #[doc(hidden)]
    fn minimax_helper(&self, state: &mut GameState, root: Color, n: u16, maximizing: bool) -> i32 {
        if n == 0 {
            return self.score(state, root);
        }
        let moves = state.legal_moves();
        if moves.is_empty() {
            return no_moves_score(state, root);
        }

        let mut val = if maximizing { i32::MIN } else { i32::MAX };
        for mv in moves {
            let Some(mut trial) = state.trial(mv) else {
                continue;
            };
            let child = self.minimax_helper(&mut trial, root, n - 1, !maximizing);
            val = if maximizing {
                max(val, child)
            } else {
                min(val, child)
            };
        }
        val
    }

    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    fn alphabeta_helper<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        root: Color,
        n: u16,
        alpha: i32,
        beta: i32,
        maximizing: bool,
        rng: &mut R,
    ) -> i32 {
        if n == 0 {
            return self.score(state, root);
        }
        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return no_moves_score(state, root);
        }
        moves.shuffle(rng);

        // Main part of the algorithm
        let mut alpha_ = alpha;
        let mut beta_ = beta;
        let mut val;
        if maximizing {
            val = i32::MIN;
            for mv in moves {
                let Some(mut trial) = state.trial(mv) else {
                    continue;
                };
                val = max(
                    val,
                    self.alphabeta_helper(&mut trial, root, n - 1, alpha_, beta_, false, rng),
                );
                alpha_ = max(alpha_, val);
                if alpha_ >= beta_ {
                    break;
                }
            }
        } else {
            val = i32::MAX;
            for mv in moves {
                let Some(mut trial) = state.trial(mv) else {
                    continue;
                };
                val = min(
                    val,
                    self.alphabeta_helper(&mut trial, root, n - 1, alpha_, beta_, true, rng),
                );
                beta_ = min(beta_, val);
                if alpha_ >= beta_ {
                    break;
                }
            }
        }
        val
    }
}

/// The side to move has nothing to play: mate counts fully, stalemate is even.
fn no_moves_score(state: &GameState, root: Color) -> i32 {
    let side = state.side_to_move();
    if !state.in_check(side) {
        0
    } else if side == root {
        -INFINITY
    } else {
        INFINITY
    }
}

/// Searches on material count alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialSearch;

impl TreeSearch for MaterialSearch {
    fn score(&self, state: &GameState, perspective: Color) -> i32 {
        evaluate(state.board(), perspective)
    }
}
