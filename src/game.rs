use crate::agents::*;
use crate::chess_errors::*;
use crate::draws::*;
use crate::evaluation::{evaluate, final_score};
use crate::game_state::*;
use crate::moves::*;
use crate::persistence::Snapshot;
use crate::pieces::*;
use crate::squares::Square;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

// ---------------------------------------------
// Configuration
// ---------------------------------------------

/// Which sides the computer plays. These three flags must match for a saved
/// game to be resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct OpponentConfig {
    pub enabled: bool,
    pub computer_color: Color,
    /// Both sides are computer-controlled.
    pub duel: bool,
}

impl OpponentConfig {
    pub fn human_vs_human() -> Self {
        OpponentConfig {
            enabled: false,
            computer_color: Color::Black,
            duel: false,
        }
    }

    pub fn vs_computer(computer_color: Color) -> Self {
        OpponentConfig {
            enabled: true,
            computer_color,
            duel: false,
        }
    }

    pub fn duel() -> Self {
        OpponentConfig {
            enabled: true,
            computer_color: Color::Black,
            duel: true,
        }
    }

    /// Whether the computer plays `color`.
    pub fn controls(&self, color: Color) -> bool {
        self.duel || (self.enabled && self.computer_color == color)
    }

    pub fn involves_computer(&self) -> bool {
        self.enabled || self.duel
    }
}

impl Default for OpponentConfig {
    fn default() -> Self {
        OpponentConfig::human_vs_human()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub opponent: OpponentConfig,
    pub difficulty: Difficulty,
}

// ---------------------------------------------
// Results and events
// ---------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Outcome {
    Checkmate { winner: Color },
    Resignation { winner: Color },
    Draw(DrawKind),
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate { winner } | Outcome::Resignation { winner } => Some(winner),
            Outcome::Draw(_) => None,
        }
    }
}

/// How a game ended. Decisive results carry the winner's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GameResult {
    pub outcome: Outcome,
    pub score: Option<i32>,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Checkmate { winner } => write!(f, "Checkmate. {} wins", winner)?,
            Outcome::Resignation { winner } => {
                write!(f, "{} resigns. {} wins", winner.opposite(), winner)?
            }
            Outcome::Draw(kind) => write!(f, "Draw by {}", kind)?,
        }
        if let Some(score) = self.score {
            write!(f, ". Final score: {}", score)?;
        }
        Ok(())
    }
}

/// Things a front-end should tell the players about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MoveCommitted(MoveRecord),
    MoveRejected(Rejection),
    /// The given side's king is attacked.
    Check(Color),
    DrawAvailable(DrawKind),
    DrawDeclined(DrawKind),
    GameOver(GameResult),
    TookBack(MoveRecord),
    NothingToUndo,
    DifficultyChanged(Difficulty),
    Resumed,
}

/// Yes/no questions put to a human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    /// The side to move may end the game with this draw.
    ClaimDraw(DrawKind),
    /// The opponent of `offered_by` is asked to agree to a draw.
    AcceptDrawOffer { offered_by: Color },
}

/// Receives semantic events; rendering them is up to the implementor.
pub trait Notifier {
    fn notify(&mut self, event: GameEvent);
}

impl Notifier for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Answers the questions a game needs a human for.
pub trait Decisions {
    fn confirm(&mut self, question: Question) -> bool;

    /// Must return one of `PieceKind::PROMOTIONS`.
    fn promotion(&mut self, color: Color) -> PieceKind;
}

/// Gives the same answer to every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDecisions {
    pub confirm: bool,
    pub promotion: PieceKind,
}

impl FixedDecisions {
    pub fn new(confirm: bool) -> Self {
        FixedDecisions {
            confirm,
            promotion: PieceKind::Queen,
        }
    }
}

impl Decisions for FixedDecisions {
    fn confirm(&mut self, _question: Question) -> bool {
        self.confirm
    }

    fn promotion(&mut self, _color: Color) -> PieceKind {
        self.promotion
    }
}

// ---------------------------------------------
// Game
// ---------------------------------------------

/// One chess session: the position, who plays which side, and whether the
/// game is over. Every request is answered with a committed record or a
/// `Rejection`; rejected requests leave the game untouched.
pub struct Game<N: Notifier, D: Decisions, R: Rng = SmallRng> {
    config: GameConfig,
    state: GameState,
    computer: ComputerAgent<R>,
    result: Option<GameResult>,
    notifier: N,
    decisions: D,
}

impl<N: Notifier, D: Decisions> Game<N, D, SmallRng> {
    pub fn new(config: GameConfig, notifier: N, decisions: D) -> Self {
        Game::with_rng(config, notifier, decisions, SmallRng::from_entropy())
    }
}

impl<N: Notifier, D: Decisions, R: Rng> Game<N, D, R> {
    pub fn with_rng(config: GameConfig, notifier: N, decisions: D, rng: R) -> Self {
        Game::from_state(config, GameState::standard_setup(), notifier, decisions, rng)
    }

    /// A session continuing from an arbitrary position.
    pub fn from_state(config: GameConfig, state: GameState, notifier: N, decisions: D, rng: R) -> Self {
        Game {
            computer: ComputerAgent::new(config.difficulty, rng),
            config,
            state,
            result: None,
            notifier,
            decisions,
        }
    }

    /// Starts over from the standard position with the same configuration.
    pub fn new_game(&mut self) {
        self.state = GameState::standard_setup();
        self.result = None;
        info!("new game");
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn decisions_mut(&mut self) -> &mut D {
        &mut self.decisions
    }

    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.config.opponent.controls(self.side_to_move())
    }

    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.state.legal_moves()
    }

    pub fn legal_moves_from(&mut self, square: Square) -> Vec<Move> {
        self.state.legal_moves_from(square)
    }

    pub fn captured_pieces(&self) -> Vec<Piece> {
        self.state.history().captured_pieces()
    }

    pub fn notation(&self) -> Vec<String> {
        self.state.history().notation()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        self.computer.set_difficulty(difficulty);
        debug!(level = difficulty.level(), "difficulty changed");
        self.notifier.notify(GameEvent::DifficultyChanged(difficulty));
    }

    fn reject<T>(&mut self, rejection: Rejection) -> Result<T, Rejection> {
        debug!(%rejection, "rejected");
        self.notifier.notify(GameEvent::MoveRejected(rejection));
        Err(rejection)
    }

    // -------------------------------------
    // Moves
    // -------------------------------------

    /// A human move from `from` to `to`, both (rank, file). A pawn reaching
    /// the last rank becomes `promotion`, or whatever the decisions
    /// collaborator picks if none is given.
    pub fn submit_move(
        &mut self,
        from: Coordinates,
        to: Coordinates,
        promotion: Option<PieceKind>,
    ) -> Result<MoveRecord, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameEnded);
        }
        if self.is_computer_turn() {
            return self.reject(Rejection::WrongTurn);
        }
        let plan = match self.state.validate(from, to) {
            Ok(plan) => plan,
            Err(rejection) => return self.reject(rejection),
        };
        let promotion = if plan.is_promotion() {
            Some(promotion.unwrap_or_else(|| self.decisions.promotion(plan.piece.color)))
        } else {
            None
        };
        self.commit(plan, promotion)
    }

    /// Lets the computer play the side to move.
    pub fn play_computer_turn(&mut self) -> Result<MoveRecord, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameEnded);
        }
        if !self.is_computer_turn() {
            return self.reject(Rejection::WrongTurn);
        }
        let Some(mv) = self.computer.choose_move(&mut self.state) else {
            // Nothing to play means the last move already ended the game.
            self.conclude_turn();
            return self.reject(Rejection::GameEnded);
        };
        let plan = match self.state.validate_move(mv) {
            Ok(plan) => plan,
            Err(rejection) => return self.reject(rejection),
        };
        let promotion = plan
            .is_promotion()
            .then(|| self.computer.choose_promotion());
        self.commit(plan, promotion)
    }

    fn commit(
        &mut self,
        plan: PlannedMove,
        promotion: Option<PieceKind>,
    ) -> Result<MoveRecord, Rejection> {
        match self.state.commit(plan, promotion) {
            Ok(record) => {
                self.notifier.notify(GameEvent::MoveCommitted(record));
                self.conclude_turn();
                Ok(record)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Looks for check, mate and draws after a committed move. Mate is
    /// tested first; forced draws end the game, claimable ones go to the
    /// side to move.
    fn conclude_turn(&mut self) {
        let to_move = self.side_to_move();
        match self.state.status() {
            Status::Checkmate => {
                self.finish(Outcome::Checkmate {
                    winner: to_move.opposite(),
                });
                return;
            }
            Status::Check => self.notifier.notify(GameEvent::Check(to_move)),
            Status::Ongoing | Status::Stalemate => {}
        }

        let conditions = draw_conditions(&mut self.state);
        if let Some(kind) = forced_draw(&conditions) {
            self.finish(Outcome::Draw(kind));
            return;
        }
        for kind in conditions.into_iter().filter(|k| k.is_claimable()) {
            self.notifier.notify(GameEvent::DrawAvailable(kind));
            let claimed = self.config.opponent.controls(to_move)
                || self.decisions.confirm(Question::ClaimDraw(kind));
            if claimed {
                self.finish(Outcome::Draw(kind));
                return;
            }
            self.notifier.notify(GameEvent::DrawDeclined(kind));
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        let computer = if self.config.opponent.involves_computer() {
            Some(self.config.difficulty)
        } else {
            None
        };
        let score = outcome
            .winner()
            .map(|winner| final_score(self.state.board(), winner, computer));
        let result = GameResult { outcome, score };
        info!(%result, turn = self.state.turn(), "game over");
        self.result = Some(result);
        self.notifier.notify(GameEvent::GameOver(result));
    }

    // -------------------------------------
    // Takeback, resignation, draw offers
    // -------------------------------------

    /// Undoes the last committed half-move. `Ok(None)` when there is
    /// nothing to undo.
    pub fn takeback(&mut self) -> Result<Option<MoveRecord>, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameEnded);
        }
        let undone = self.state.undo();
        match undone {
            Some(record) => {
                info!(mv = %record, "took back");
                self.notifier.notify(GameEvent::TookBack(record));
            }
            None => self.notifier.notify(GameEvent::NothingToUndo),
        }
        Ok(undone)
    }

    /// The side to move gives up.
    pub fn resign(&mut self) -> Result<GameResult, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameEnded);
        }
        self.finish(Outcome::Resignation {
            winner: self.side_to_move().opposite(),
        });
        self.result.ok_or(Rejection::GameEnded)
    }

    /// The side to move offers a draw. A computer opponent accepts unless it
    /// is ahead in material; a human is asked. Returns whether the game was
    /// drawn.
    pub fn offer_draw(&mut self) -> Result<bool, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameEnded);
        }
        let offered_by = self.side_to_move();
        let receiver = offered_by.opposite();
        let accepted = if self.config.opponent.controls(receiver) {
            evaluate(self.state.board(), receiver) <= 0
        } else {
            self.decisions
                .confirm(Question::AcceptDrawOffer { offered_by })
        };
        if accepted {
            self.finish(Outcome::Draw(DrawKind::Agreement));
        } else {
            self.notifier
                .notify(GameEvent::DrawDeclined(DrawKind::Agreement));
        }
        Ok(accepted)
    }

    // -------------------------------------
    // Saving and resuming
    // -------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.state,
            self.config.opponent,
            self.config.difficulty,
            self.result,
        )
    }

    /// Continues a saved game. The snapshot must have been taken with the
    /// same computer opponent setup as this session.
    pub fn resume(&mut self, snapshot: &Snapshot) -> ChessResult<()> {
        snapshot.check_compatible(&self.config.opponent)?;
        self.state = snapshot.restore()?;
        self.result = snapshot.result;
        self.config.difficulty = snapshot.difficulty;
        self.computer.set_difficulty(snapshot.difficulty);
        debug!(turn = self.state.turn(), "resumed");
        self.notifier.notify(GameEvent::Resumed);
        Ok(())
    }
}

impl<N: Notifier, D: Decisions, R: Rng> fmt::Display for Game<N, D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)
    }
}
