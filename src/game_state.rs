use crate::attacks::is_attacked;
use crate::boards::*;
use crate::chess_errors::*;
use crate::history::MoveHistory;
use crate::moves::*;
use crate::pieces::*;
use crate::rules;
use crate::squares::*;
use std::fmt::{self, Display};
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, trace};

/// Raw (rank, file) coordinates as received from outside; may be off the board.
pub type Coordinates = (i32, i32);

/// A Game State is everything the rules need: the board, where the kings are,
/// the turn counter and the history of committed half-moves.
/// The only mutation surface is `apply`/`undo` (and `trial`, which pairs them).
#[derive(Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    kings: KingLocations,
    turn: u32,
    history: MoveHistory,
}

/// Whether the side to move can still play, and whether it is in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameState {
    /// Returns a game with the figures placed on standard chess starting positions
    pub fn standard_setup() -> GameState {
        let board = Board::standard();
        GameState {
            kings: KingLocations {
                white: Square::from_rank_file(Color::White.home_rank(), 4),
                black: Square::from_rank_file(Color::Black.home_rank(), 4),
            },
            board,
            turn: 0,
            history: MoveHistory::new(),
        }
    }

    /// A position with no history, built from a placement string.
    pub fn from_placement(placement: &str, to_move: Color) -> ChessResult<GameState> {
        let board = Board::from_placement(placement)?;
        let turn = match to_move {
            Color::White => 0,
            Color::Black => 1,
        };
        let kings = KingLocations::locate(&board)?;
        GameState::from_parts(board, kings, turn, MoveHistory::new())
    }

    /// Reassembles a state, checking that the king locations agree with the board.
    pub fn from_parts(
        board: Board,
        kings: KingLocations,
        turn: u32,
        history: MoveHistory,
    ) -> ChessResult<GameState> {
        for color in [Color::White, Color::Black] {
            if board.get(kings.get(color)) != Some(Piece::new(color, PieceKind::King)) {
                return Err(ChessError::MissingKing(color));
            }
        }
        Ok(GameState {
            board,
            kings,
            turn,
            history,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn kings(&self) -> KingLocations {
        self.kings
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn side_to_move(&self) -> Color {
        Color::to_move(self.turn)
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turn: {}  Player: {}\n{}",
            self.turn,
            self.side_to_move(),
            self.board
        )
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn: {}  Player: {}", self.turn, self.side_to_move())?;
        writeln!(f, "Kings: {:?}", self.kings)?;
        writeln!(f, "History: {:?}", self.history.notation())?;
        write!(f, "{}", self.board)
    }
}

// -------------------------------------
// Apply / Undo
// ------------------------------------

impl GameState {
    /// Runs the piece rule for `mv` on the current position.
    pub fn plan(&self, mv: Move) -> Option<PlannedMove> {
        rules::plan_move(&self.board, &self.history, mv)
    }

    /// Applies a planned move (which must come from `plan` on this very
    /// position) and records it. A promoting pawn becomes `promotion`, or a
    /// queen if none is given.
    pub fn apply(&mut self, plan: PlannedMove, promotion: Option<PieceKind>) -> MoveRecord {
        let PlannedMove { mv, piece, special } = plan;
        let promotion = if plan.is_promotion() {
            Some(promotion.unwrap_or(PieceKind::Queen))
        } else {
            None
        };

        self.board.take(mv.from);
        let captured = self.board.take(mv.to);
        let placed = match promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.board.set(mv.to, Some(placed));

        match special {
            Special::None => {}
            Special::EnPassant { square, .. } => {
                self.board.take(square);
            }
            Special::Castle { rook, from, to } => {
                self.board.take(from);
                self.board.set(to, Some(rook));
            }
        }

        if piece.is_king() {
            self.kings.set(piece.color, mv.to);
        }
        self.turn += 1;

        let record = MoveRecord {
            mv,
            moved: piece,
            captured,
            special,
            promotion,
        };
        self.history.push(record);
        record
    }

    /// Reverses the most recent applied move exactly. Returns `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        let MoveRecord {
            mv,
            moved,
            captured,
            special,
            ..
        } = record;

        self.board.set(mv.from, Some(moved));
        self.board.set(mv.to, captured);
        match special {
            Special::None => {}
            Special::EnPassant { pawn, square } => self.board.set(square, Some(pawn)),
            Special::Castle { rook, from, to } => {
                self.board.set(to, None);
                self.board.set(from, Some(rook));
            }
        }

        if moved.is_king() {
            self.kings.set(moved.color, mv.from);
        }
        self.turn -= 1;
        Some(record)
    }

    /// Applies `mv` for exploration. The returned guard derefs to the
    /// modified state and undoes the move when dropped, on every path.
    /// Returns `None` if `mv` breaks its piece's movement rule.
    pub fn trial(&mut self, mv: Move) -> Option<Trial<'_>> {
        let plan = self.plan(mv)?;
        Some(self.trial_plan(plan))
    }

    fn trial_plan(&mut self, plan: PlannedMove) -> Trial<'_> {
        trace!(mv = %plan.mv, turn = self.turn, "trial");
        self.apply(plan, None);
        Trial { state: self }
    }
}

/// A move applied for exploration only. Dropping it restores the previous
/// state, so a trial can never leak into the committed history.
pub struct Trial<'a> {
    state: &'a mut GameState,
}

impl Deref for Trial<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.state.undo();
    }
}

// -------------------------------------
// Validation and committing
// ------------------------------------

impl GameState {
    /// Checks a move request against everything short of king safety.
    pub fn validate(&self, from: Coordinates, to: Coordinates) -> Result<PlannedMove, Rejection> {
        let (origin, destination) = match (Square::new(from.0, from.1), Square::new(to.0, to.1)) {
            (Some(origin), Some(destination)) => (origin, destination),
            _ => return Err(Rejection::OutOfBounds),
        };
        self.validate_move(Move::new(origin, destination))
    }

    pub fn validate_move(&self, mv: Move) -> Result<PlannedMove, Rejection> {
        if mv.from == mv.to {
            return Err(Rejection::SameSquare);
        }
        let piece = self.board.get(mv.from).ok_or(Rejection::EmptyOrigin)?;
        if piece.color != self.side_to_move() {
            return Err(Rejection::WrongTurn);
        }
        if self.board.holds(mv.to, piece.color) {
            return Err(Rejection::OwnPieceAtDestination);
        }
        self.plan(mv).ok_or(Rejection::IllegalPieceMove)
    }

    /// Applies a validated move for real. If it leaves the mover's king
    /// attacked it is undone again and rejected.
    pub fn commit(
        &mut self,
        plan: PlannedMove,
        promotion: Option<PieceKind>,
    ) -> Result<MoveRecord, Rejection> {
        if plan.is_promotion() && promotion.map_or(false, |kind| !kind.is_promotion_choice()) {
            return Err(Rejection::InvalidPromotion);
        }
        let color = plan.piece.color;
        let record = self.apply(plan, promotion);
        if self.in_check(color) {
            self.undo();
            debug!(mv = %plan.mv, "move leaves own king in check");
            return Err(Rejection::LeavesKingInCheck);
        }
        info!(mv = %record, turn = self.turn, "committed");
        Ok(record)
    }

    /// Validates and commits in one step.
    pub fn submit(
        &mut self,
        from: Coordinates,
        to: Coordinates,
        promotion: Option<PieceKind>,
    ) -> Result<MoveRecord, Rejection> {
        let plan = self.validate(from, to)?;
        self.commit(plan, promotion)
    }
}

// -------------------------------------
// Check and mate detection
// ------------------------------------

impl GameState {
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        is_attacked(&self.board, square, by)
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.is_attacked(self.kings.get(color), color.opposite())
    }

    /// All moves the piece rules allow for the side to move, before the
    /// king-safety filter.
    pub fn pseudo_legal_moves(&self) -> Vec<PlannedMove> {
        let color = self.side_to_move();
        self.board
            .pieces_of(color)
            .flat_map(|(from, _)| Square::all().map(move |to| Move::new(from, to)))
            .filter_map(|mv| self.plan(mv))
            .collect()
    }

    /// Fully legal moves for the side to move. Order carries no meaning.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|plan| self.keeps_king_safe(*plan))
            .map(|plan| plan.mv)
            .collect()
    }

    /// Legal moves starting on `square`.
    pub fn legal_moves_from(&mut self, square: Square) -> Vec<Move> {
        let mut moves = self.legal_moves();
        moves.retain(|mv| mv.from == square);
        moves
    }

    fn keeps_king_safe(&mut self, plan: PlannedMove) -> bool {
        let color = plan.piece.color;
        let trial = self.trial_plan(plan);
        !trial.in_check(color)
    }

    pub fn status(&mut self) -> Status {
        let in_check = self.in_check(self.side_to_move());
        let has_moves = !self.legal_moves().is_empty();
        match (has_moves, in_check) {
            (true, false) => Status::Ongoing,
            (true, true) => Status::Check,
            (false, true) => Status::Checkmate,
            (false, false) => Status::Stalemate,
        }
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.status() == Status::Checkmate
    }

    pub fn is_stalemate(&mut self) -> bool {
        self.status() == Status::Stalemate
    }
}
