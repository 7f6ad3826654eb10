use chess_arbiter::utils::replay;
use chess_arbiter::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::convert::TryFrom;

/// Answers every question the same way and remembers what was asked.
struct RecordingDecisions {
    answer: bool,
    asked: Vec<Question>,
}

impl RecordingDecisions {
    fn answering(answer: bool) -> Self {
        RecordingDecisions {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Decisions for RecordingDecisions {
    fn confirm(&mut self, question: Question) -> bool {
        self.asked.push(question);
        self.answer
    }

    fn promotion(&mut self, _color: Color) -> PieceKind {
        PieceKind::Queen
    }
}

type TestGame = Game<Vec<GameEvent>, RecordingDecisions, SmallRng>;

fn config(opponent: OpponentConfig, level: u8) -> GameConfig {
    GameConfig {
        opponent,
        difficulty: Difficulty::try_from(level).unwrap(),
    }
}

fn new_game(opponent: OpponentConfig, answer: bool) -> TestGame {
    Game::with_rng(
        config(opponent, 3),
        Vec::new(),
        RecordingDecisions::answering(answer),
        SmallRng::seed_from_u64(2024),
    )
}

fn game_at(placement: &str, to_move: Color, opponent: OpponentConfig, level: u8) -> TestGame {
    Game::from_state(
        config(opponent, level),
        GameState::from_placement(placement, to_move).unwrap(),
        Vec::new(),
        RecordingDecisions::answering(false),
        SmallRng::seed_from_u64(2024),
    )
}

fn human_game_at(placement: &str, to_move: Color, answer: bool) -> TestGame {
    Game::from_state(
        config(OpponentConfig::human_vs_human(), 0),
        GameState::from_placement(placement, to_move).unwrap(),
        Vec::new(),
        RecordingDecisions::answering(answer),
        SmallRng::seed_from_u64(2024),
    )
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

/// Submits a move written in coordinate notation.
fn submit(g: &mut TestGame, text: &str) -> Result<MoveRecord, Rejection> {
    let mv: Move = text.parse().unwrap();
    let from = (mv.from.rank() as i32, mv.from.file() as i32);
    let to = (mv.to.rank() as i32, mv.to.file() as i32);
    g.submit_move(from, to, None)
}

// Rooks wander so the shuffle never looks like a two-piece repetition.
const ROOK_TOUR: [&str; 12] = [
    "a1a2", "a8a7", "a2a3", "a7a6", "a3a4", "a6a5", "a4b4", "a5b5", "b4b1", "b5b8", "b1a1",
    "b8a8",
];
const ROOK_TOUR_START: &str = "r3k3/8/8/8/8/8/8/R3K3";

fn tour_until_over(g: &mut TestGame) {
    while !g.is_over() && g.state().history().len() < 200 {
        let mv = ROOK_TOUR[g.state().history().len() % ROOK_TOUR.len()];
        submit(g, mv).unwrap();
    }
}

#[test]
fn black_has_twenty_replies_to_e4() {
    let mut g = new_game(OpponentConfig::human_vs_human(), false);
    g.submit_move((6, 4), (4, 4), None).unwrap();
    assert_eq!(g.side_to_move(), Color::Black);
    assert_eq!(g.legal_moves().len(), 20);
    assert_eq!(g.legal_moves_from(sq("g8")).len(), 2);
    assert_eq!(g.notation(), vec!["e2e4".to_string()]);
}

#[test]
fn knight_shuffle_offers_threefold_repetition() {
    let mut g = new_game(OpponentConfig::human_vs_human(), true);
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6"] {
        let mv: Move = mv.parse().unwrap();
        let from = (mv.from.rank() as i32, mv.from.file() as i32);
        let to = (mv.to.rank() as i32, mv.to.file() as i32);
        g.submit_move(from, to, None).unwrap();
    }
    assert_eq!(
        g.decisions_mut().asked,
        vec![Question::ClaimDraw(DrawKind::ThreefoldRepetition)]
    );
    let result = g.result().unwrap();
    assert_eq!(result.outcome, Outcome::Draw(DrawKind::ThreefoldRepetition));
    assert_eq!(result.score, None);
    assert_eq!(
        g.submit_move((6, 4), (4, 4), None),
        Err(Rejection::GameEnded)
    );
}

#[test]
fn computer_claims_repetition_without_asking() {
    let mut state = GameState::from_placement(boards::STANDARD_PLACEMENT, Color::Black).unwrap();
    replay(&mut state, &["g8f6", "g1f3", "f6g8", "f3g1", "g8f6"]).unwrap();
    let mut g = Game::from_state(
        config(OpponentConfig::vs_computer(Color::Black), 0),
        state,
        Vec::new(),
        RecordingDecisions::answering(false),
        SmallRng::seed_from_u64(1),
    );
    g.submit_move((7, 6), (5, 5), None).unwrap();
    assert!(g.decisions_mut().asked.is_empty());
    assert_eq!(
        g.result().map(|r| r.outcome),
        Some(Outcome::Draw(DrawKind::ThreefoldRepetition))
    );
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut g = game_at("4k3/8/8/8/4p3/8/5P2/4K3", Color::White, OpponentConfig::human_vs_human(), 0);
    g.submit_move((6, 5), (4, 5), None).unwrap();
    let record = g.submit_move((4, 4), (5, 5), None).unwrap();
    let board = g.state().board();
    assert_eq!(board[sq("f4")], None);
    assert_eq!(board[sq("e4")], None);
    assert_eq!(board[sq("f3")], Some(Piece::new(Color::Black, PieceKind::Pawn)));
    assert!(record.is_capture());
    assert_eq!(
        g.captured_pieces(),
        vec![Piece::new(Color::White, PieceKind::Pawn)]
    );
}

#[test]
fn en_passant_window_closes_after_one_move() {
    let mut g = game_at("4k3/8/8/8/4p3/8/5P2/4K3", Color::White, OpponentConfig::human_vs_human(), 0);
    g.submit_move((6, 5), (4, 5), None).unwrap();
    g.submit_move((0, 4), (0, 3), None).unwrap();
    g.submit_move((7, 4), (7, 3), None).unwrap();
    assert_eq!(
        g.submit_move((4, 4), (5, 5), None),
        Err(Rejection::IllegalPieceMove)
    );
}

#[test]
fn castling_both_ways() {
    let placement = "r3k2r/8/8/8/8/8/8/R3K2R";
    let mut kingside = game_at(placement, Color::White, OpponentConfig::human_vs_human(), 0);
    kingside.submit_move((7, 4), (7, 6), None).unwrap();
    let board = kingside.state().board();
    assert_eq!(board[sq("h1")], None);
    assert_eq!(board[sq("g1")], Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(board[sq("f1")], Some(Piece::new(Color::White, PieceKind::Rook)));

    let mut queenside = game_at(placement, Color::White, OpponentConfig::human_vs_human(), 0);
    queenside.submit_move((7, 4), (7, 2), None).unwrap();
    let board = queenside.state().board();
    assert_eq!(board[sq("a1")], None);
    assert_eq!(board[sq("c1")], Some(Piece::new(Color::White, PieceKind::King)));
    assert_eq!(board[sq("d1")], Some(Piece::new(Color::White, PieceKind::Rook)));

    // Taking it back puts both pieces home and castling is possible again.
    queenside.takeback().unwrap();
    assert_eq!(
        queenside.state(),
        &GameState::from_placement(placement, Color::White).unwrap()
    );
}

#[test]
fn no_castling_through_attacked_squares() {
    // The black rook on f8 covers f1.
    let mut g = game_at("4kr2/8/8/8/8/8/8/R3K2R", Color::White, OpponentConfig::human_vs_human(), 0);
    assert_eq!(
        g.submit_move((7, 4), (7, 6), None),
        Err(Rejection::IllegalPieceMove)
    );
    assert_eq!(
        g.notifier().last(),
        Some(&GameEvent::MoveRejected(Rejection::IllegalPieceMove))
    );
    g.submit_move((7, 4), (7, 2), None).unwrap();
}

#[test]
fn no_castling_after_the_rook_moved() {
    let mut g = game_at("r3k2r/8/8/8/8/8/8/R3K2R", Color::White, OpponentConfig::human_vs_human(), 0);
    g.submit_move((7, 7), (6, 7), None).unwrap();
    g.submit_move((0, 0), (1, 0), None).unwrap();
    g.submit_move((6, 7), (7, 7), None).unwrap();
    g.submit_move((1, 0), (0, 0), None).unwrap();
    assert_eq!(
        g.submit_move((7, 4), (7, 6), None),
        Err(Rejection::IllegalPieceMove)
    );
    g.submit_move((7, 4), (7, 2), None).unwrap();
}

#[test]
fn leaving_the_king_in_check_is_rejected() {
    let mut g = game_at("4r1k1/8/8/8/8/8/4B3/4K3", Color::White, OpponentConfig::human_vs_human(), 0);
    let before = g.state().clone();
    assert_eq!(
        g.submit_move((6, 4), (5, 3), None),
        Err(Rejection::LeavesKingInCheck)
    );
    assert_eq!(g.state(), &before);
}

#[test]
fn beating_the_computer_multiplies_the_score() {
    let mut g = game_at("6k1/5ppp/8/8/8/8/8/R5K1", Color::White, OpponentConfig::vs_computer(Color::Black), 2);
    g.submit_move((7, 0), (0, 0), None).unwrap();
    let result = g.result().unwrap();
    assert_eq!(result.outcome, Outcome::Checkmate { winner: Color::White });
    // Rook and king against king and three pawns, times level 2 plus one.
    assert_eq!(result.score, Some(60));
    assert_eq!(g.play_computer_turn(), Err(Rejection::GameEnded));
}

#[test]
fn level_three_moves_are_legal() {
    let mut g = new_game(OpponentConfig::vs_computer(Color::Black), false);
    for mv in [((6, 4), (4, 4)), ((7, 6), (5, 5))] {
        g.submit_move(mv.0, mv.1, None).unwrap();
        let legal = g.legal_moves();
        let record = g.play_computer_turn().unwrap();
        assert!(legal.contains(&record.mv));
    }
    assert_eq!(g.state().turn(), 4);
}

#[test]
fn random_duel_finishes() {
    let mut g = Game::with_rng(
        config(OpponentConfig::duel(), 0),
        Vec::new(),
        RecordingDecisions::answering(false),
        SmallRng::seed_from_u64(77),
    );
    let mut plies = 0;
    while !g.is_over() && plies < 10_000 {
        g.play_computer_turn().unwrap();
        plies += 1;
        assert_eq!(g.state().turn() as usize, g.state().history().len());
    }
    assert!(g.is_over());
    assert!(g.decisions_mut().asked.is_empty());
    assert!(matches!(
        g.notifier().last(),
        Some(GameEvent::GameOver(_))
    ));
}

#[test]
fn snapshot_and_resume() {
    let mut g = new_game(OpponentConfig::vs_computer(Color::Black), false);
    g.submit_move((6, 3), (4, 3), None).unwrap();
    g.play_computer_turn().unwrap();
    let snapshot = g.snapshot();

    let mut resumed = new_game(OpponentConfig::vs_computer(Color::Black), false);
    resumed.resume(&snapshot).unwrap();
    assert_eq!(resumed.state(), g.state());
    assert_eq!(resumed.notifier().last(), Some(&GameEvent::Resumed));
    assert!(!resumed.is_computer_turn());

    let mut mismatched = new_game(OpponentConfig::human_vs_human(), false);
    assert_eq!(
        mismatched.resume(&snapshot),
        Err(ChessError::OpponentMismatch)
    );
    assert_eq!(mismatched.state(), &GameState::standard_setup());
}

#[test]
fn takeback_and_nothing_to_undo() {
    let mut g = new_game(OpponentConfig::human_vs_human(), false);
    assert_eq!(g.takeback(), Ok(None));
    g.submit_move((6, 4), (4, 4), None).unwrap();
    g.submit_move((1, 4), (3, 4), None).unwrap();
    let undone = g.takeback().unwrap().unwrap();
    assert_eq!(undone.mv, "e7e5".parse().unwrap());
    assert_eq!(g.side_to_move(), Color::Black);
    assert_eq!(
        g.notifier().last(),
        Some(&GameEvent::TookBack(undone))
    );
}

#[test]
fn computer_promotes_to_a_random_piece() {
    let mut kinds = Vec::new();
    for seed in 0..40 {
        let mut g = Game::from_state(
            config(OpponentConfig::vs_computer(Color::White), 1),
            GameState::from_placement("7k/P7/8/8/8/8/8/K7", Color::White).unwrap(),
            Vec::new(),
            RecordingDecisions::answering(false),
            SmallRng::seed_from_u64(seed),
        );
        let record = g.play_computer_turn().unwrap();
        assert_eq!(record.mv, "a7a8".parse().unwrap());
        let kind = record.promotion.unwrap();
        assert!(PieceKind::PROMOTIONS.contains(&kind));
        assert_eq!(g.state().board()[sq("a8")], Some(Piece::new(Color::White, kind)));
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    assert!(kinds.len() > 1);
}

#[test]
fn insufficient_material_claim_accepted() {
    let mut g = human_game_at("4k3/8/8/8/8/8/8/4K1N1", Color::White, true);
    submit(&mut g, "g1f3").unwrap();
    assert_eq!(
        g.decisions_mut().asked,
        vec![Question::ClaimDraw(DrawKind::InsufficientMaterial)]
    );
    let result = g.result().unwrap();
    assert_eq!(result.outcome, Outcome::Draw(DrawKind::InsufficientMaterial));
    assert_eq!(result.score, None);
}

#[test]
fn insufficient_material_claim_declined() {
    let mut g = human_game_at("4k3/8/8/8/8/8/8/4K1N1", Color::White, false);
    submit(&mut g, "g1f3").unwrap();
    assert!(!g.is_over());
    assert!(g
        .notifier()
        .contains(&GameEvent::DrawDeclined(DrawKind::InsufficientMaterial)));

    // The claim comes back to each side after every move.
    submit(&mut g, "e8d8").unwrap();
    assert!(!g.is_over());
    assert_eq!(g.decisions_mut().asked.len(), 2);
}

#[test]
fn fifty_move_claim_is_offered() {
    let mut g = human_game_at(ROOK_TOUR_START, Color::White, true);
    tour_until_over(&mut g);
    assert_eq!(g.state().history().len(), 51);
    assert_eq!(
        g.decisions_mut().asked,
        vec![Question::ClaimDraw(DrawKind::FiftyMoveRule)]
    );
    assert_eq!(
        g.result().map(|r| r.outcome),
        Some(Outcome::Draw(DrawKind::FiftyMoveRule))
    );
}

#[test]
fn seventy_five_move_rule_ends_the_game_unasked() {
    let mut g = human_game_at(ROOK_TOUR_START, Color::White, false);
    tour_until_over(&mut g);
    assert_eq!(g.state().history().len(), 76);
    assert_eq!(
        g.result().map(|r| r.outcome),
        Some(Outcome::Draw(DrawKind::SeventyFiveMoveRule))
    );
    // Declined fifty-move claims after half-moves 51 to 75, nothing after the last.
    let asked = &g.decisions_mut().asked;
    assert_eq!(asked.len(), 25);
    assert!(asked
        .iter()
        .all(|q| *q == Question::ClaimDraw(DrawKind::FiftyMoveRule)));
    assert!(matches!(
        g.notifier().last(),
        Some(GameEvent::GameOver(_))
    ));
}
