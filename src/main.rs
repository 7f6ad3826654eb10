use chess_arbiter::*;
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::convert::TryFrom;
use std::io::{stdout, Write};
use std::time::Duration;
use text_io::try_read;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------
// Command line
// ---------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Two humans at one terminal
    Pvp,
    /// Human against the computer
    Cpu,
    /// The computer plays itself
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Play chess in the terminal")]
struct Args {
    #[arg(long, value_enum, default_value_t = Mode::Cpu)]
    mode: Mode,

    /// Computer strength: 0 random, 1 greedy, 2 minimax, 3 alpha-beta
    #[arg(long, default_value_t = 3)]
    level: u8,

    /// Side the computer plays in cpu mode
    #[arg(long, value_enum, default_value_t = Side::Black)]
    computer_color: Side,

    /// Seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before each computer move, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

// ---------------------------------------------
// Terminal collaborators
// ---------------------------------------------

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, event: GameEvent) {
        match event {
            GameEvent::MoveCommitted(record) => println!("{} plays {}", record.moved.color, record),
            GameEvent::MoveRejected(rejection) => println!("Move rejected: {}", rejection),
            GameEvent::Check(color) => println!("{} is in check", color),
            GameEvent::DrawAvailable(kind) => println!("A draw by {} can be claimed", kind),
            GameEvent::DrawDeclined(kind) => println!("Draw by {} declined", kind),
            GameEvent::GameOver(result) => println!("\n{}\n", result),
            GameEvent::TookBack(record) => println!("Took back {}", record),
            GameEvent::NothingToUndo => println!("No moves to undo"),
            GameEvent::DifficultyChanged(level) => println!("Computer level is now {}", level),
            GameEvent::Resumed => println!("Game resumed"),
        }
    }
}

fn prompt(text: &str) -> Option<String> {
    print!("{}", text);
    stdout().flush().ok();
    let line: Result<String, _> = try_read!("{}\n");
    line.ok().map(|l| l.trim().to_string())
}

struct TerminalDecisions;

impl Decisions for TerminalDecisions {
    fn confirm(&mut self, question: Question) -> bool {
        let text = match question {
            Question::ClaimDraw(kind) => format!("Do you want to claim the draw by {}? (Y/N): ", kind),
            Question::AcceptDrawOffer { offered_by } => {
                format!("{} offers a draw. Do you accept? (Y/N): ", offered_by)
            }
        };
        matches!(prompt(&text).as_deref(), Some("Y") | Some("y"))
    }

    fn promotion(&mut self, color: Color) -> PieceKind {
        loop {
            let text = format!("{}, promote to (N, B, R, Q): ", color);
            match prompt(&text) {
                Some(answer) => match answer.parse() {
                    Ok(kind) => return kind,
                    Err(e) => println!("{}", e),
                },
                None => return PieceKind::Queen,
            }
        }
    }
}

type TerminalGame = Game<TerminalNotifier, TerminalDecisions, SmallRng>;

// ---------------------------------------------
// Human input
// ---------------------------------------------

enum Command {
    Move(Square, Square, Option<PieceKind>),
    Undo,
    Resign,
    Draw,
    Moves,
    Legal(Option<Square>),
    Captured,
    Level(u8),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, ChessError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        ["quit"] | ["exit"] => Command::Quit,
        ["undo"] => Command::Undo,
        ["resign"] => Command::Resign,
        ["draw"] => Command::Draw,
        ["moves"] => Command::Moves,
        ["legal"] => Command::Legal(None),
        ["legal", square] => Command::Legal(Some(square.parse()?)),
        ["captured"] => Command::Captured,
        ["level", n] => Command::Level(
            n.parse()
                .map_err(|_| ChessError::InvalidDifficulty(u8::MAX))?,
        ),
        ["help"] | [] => Command::Help,
        [mv] if mv.len() == 4 || mv.len() == 5 => {
            let parsed: Move = mv.get(..4).unwrap_or(*mv).parse()?;
            let promotion = match mv.get(4..) {
                Some(p) if !p.is_empty() => Some(p.parse()?),
                _ => None,
            };
            Command::Move(parsed.from, parsed.to, promotion)
        }
        [from, to] => Command::Move(from.parse()?, to.parse()?, None),
        [from, to, promotion] => Command::Move(from.parse()?, to.parse()?, Some(promotion.parse()?)),
        _ => return Err(ChessError::InvalidSquare(line.to_string())),
    };
    Ok(command)
}

fn coordinates(square: Square) -> Coordinates {
    (square.rank() as i32, square.file() as i32)
}

const HELP: &str = "Commands: e2 e4 | e7e8q | undo | resign | draw | moves | legal [square] | captured | level N | quit";

/// Runs one human command. Returns false when the player wants to stop.
fn human_turn(game: &mut TerminalGame) -> bool {
    let Some(line) = prompt(&format!("{} to move: ", game.side_to_move())) else {
        return false;
    };
    let command = match parse_command(&line) {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };
    match command {
        Command::Move(from, to, promotion) => {
            game.submit_move(coordinates(from), coordinates(to), promotion).ok();
        }
        Command::Undo => {
            game.takeback().ok();
        }
        Command::Resign => {
            if matches!(prompt("Do you want to forfeit the game? (Y/N): ").as_deref(), Some("Y") | Some("y")) {
                game.resign().ok();
            }
        }
        Command::Draw => {
            game.offer_draw().ok();
        }
        Command::Moves => println!("{}", game.notation().join(" ")),
        Command::Legal(square) => {
            let moves = match square {
                Some(square) => game.legal_moves_from(square),
                None => game.legal_moves(),
            };
            let moves: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
            println!("{}", moves.join(" "));
        }
        Command::Captured => {
            let pieces: Vec<String> = game.captured_pieces().iter().map(|p| p.to_string()).collect();
            println!("{}", pieces.join(" "));
        }
        Command::Level(level) => match Difficulty::try_from(level) {
            Ok(difficulty) => game.set_difficulty(difficulty),
            Err(e) => println!("{}", e),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

// ---------------------------------------------
// Main
// ---------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let difficulty = match Difficulty::try_from(args.level) {
        Ok(difficulty) => difficulty,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let opponent = match args.mode {
        Mode::Pvp => OpponentConfig::human_vs_human(),
        Mode::Cpu => OpponentConfig::vs_computer(args.computer_color.into()),
        Mode::Demo => OpponentConfig::duel(),
    };
    let rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let config = GameConfig {
        opponent,
        difficulty,
    };
    let mut game: TerminalGame = Game::with_rng(config, TerminalNotifier, TerminalDecisions, rng);
    let delay = Duration::from_millis(args.delay_ms);

    println!("{}", HELP);
    while !game.is_over() {
        println!("\n{}\n", game);
        if game.is_computer_turn() {
            std::thread::sleep(delay);
            if game.play_computer_turn().is_err() {
                break;
            }
        } else if !human_turn(&mut game) {
            return;
        }
    }
    println!("{}", game);
    println!("Moves: {}", game.notation().join(" "));
}
