//! Per-piece movement rules. Every check here ignores whether the mover's own
//! king would be left in check; that is filtered later by trial application.
use crate::attacks::is_attacked;
use crate::boards::*;
use crate::history::MoveHistory;
use crate::moves::*;
use crate::pieces::*;
use crate::squares::*;

/// Checks `mv` against the movement rule of the piece standing on its origin.
/// Returns the planned move (including any castling or en passant side
/// effect) if the rule accepts it.
pub fn plan_move(board: &Board, history: &MoveHistory, mv: Move) -> Option<PlannedMove> {
    let piece = board.get(mv.from)?;
    if mv.from == mv.to || board.holds(mv.to, piece.color) {
        return None;
    }

    let special = match piece.kind {
        PieceKind::Pawn => pawn_move(board, history, piece.color, mv)?,
        PieceKind::Knight => knight_move(mv).then_some(Special::None)?,
        PieceKind::Bishop => bishop_move(board, mv).then_some(Special::None)?,
        PieceKind::Rook => rook_move(board, mv).then_some(Special::None)?,
        PieceKind::Queen => queen_move(board, mv).then_some(Special::None)?,
        PieceKind::King => king_move(board, history, piece.color, mv)?,
    };
    Some(PlannedMove { mv, piece, special })
}

/// Every square strictly between `from` and `to` is empty, walking by `step`.
fn path_clear(board: &Board, from: Square, to: Square, step: Offset) -> bool {
    let mut current = from;
    loop {
        current = match current + step {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty_at(current) {
            return false;
        }
    }
}

fn unit_step(mv: Move) -> Offset {
    let o = mv.from.offset_to(mv.to);
    Offset::new(o.ranks.signum(), o.files.signum())
}

/// Straight line with nothing in between. Destination occupancy is not checked.
pub fn rook_move(board: &Board, mv: Move) -> bool {
    let o = mv.from.offset_to(mv.to);
    (o.ranks == 0) != (o.files == 0) && path_clear(board, mv.from, mv.to, unit_step(mv))
}

/// Diagonal with nothing in between. Destination occupancy is not checked.
pub fn bishop_move(board: &Board, mv: Move) -> bool {
    let o = mv.from.offset_to(mv.to);
    o.ranks != 0 && o.ranks.abs() == o.files.abs() && path_clear(board, mv.from, mv.to, unit_step(mv))
}

pub fn queen_move(board: &Board, mv: Move) -> bool {
    rook_move(board, mv) || bishop_move(board, mv)
}

pub fn knight_move(mv: Move) -> bool {
    let o = mv.from.offset_to(mv.to);
    matches!((o.ranks.abs(), o.files.abs()), (1, 2) | (2, 1))
}

/// One step in any of the eight directions.
pub fn king_step(mv: Move) -> bool {
    let o = mv.from.offset_to(mv.to);
    mv.from != mv.to && o.ranks.abs() <= 1 && o.files.abs() <= 1
}

fn king_move(board: &Board, history: &MoveHistory, color: Color, mv: Move) -> Option<Special> {
    if king_step(mv) {
        return Some(Special::None);
    }
    castle(board, history, color, mv)
}

/// Castling is a two-square king move along the home rank. The king and the
/// rook must never have moved, the squares between them must be empty, and
/// the king may not start on, pass through or land on an attacked square.
fn castle(board: &Board, history: &MoveHistory, color: Color, mv: Move) -> Option<Special> {
    let home = color.home_rank();
    if mv.from != Square::from_rank_file(home, 4) || mv.to.rank() != home {
        return None;
    }
    let (rook_file, rook_to_file, between) = match mv.to.file() {
        6 => (7, 5, &[5, 6][..]),
        2 => (0, 3, &[1, 2, 3][..]),
        _ => return None,
    };

    let rook = Piece::new(color, PieceKind::Rook);
    let rook_from = Square::from_rank_file(home, rook_file);
    let rook_to = Square::from_rank_file(home, rook_to_file);
    if history.king_has_moved(color) || history.square_disturbed(rook_from) {
        return None;
    }
    if board.get(rook_from) != Some(rook) {
        return None;
    }
    if between
        .iter()
        .any(|file| !board.is_empty_at(Square::from_rank_file(home, *file)))
    {
        return None;
    }
    // The square the king passes over is the one the rook lands on.
    let enemy = color.opposite();
    if [mv.from, rook_to, mv.to]
        .iter()
        .any(|sq| is_attacked(board, *sq, enemy))
    {
        return None;
    }

    Some(Special::Castle {
        rook,
        from: rook_from,
        to: rook_to,
    })
}

fn pawn_move(board: &Board, history: &MoveHistory, color: Color, mv: Move) -> Option<Special> {
    let o = mv.from.offset_to(mv.to);
    let forward = color.forward();

    if o.files == 0 {
        let single = o.ranks == forward && board.is_empty_at(mv.to);
        let double = o.ranks == 2 * forward
            && mv.from.rank() == color.pawn_rank()
            && board.is_empty_at(mv.to)
            && path_clear(board, mv.from, mv.to, unit_step(mv));
        return (single || double).then_some(Special::None);
    }

    if o.ranks != forward || o.files.abs() != 1 {
        return None;
    }
    if let Some(target) = board.get(mv.to) {
        return (target.color != color).then_some(Special::None);
    }

    // En passant: the enemy pawn that just advanced two squares stands beside us.
    let (pawn, square) = history.en_passant_target()?;
    let beside = Square::from_rank_file(mv.from.rank(), mv.to.file());
    (pawn.color != color && square == beside && board.get(beside) == Some(pawn))
        .then_some(Special::EnPassant { pawn, square })
}
