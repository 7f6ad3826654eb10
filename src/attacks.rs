use crate::boards::*;
use crate::moves::Move;
use crate::pieces::*;
use crate::rules;
use crate::squares::*;

// ---------------------------------------------------------------------
// Attack detection
// ---------------------------------------------------------------------
//
// A square is attacked when some piece could capture on it. This never asks
// whether the attacker's own king would be exposed, so it cannot recurse into
// check detection.

/// Whether any piece of color `by` attacks `square`.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| attacks(board, from, piece, square))
}

/// Whether `piece` standing on `from` could capture on `target`.
/// Pawns attack diagonally forward whether or not the target is occupied.
pub fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    if from == target {
        return false;
    }
    let mv = Move::new(from, target);
    match piece.kind {
        PieceKind::Pawn => {
            let o = from.offset_to(target);
            o.ranks == piece.color.forward() && o.files.abs() == 1
        }
        PieceKind::Knight => rules::knight_move(mv),
        PieceKind::Bishop => rules::bishop_move(board, mv),
        PieceKind::Rook => rules::rook_move(board, mv),
        PieceKind::Queen => rules::queen_move(board, mv),
        PieceKind::King => rules::king_step(mv),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sq, squares};

    #[test]
    fn test_standard_attacks() {
        let b = Board::standard();
        // Third rank is covered by White pawns and knights.
        assert!(is_attacked(&b, sq!("e3"), Color::White));
        assert!(is_attacked(&b, sq!("f3"), Color::White));
        assert!(!is_attacked(&b, sq!("e4"), Color::White));
        assert!(is_attacked(&b, sq!("f6"), Color::Black));
        assert!(!is_attacked(&b, sq!("e3"), Color::Black));
    }

    #[test]
    fn test_sliders_are_blocked() {
        let b = Board::from_placement("4k3/8/8/8/1q6/8/3P4/4K3").unwrap();
        assert!(is_attacked(&b, sq!("d2"), Color::Black));
        assert!(!is_attacked(&b, sq!("e1"), Color::Black));
        for covered in squares!("c3", "a5", "b1", "h4", "b8") {
            assert!(is_attacked(&b, covered, Color::Black), "{}", covered);
        }
    }

    #[test]
    fn test_pawn_attacks_only_diagonally() {
        let b = Board::from_placement("4k3/8/8/8/4p3/8/8/4K3").unwrap();
        assert!(is_attacked(&b, sq!("d3"), Color::Black));
        assert!(is_attacked(&b, sq!("f3"), Color::Black));
        assert!(!is_attacked(&b, sq!("e3"), Color::Black));
        assert!(!is_attacked(&b, sq!("d5"), Color::Black));
    }

    #[test]
    fn test_king_and_knight_attacks() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/N3K3").unwrap();
        for covered in squares!("b3", "c2", "d1", "d2", "f2", "f1") {
            assert!(is_attacked(&b, covered, Color::White), "{}", covered);
        }
        assert!(!is_attacked(&b, sq!("e3"), Color::White));
        assert!(is_attacked(&b, sq!("d7"), Color::Black));
    }
}
