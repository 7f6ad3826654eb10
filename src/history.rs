use crate::moves::*;
use crate::pieces::*;
use crate::squares::*;

/// The ordered list of committed half-moves. Castling and en passant
/// eligibility are derived from it on demand rather than stored as flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        MoveHistory::default()
    }

    pub fn from_records(records: Vec<MoveRecord>) -> Self {
        MoveHistory { records }
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Whether a king of this color has ever moved.
    pub fn king_has_moved(&self, color: Color) -> bool {
        self.records
            .iter()
            .any(|r| r.moved == Piece::new(color, PieceKind::King))
    }

    /// Whether anything has ever left or landed on `square`. For a rook's
    /// corner this means the rook moved away or was captured at home.
    pub fn square_disturbed(&self, square: Square) -> bool {
        self.records
            .iter()
            .any(|r| r.mv.from == square || r.mv.to == square)
    }

    /// If the last half-move was a two-square pawn advance, the square that
    /// pawn now stands on.
    pub fn en_passant_target(&self) -> Option<(Piece, Square)> {
        self.last()
            .filter(|r| r.is_two_square_advance())
            .map(|r| (r.moved, r.mv.to))
    }

    /// The last six half-moves form two pieces shuffling back and forth:
    /// moves 1, 3 and 5 (counting backwards) are the same move alternating
    /// direction, and so are moves 2, 4 and 6.
    pub fn is_threefold_repetition(&self) -> bool {
        if self.records.len() < 6 {
            return false;
        }
        let last = &self.records[self.records.len() - 6..];
        let shuffles = |a: &MoveRecord, b: &MoveRecord, c: &MoveRecord| {
            a.mv == c.mv
                && a.mv == b.mv.reversed()
                && a.moved == b.moved
                && b.moved == c.moved
        };
        shuffles(&last[5], &last[3], &last[1]) && shuffles(&last[4], &last[2], &last[0])
    }

    /// More than `n` half-moves were played and none of the last `n` was a
    /// pawn move or a capture.
    pub fn quiet_for(&self, n: usize) -> bool {
        self.records.len() > n
            && self.records[self.records.len() - n..]
                .iter()
                .all(|r| !r.is_pawn_move() && !r.is_capture())
    }

    /// Every piece taken so far, in the order it was taken.
    pub fn captured_pieces(&self) -> Vec<Piece> {
        self.records
            .iter()
            .filter_map(|r| match r.special {
                Special::EnPassant { pawn, .. } => Some(pawn),
                _ => r.captured,
            })
            .collect()
    }

    /// The game so far in coordinate notation, e.g. `e2e4 e7e5`.
    pub fn notation(&self) -> Vec<String> {
        self.records.iter().map(|r| r.to_string()).collect()
    }
}
