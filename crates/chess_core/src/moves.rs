use crate::{PieceId, Position};

/// A candidate or applied move.
///
/// Capture and destination coincide in this rule set, so a capture is
/// recorded as the captured piece's identity rather than a square. A
/// castling move stores only the king's path; the paired rook move is
/// derived from it on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// The piece standing on `to`, captured when the move is applied.
    pub captured: Option<PieceId>,
    /// A pawn reaching its last rank; it becomes a queen when applied.
    pub promoted: bool,
    /// The king half of a castle.
    pub castling: bool,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            captured: None,
            promoted: false,
            castling: false,
        }
    }

    /// The rook half of a castling move, fully determined by the king's
    /// path: the rook on the corner the king moved towards ends up on the
    /// square the king crossed.
    pub fn castle_rook_move(&self) -> Move {
        let direction = (self.to.file - self.from.file).signum();
        Move::new(
            Position::new(if direction > 0 { 7 } else { 0 }, self.to.rank),
            Position::new(self.to.file - direction, self.to.rank),
        )
    }
}
