use crate::PieceId;

pub const PLAYER_COUNT: usize = 2;

/// One side of the game: its identity and the identity of every piece it
/// owns, split into live and captured. A piece is always in exactly one of
/// the two lists.
#[derive(Debug, Clone)]
pub struct Player {
    id: usize,
    pieces: Vec<PieceId>,
    captured: Vec<PieceId>,
}

impl Player {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            pieces: Vec::new(),
            captured: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    /// Maps a rank relative to this player's forward direction to an
    /// absolute board rank. The map is its own inverse, so it also converts
    /// absolute ranks back to relative ones.
    ///
    /// Relative rank 0 is the home rank (king and rooks), 1 the pawn rank,
    /// 7 the promotion rank.
    pub fn transform_y(&self, relative_rank: i8) -> i8 {
        self.id as i8 * 7 + relative_rank * (1 - 2 * self.id as i8)
    }

    pub(crate) fn add_piece(&mut self, id: PieceId) {
        self.pieces.push(id);
    }

    pub(crate) fn capture_piece(&mut self, id: PieceId) {
        self.pieces.retain(|&piece| piece != id);
        self.captured.push(id);
    }

    pub(crate) fn restore_piece(&mut self, id: PieceId) {
        self.captured.retain(|&piece| piece != id);
        self.pieces.push(id);
    }
}
