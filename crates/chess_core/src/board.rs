use std::collections::HashMap;

use log::debug;

use crate::movegen;
use crate::player::PLAYER_COUNT;
use crate::{Move, Piece, PieceId, PieceKind, Player, Position};

pub const BOARD_SIZE: i8 = 8;

/// The full game position: an 8x8 square map, the arena owning every piece
/// ever placed, and the two players' live/captured bookkeeping.
///
/// Invariants: a square holds at most one piece; a live piece's recorded
/// position equals the square it is stored under; every piece sits in
/// exactly one of its owner's two lists. The board is only mutated through
/// [`apply_move`]/[`revert_move`] (and the setup helpers), which preserve
/// all three.
///
/// [`apply_move`]: Board::apply_move
/// [`revert_move`]: Board::revert_move
#[derive(Debug)]
pub struct Board {
    squares: HashMap<Position, PieceId>,
    pieces: Vec<Piece>,
    players: [Player; PLAYER_COUNT],
}

impl Board {
    /// A board with the standard 32-piece starting layout.
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    /// A board with no pieces at all. Combine with [`add_piece`] to build
    /// arbitrary positions.
    ///
    /// [`add_piece`]: Board::add_piece
    pub fn empty() -> Self {
        Self {
            squares: HashMap::new(),
            pieces: Vec::new(),
            players: [Player::new(0), Player::new(1)],
        }
    }

    fn setup_initial_position(&mut self) {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for player in 0..PLAYER_COUNT {
            let home_rank = self.players[player].transform_y(0);
            let pawn_rank = self.players[player].transform_y(1);
            for (file, &kind) in back_rank.iter().enumerate() {
                self.add_piece(kind, player, Position::new(file as i8, home_rank));
            }
            for file in 0..BOARD_SIZE {
                self.add_piece(PieceKind::Pawn, player, Position::new(file, pawn_rank));
            }
        }
    }

    /// Places a new piece and returns its handle. Panics if the square is
    /// already taken.
    pub fn add_piece(&mut self, kind: PieceKind, owner: usize, position: Position) -> PieceId {
        let id = PieceId(self.pieces.len() as u32);
        self.pieces.push(Piece {
            kind,
            position,
            owner,
        });
        let previous = self.squares.insert(position, id);
        assert!(previous.is_none(), "two pieces on {position}");
        self.players[owner].add_piece(id);
        id
    }

    /// True iff both axes lie on the board.
    pub fn contains(position: Position) -> bool {
        position.file >= 0
            && position.file < BOARD_SIZE
            && position.rank >= 0
            && position.rank < BOARD_SIZE
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.squares.contains_key(&position)
    }

    pub fn piece_at(&self, position: Position) -> Option<PieceId> {
        self.squares.get(&position).copied()
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub fn player(&self, id: usize) -> &Player {
        &self.players[id]
    }

    /// A piece is alive while the square it last stood on still holds that
    /// exact piece. Callers holding a handle from an earlier turn use this
    /// to detect that the piece has since been captured.
    pub fn is_alive(&self, id: PieceId) -> bool {
        self.piece_at(self.pieces[id.index()].position) == Some(id)
    }

    /// An independent copy of the live position. Captured pieces are not
    /// carried over, and handles from this board do not resolve on the
    /// copy: the clone explores a hypothetical continuation, it does not
    /// preserve history.
    pub fn clone_live(&self) -> Board {
        let mut clone = Board::empty();
        for player in 0..PLAYER_COUNT {
            for &id in self.players[player].pieces() {
                let piece = self.piece(id);
                clone.add_piece(piece.kind, player, piece.position);
            }
        }
        clone
    }

    /// Executes a move produced by the generator. A captured piece moves to
    /// its owner's captured list, a promoting pawn becomes a queen, and a
    /// castling king drags its rook along via the derived rook move.
    pub fn apply_move(&mut self, movement: Move) {
        let id = self.squares.remove(&movement.from).unwrap();
        if let Some(captured) = movement.captured {
            let owner = self.pieces[captured.index()].owner;
            self.players[owner].capture_piece(captured);
        }
        self.squares.insert(movement.to, id);
        self.pieces[id.index()].position = movement.to;
        if movement.promoted {
            self.pieces[id.index()].kind = PieceKind::Queen;
        } else if movement.castling {
            self.apply_move(movement.castle_rook_move());
        }
    }

    /// Exact inverse of [`apply_move`]: reverting what was just applied
    /// restores the previous position, captured bookkeeping included.
    ///
    /// [`apply_move`]: Board::apply_move
    pub fn revert_move(&mut self, movement: Move) {
        let id = self.squares.remove(&movement.to).unwrap();
        if let Some(captured) = movement.captured {
            let owner = self.pieces[captured.index()].owner;
            let position = self.pieces[captured.index()].position;
            self.players[owner].restore_piece(captured);
            self.squares.insert(position, captured);
        }
        self.squares.insert(movement.from, id);
        self.pieces[id.index()].position = movement.from;
        if movement.promoted {
            self.pieces[id.index()].kind = PieceKind::Pawn;
        } else if movement.castling {
            self.revert_move(movement.castle_rook_move());
        }
    }

    /// Validates `destination` against the piece's legal moves and applies
    /// the matching one. Returns false, without mutating anything, when the
    /// destination is off the board or not reachable.
    pub fn try_move(&mut self, piece: PieceId, destination: Position) -> bool {
        if Board::contains(destination) {
            for option in movegen::legal_moves(self, piece) {
                if option.to == destination {
                    self.apply_move(option);
                    return true;
                }
            }
        }
        debug!(
            "rejected move of {:?} from {} to {}",
            self.piece(piece).kind,
            self.piece(piece).position,
            destination
        );
        false
    }
}
