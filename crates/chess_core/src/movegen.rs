//! Pseudo-legal and legal move enumeration.
//!
//! Pseudo-legal moves respect movement patterns and occupancy only; legal
//! moves additionally survive the king-safety filter, which speculatively
//! applies each candidate and asks whether any opposing reply could then
//! capture a king.

use crate::board::BOARD_SIZE;
use crate::{Board, Move, Piece, PieceId, PieceKind, Position};

const KING_START_FILE: i8 = 4;
const ROOK_START_FILES: [i8; 2] = [0, 7];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Every move `piece` may make under its movement pattern and the board's
/// occupancy, ignoring whether the mover's king ends up capturable.
pub fn pseudo_legal_moves(board: &Board, id: PieceId) -> Vec<Move> {
    let mut moves = Vec::new();
    match board.piece(id).kind {
        PieceKind::Pawn => pawn_moves(board, id, &mut moves),
        PieceKind::Knight => step_moves(board, id, &KNIGHT_OFFSETS, 1, &mut moves),
        PieceKind::Bishop => step_moves(board, id, &BISHOP_DIRECTIONS, BOARD_SIZE - 1, &mut moves),
        PieceKind::Rook => step_moves(board, id, &ROOK_DIRECTIONS, BOARD_SIZE - 1, &mut moves),
        PieceKind::Queen => step_moves(board, id, &QUEEN_DIRECTIONS, BOARD_SIZE - 1, &mut moves),
        PieceKind::King => {
            step_moves(board, id, &QUEEN_DIRECTIONS, 1, &mut moves);
            castle_moves(board, id, &mut moves);
        }
    }
    moves
}

/// Every move `piece` may make that does not leave its own king capturable
/// afterwards.
pub fn legal_moves(board: &mut Board, id: PieceId) -> Vec<Move> {
    let mut options = pseudo_legal_moves(board, id);
    options.retain(|&option| !exposes_king(board, option));
    options
}

/// Pseudo-legal moves of every live piece `player` owns.
pub fn player_pseudo_legal_moves(board: &Board, player: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    for &id in board.player(player).pieces() {
        moves.extend(pseudo_legal_moves(board, id));
    }
    moves
}

/// Legal moves of every live piece `player` owns.
pub fn player_legal_moves(board: &mut Board, player: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    // the filter mutates and restores the board, so snapshot the live list
    let ids: Vec<PieceId> = board.player(player).pieces().to_vec();
    for id in ids {
        moves.extend(legal_moves(board, id));
    }
    moves
}

/// Speculatively applies `movement` and asks whether the mover's opponent
/// could then capture a king. The board is restored before returning.
pub fn exposes_king(board: &mut Board, movement: Move) -> bool {
    let mover = board.piece_at(movement.from).unwrap();
    let player = board.piece(mover).owner;
    board.apply_move(movement);
    let exposed = can_capture_king(board, 1 - player);
    board.revert_move(movement);
    exposed
}

/// Whether any pseudo-legal move of `attacker` captures a king.
pub fn can_capture_king(board: &Board, attacker: usize) -> bool {
    for &id in board.player(attacker).pieces() {
        for movement in pseudo_legal_moves(board, id) {
            if let Some(captured) = movement.captured {
                if board.piece(captured).kind == PieceKind::King {
                    return true;
                }
            }
        }
    }
    false
}

// Builds the move record for `piece` landing on `to`, picking up the
// capture and promotion flags from the destination.
fn candidate(board: &Board, piece: &Piece, to: Position) -> Move {
    Move {
        from: piece.position,
        to,
        captured: board.piece_at(to),
        promoted: piece.kind == PieceKind::Pawn
            && to.rank == board.player(piece.owner).transform_y(7),
        castling: false,
    }
}

fn pawn_moves(board: &Board, id: PieceId, moves: &mut Vec<Move>) {
    let piece = board.piece(id);
    let owner = board.player(piece.owner);
    let direction = if piece.owner == 1 { -1 } else { 1 };

    // walk forward; two squares from an untouched home rank, blocked
    // immediately by any occupant
    let steps = if piece.position.rank == owner.transform_y(1) {
        2
    } else {
        1
    };
    let mut to = piece.position;
    for _ in 0..steps {
        to = to.offset(0, direction);
        if !Board::contains(to) || board.is_occupied(to) {
            break;
        }
        moves.push(candidate(board, piece, to));
    }

    // diagonal capture only, never a quiet move
    for file_delta in [-1, 1] {
        let to = piece.position.offset(file_delta, direction);
        if !Board::contains(to) {
            continue;
        }
        if let Some(occupant) = board.piece_at(to) {
            if board.piece(occupant).owner != piece.owner {
                moves.push(candidate(board, piece, to));
            }
        }
    }
}

// Shared walker for knights (single step on jump offsets), kings (single
// step on all directions) and sliders (up to seven steps). A friendly
// occupant excludes the square; any occupant stops a slider.
fn step_moves(
    board: &Board,
    id: PieceId,
    directions: &[(i8, i8)],
    max_steps: i8,
    moves: &mut Vec<Move>,
) {
    let piece = board.piece(id);
    for &(file_delta, rank_delta) in directions {
        for step in 1..=max_steps {
            let to = piece.position.offset(file_delta * step, rank_delta * step);
            if !Board::contains(to) {
                break;
            }
            match board.piece_at(to) {
                Some(occupant) => {
                    if board.piece(occupant).owner != piece.owner {
                        moves.push(candidate(board, piece, to));
                    }
                    break;
                }
                None => moves.push(candidate(board, piece, to)),
            }
        }
    }
}

// Castling candidates: a king still on file 4 of its home rank, a
// same-owner rook on a corner of that rank, and every square strictly
// between them empty. Whether either piece has moved before is not
// tracked; a king or rook that returned to its start square counts as
// untouched.
fn castle_moves(board: &Board, id: PieceId, moves: &mut Vec<Move>) {
    let piece = board.piece(id);
    let home_rank = board.player(piece.owner).transform_y(0);
    if piece.position.file != KING_START_FILE || piece.position.rank != home_rank {
        return;
    }
    'rooks: for rook_file in ROOK_START_FILES {
        let corner = board.piece_at(Position::new(rook_file, home_rank));
        let rook = match corner {
            Some(occupant) => board.piece(occupant),
            None => continue,
        };
        if rook.kind != PieceKind::Rook || rook.owner != piece.owner {
            continue;
        }
        let step = (rook_file - KING_START_FILE).signum();
        let mut file = KING_START_FILE + step;
        while file != rook_file {
            if board.is_occupied(Position::new(file, home_rank)) {
                continue 'rooks;
            }
            file += step;
        }
        moves.push(Move {
            from: piece.position,
            to: Position::new(KING_START_FILE + 2 * step, home_rank),
            captured: None,
            promoted: false,
            castling: true,
        });
    }
}
