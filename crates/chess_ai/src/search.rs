//! Depth-limited adversarial search: negamax with alpha-beta pruning and
//! capture-first move ordering.
//!
//! The search mutates the board it is given and restores it before
//! returning, one revert per apply in strict stack order. Candidates are
//! the pseudo-legal moves; a move that leaves the own king capturable is
//! punished one ply deeper by the opposing king capture, so no separate
//! legality pass is paid per node.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_core::{movegen, Board, Move};
use log::debug;
use thiserror::Error;

use crate::evaluation::{captures_king, move_score};

// Safely outside every reachable total: totals stay within a few king
// values of zero.
pub const SCORE_INFINITY: i32 = 1_000_000;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// The cancellation token fired; the whole search was abandoned.
    #[error("search cancelled")]
    Cancelled,
    /// The player had no pseudo-legal move to choose from.
    #[error("no move available for player {0}")]
    NoMoves(usize),
}

/// Cooperative cancellation flag shared between a running search and its
/// caller. Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Finds the strongest move for `player`, searching `depth` plies beyond
/// the immediate exchange. The board comes back exactly as it was handed
/// in, also when the search is cancelled midway.
pub fn search_best_move(
    board: &mut Board,
    player: usize,
    depth: u8,
    cancel: &CancelToken,
) -> Result<(Move, i32), SearchError> {
    let (best, score) = negamax(board, player, -SCORE_INFINITY, SCORE_INFINITY, depth, cancel)?;
    let movement = best.ok_or(SearchError::NoMoves(player))?;
    debug!(
        "player {player} depth {depth}: best {}{} scoring {score}",
        movement.from, movement.to
    );
    Ok((movement, score))
}

fn negamax(
    board: &mut Board,
    player: usize,
    alpha: i32,
    beta: i32,
    depth: u8,
    cancel: &CancelToken,
) -> Result<(Option<Move>, i32), SearchError> {
    if cancel.is_cancelled() {
        return Err(SearchError::Cancelled);
    }

    let mut candidates: Vec<(Move, i32)> = movegen::player_pseudo_legal_moves(board, player)
        .into_iter()
        .map(|movement| (movement, move_score(board, movement)))
        .collect();
    // captures and promotions first; the sort is stable, so equal scores
    // keep generation order and ties stay with the first move found
    candidates.sort_by_key(|&(_, score)| -score);

    let mut best = None;
    let mut best_score = -SCORE_INFINITY;
    let mut alpha = alpha;
    for (movement, static_score) in candidates {
        if captures_king(board, movement) {
            return Ok((Some(movement), static_score));
        }
        let total = if depth > 0 {
            board.apply_move(movement);
            // the opponent sees the mover's window negated and shifted by
            // this move's material swing: total = static - reply
            let reply = negamax(
                board,
                1 - player,
                static_score - beta,
                static_score - alpha,
                depth - 1,
                cancel,
            );
            board.revert_move(movement);
            let (_, reply_score) = reply?;
            static_score - reply_score
        } else {
            static_score
        };
        if total > best_score {
            best_score = total;
            best = Some(movement);
        }
        alpha = alpha.max(total);
        if alpha >= beta {
            break;
        }
    }
    Ok((best, best_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{KING_VALUE, PAWN_VALUE, QUEEN_VALUE};
    use chess_core::{PieceKind, Position, BOARD_SIZE};

    fn square(notation: &str) -> Position {
        Position::from_algebraic(notation).unwrap()
    }

    fn layout(board: &Board) -> Vec<(Position, PieceKind, usize)> {
        let mut pieces = Vec::new();
        for rank in 0..BOARD_SIZE {
            for file in 0..BOARD_SIZE {
                let position = Position::new(file, rank);
                if let Some(id) = board.piece_at(position) {
                    let piece = board.piece(id);
                    pieces.push((position, piece.kind, piece.owner));
                }
            }
        }
        pieces
    }

    #[test]
    fn depth_zero_picks_the_best_immediate_capture() {
        let mut board = Board::empty();
        board.add_piece(PieceKind::Queen, 0, square("a1"));
        board.add_piece(PieceKind::Pawn, 1, square("a5"));
        board.add_piece(PieceKind::King, 0, square("h1"));
        board.add_piece(PieceKind::King, 1, square("g8"));

        let (best, score) =
            search_best_move(&mut board, 0, 0, &CancelToken::new()).unwrap();
        assert_eq!(best.to, square("a5"));
        assert_eq!(score, PAWN_VALUE);
    }

    #[test]
    fn a_king_capture_is_decisive_without_recursion() {
        let mut board = Board::empty();
        board.add_piece(PieceKind::Rook, 0, square("e1"));
        board.add_piece(PieceKind::King, 0, square("a1"));
        board.add_piece(PieceKind::King, 1, square("e8"));

        let (best, score) =
            search_best_move(&mut board, 0, 3, &CancelToken::new()).unwrap();
        assert_eq!(best.to, square("e8"));
        assert_eq!(score, KING_VALUE);
    }

    #[test]
    fn promotion_scores_the_queen_upgrade() {
        let mut board = Board::empty();
        board.add_piece(PieceKind::Pawn, 0, square("a7"));
        board.add_piece(PieceKind::King, 0, square("h1"));
        board.add_piece(PieceKind::King, 1, square("h8"));

        let (best, score) =
            search_best_move(&mut board, 0, 0, &CancelToken::new()).unwrap();
        assert!(best.promoted);
        assert_eq!(best.to, square("a8"));
        assert_eq!(score, QUEEN_VALUE - PAWN_VALUE);
    }

    #[test]
    fn depth_one_never_falls_below_the_best_single_capture_line() {
        let mut board = Board::empty();
        board.add_piece(PieceKind::Queen, 0, square("d1"));
        board.add_piece(PieceKind::Knight, 0, square("c3"));
        board.add_piece(PieceKind::King, 0, square("g1"));
        board.add_piece(PieceKind::Pawn, 1, square("d5"));
        board.add_piece(PieceKind::Pawn, 1, square("e6"));
        board.add_piece(PieceKind::King, 1, square("g8"));

        let cancel = CancelToken::new();
        let candidates = movegen::player_pseudo_legal_moves(&board, 0);
        let best_capture = candidates
            .into_iter()
            .max_by_key(|&movement| move_score(&board, movement))
            .unwrap();
        let static_score = move_score(&board, best_capture);
        assert!(static_score > 0);

        board.apply_move(best_capture);
        let (_, reply) = search_best_move(&mut board, 1, 0, &cancel).unwrap();
        board.revert_move(best_capture);
        let capture_line = static_score - reply;

        let (_, score) = search_best_move(&mut board, 0, 1, &cancel).unwrap();
        assert!(score >= capture_line);
    }

    #[test]
    fn pruned_search_matches_a_naive_clone_based_minimax() {
        // the reference searches the same tree with per-node clones and no
        // pruning; the scores must agree exactly
        fn naive_best(board: &Board, player: usize, depth: u8) -> i32 {
            let moves = movegen::player_pseudo_legal_moves(board, player);
            let mut decisive = -SCORE_INFINITY;
            for &movement in &moves {
                if captures_king(board, movement) {
                    decisive = decisive.max(move_score(board, movement));
                }
            }
            if decisive > -SCORE_INFINITY {
                return decisive;
            }
            let mut best = -SCORE_INFINITY;
            for movement in moves {
                let static_score = move_score(board, movement);
                let total = if depth > 0 {
                    let mut continuation = board.clone_live();
                    let mover = continuation.piece_at(movement.from).unwrap();
                    let replayed = movegen::pseudo_legal_moves(&continuation, mover)
                        .into_iter()
                        .find(|candidate| candidate.to == movement.to)
                        .unwrap();
                    continuation.apply_move(replayed);
                    static_score - naive_best(&continuation, 1 - player, depth - 1)
                } else {
                    static_score
                };
                best = best.max(total);
            }
            best
        }

        let mut board = Board::empty();
        board.add_piece(PieceKind::King, 0, square("g1"));
        board.add_piece(PieceKind::Rook, 0, square("a4"));
        board.add_piece(PieceKind::Knight, 0, square("f3"));
        board.add_piece(PieceKind::King, 1, square("g8"));
        board.add_piece(PieceKind::Pawn, 1, square("b4"));
        board.add_piece(PieceKind::Bishop, 1, square("d6"));

        for depth in 0..=2 {
            let expected = naive_best(&board, 0, depth);
            let (_, score) =
                search_best_move(&mut board, 0, depth, &CancelToken::new()).unwrap();
            assert_eq!(score, expected, "depth {depth}");
        }
    }

    #[test]
    fn a_cancelled_token_aborts_before_any_work() {
        let mut board = Board::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            search_best_move(&mut board, 0, 3, &cancel),
            Err(SearchError::Cancelled)
        );
        assert_eq!(layout(&board), layout(&Board::new()));
    }

    #[test]
    fn cancellation_mid_search_still_restores_the_board() {
        let mut board = Board::new();
        let before = layout(&board);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            trigger.cancel();
        });

        // deep enough that the flag fires mid-tree
        let result = search_best_move(&mut board, 0, 6, &cancel);
        canceller.join().unwrap();

        assert_eq!(layout(&board), before);
        assert!(board.player(0).captured().is_empty());
        assert!(board.player(1).captured().is_empty());
        if let Err(error) = result {
            assert_eq!(error, SearchError::Cancelled);
        }
    }

    #[test]
    fn a_player_without_pieces_has_no_move() {
        let mut board = Board::empty();
        board.add_piece(PieceKind::King, 1, square("e8"));
        assert_eq!(
            search_best_move(&mut board, 0, 2, &CancelToken::new()),
            Err(SearchError::NoMoves(0))
        );
    }
}
