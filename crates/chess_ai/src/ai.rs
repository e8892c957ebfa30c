use chess_core::{Board, Move};
use log::info;

use crate::search::{search_best_move, CancelToken, SearchError};

const MIN_DEPTH: u8 = 1;
const MAX_DEPTH: u8 = 6;
const DEFAULT_DEPTH: u8 = 3;

/// Engine front-end for a computer-controlled player: a fixed search depth
/// and nothing else. The engine holds no game state, so one instance can
/// serve any number of boards and turns.
#[derive(Debug, Clone)]
pub struct ChessAi {
    depth: u8,
}

impl ChessAi {
    pub fn new(depth: u8) -> Self {
        ChessAi {
            depth: depth.clamp(MIN_DEPTH, MAX_DEPTH),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Searches and returns the move the engine would play. The board is
    /// left exactly as it was handed in.
    pub fn select_move(&self, board: &mut Board, player: usize) -> Result<Move, SearchError> {
        self.select_move_with(board, player, &CancelToken::new())
    }

    /// Like `select_move`, but cancellable from another thread through
    /// `cancel`.
    pub fn select_move_with(
        &self,
        board: &mut Board,
        player: usize,
        cancel: &CancelToken,
    ) -> Result<Move, SearchError> {
        let (movement, score) = search_best_move(board, player, self.depth, cancel)?;
        info!(
            "player {player} plays {}{} (score {score})",
            movement.from, movement.to
        );
        Ok(movement)
    }
}

impl Default for ChessAi {
    fn default() -> Self {
        ChessAi {
            depth: DEFAULT_DEPTH,
        }
    }
}
