pub mod ai;
pub mod evaluation;
pub mod search;

pub use ai::ChessAi;
pub use evaluation::{move_score, piece_value};
pub use search::{search_best_move, CancelToken, SearchError};
