use chess_ai::{ChessAi, SearchError};
use chess_core::{Board, PieceKind, Position, BOARD_SIZE, PLAYER_COUNT};

const DEMO_PLIES: usize = 10;
const SEARCH_DEPTH: u8 = 3;

fn main() {
    env_logger::init();

    let mut board = Board::new();
    let ai = ChessAi::new(SEARCH_DEPTH);

    println!("chessmate: engine vs engine at depth {SEARCH_DEPTH}");
    print_board(&board);

    for ply in 0..DEMO_PLIES {
        let player = ply % PLAYER_COUNT;
        let movement = match ai.select_move(&mut board, player) {
            Ok(movement) => movement,
            Err(SearchError::NoMoves(player)) => {
                println!("player {player} has no move left");
                break;
            }
            Err(error) => {
                println!("search failed: {error}");
                break;
            }
        };
        let mover = board.piece_at(movement.from).unwrap();
        println!(
            "{}. player {player}: {} {} -> {}",
            ply + 1,
            glyph(board.piece(mover).kind, player),
            movement.from,
            movement.to
        );
        board.apply_move(movement);
        print_board(&board);
    }

    for player in 0..PLAYER_COUNT {
        println!(
            "player {player}: {} pieces left, {} lost",
            board.player(player).pieces().len(),
            board.player(player).captured().len()
        );
    }
}

fn print_board(board: &Board) {
    for rank in (0..BOARD_SIZE).rev() {
        print!("{} ", rank + 1);
        for file in 0..BOARD_SIZE {
            match board.piece_at(Position::new(file, rank)) {
                Some(id) => {
                    let piece = board.piece(id);
                    print!(" {}", glyph(piece.kind, piece.owner));
                }
                None => print!(" ."),
            }
        }
        println!();
    }
    println!("   a b c d e f g h");
}

// Uppercase for player 0, lowercase for player 1.
fn glyph(kind: PieceKind, owner: usize) -> char {
    let white = match kind {
        PieceKind::Pawn => 'P',
        PieceKind::Knight => 'N',
        PieceKind::Bishop => 'B',
        PieceKind::Rook => 'R',
        PieceKind::Queen => 'Q',
        PieceKind::King => 'K',
    };
    if owner == 0 {
        white
    } else {
        white.to_ascii_lowercase()
    }
}
