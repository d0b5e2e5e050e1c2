use crate::board::Board;
use crate::movegen::Move;

/// Counts leaf nodes of the legal move tree down to `depth`.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(board.current_player());
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        if board.make_move(mv) {
            nodes += perft(board, depth - 1);
            board.undo_move();
        }
    }
    nodes
}

/// Per-move breakdown of [`perft`] for the root position.
pub fn divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    let moves = board.legal_moves(board.current_player());
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        if board.make_move(mv) {
            counts.push((mv, perft(board, depth.saturating_sub(1))));
            board.undo_move();
        }
    }
    counts
}
