use tracing::debug;

use crate::board::{Board, Color};
use crate::error::MoveError;
use crate::evaluation::{Evaluator, MATE_SCORE};
use crate::movegen::Move;

/// Depth used when the caller does not pick one.
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;
/// Upper bound applied by move providers; branching grows too fast beyond it.
pub const MAX_SEARCH_DEPTH: u32 = 3;

/// Depth-limited minimax with alpha-beta pruning.
///
/// Scores are always from White's point of view: White maximizes, Black
/// minimizes. Moves are tried in generation order and the first of several
/// equally scored moves wins.
pub struct Search {
    evaluator: Evaluator,
    nodes_searched: u64,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::new())
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            nodes_searched: 0,
        }
    }

    /// Picks the best move for `color`, looking `depth` plies ahead.
    pub fn select_move(&mut self, board: &Board, color: Color, depth: u32) -> Result<Move, MoveError> {
        self.nodes_searched = 0;

        let moves = board.legal_moves(color);
        if moves.is_empty() {
            return Err(MoveError::NoLegalMoves(color));
        }

        // White's move is answered by a minimizing Black and vice versa
        let reply_maximizing = color == Color::Black;
        let mut scratch = board.clone();
        let mut best: Option<(Move, i32)> = None;

        for mv in moves {
            if !scratch.make_move(mv) {
                continue;
            }
            let score = self.minimax(&mut scratch, depth.saturating_sub(1), i32::MIN, i32::MAX, reply_maximizing);
            scratch.undo_move();

            let improves = match best {
                None => true,
                Some((_, best_score)) => match color {
                    Color::White => score > best_score,
                    Color::Black => score < best_score,
                },
            };
            if improves {
                best = Some((mv, score));
            }
        }

        let (best_move, best_score) = best.ok_or(MoveError::NoLegalMoves(color))?;
        debug!(
            color = %color,
            depth,
            best_move = %best_move,
            score = best_score,
            nodes = self.nodes_searched,
            "move selected"
        );
        Ok(best_move)
    }

    /// Scores `board` by searching `depth` plies. The board is returned to
    /// its original state before this function returns.
    pub fn minimax(&mut self, board: &mut Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board, Color::White);
        }

        let side = board.current_player();
        let moves = board.legal_moves(side);
        if moves.is_empty() {
            if board.is_in_check(side) {
                return if maximizing { -MATE_SCORE } else { MATE_SCORE };
            }
            return 0;
        }

        if maximizing {
            let mut best_score = i32::MIN;
            for mv in moves {
                board.make_move(mv);
                let score = self.minimax(board, depth - 1, alpha, beta, false);
                board.undo_move();

                best_score = best_score.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best_score
        } else {
            let mut best_score = i32::MAX;
            for mv in moves {
                board.make_move(mv);
                let score = self.minimax(board, depth - 1, alpha, beta, true);
                board.undo_move();

                best_score = best_score.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best_score
        }
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    // Reference search without pruning, returns (score, nodes)
    fn plain_minimax(evaluator: &Evaluator, board: &mut Board, depth: u32, maximizing: bool) -> (i32, u64) {
        if depth == 0 {
            return (evaluator.evaluate(board, Color::White), 1);
        }
        let side = board.current_player();
        let moves = board.legal_moves(side);
        if moves.is_empty() {
            let score = match (board.is_in_check(side), maximizing) {
                (true, true) => -MATE_SCORE,
                (true, false) => MATE_SCORE,
                (false, _) => 0,
            };
            return (score, 1);
        }
        let mut nodes = 1;
        let mut scores = Vec::new();
        for mv in moves {
            board.make_move(mv);
            let (score, sub_nodes) = plain_minimax(evaluator, board, depth - 1, !maximizing);
            board.undo_move();
            nodes += sub_nodes;
            scores.push(score);
        }
        let best = if maximizing {
            scores.into_iter().max()
        } else {
            scores.into_iter().min()
        };
        (best.unwrap_or(0), nodes)
    }

    #[test]
    fn test_white_finds_back_rank_mate() {
        let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut search = Search::new();
        let mv = search.select_move(&board, Color::White, 2).unwrap();
        assert_eq!(mv.from, Position::new(7, 0));
        assert_eq!(mv.to, Position::new(0, 0));
    }

    #[test]
    fn test_black_finds_back_rank_mate() {
        let board = Board::from_fen("r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        let mut search = Search::new();
        let mv = search.select_move(&board, Color::Black, 1).unwrap();
        assert_eq!(mv.from, Position::new(0, 0));
        assert_eq!(mv.to, Position::new(7, 0));
    }

    #[test]
    fn test_grabs_hanging_queen() {
        // White knight on c3 can take an undefended queen on d5
        let board = Board::from_fen("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1").unwrap();
        let mut search = Search::new();
        let mv = search.select_move(&board, Color::White, 1).unwrap();
        assert_eq!(mv.from, Position::new(5, 2));
        assert_eq!(mv.to, Position::new(3, 3));
    }

    #[test]
    fn test_no_legal_moves_is_an_error() {
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let mut search = Search::new();
        let result = search.select_move(&board, Color::Black, 2);
        assert!(matches!(result, Err(MoveError::NoLegalMoves(Color::Black))));
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let mut board = Board::new();
        board.make_move(Move::new(Position::new(6, 4), Position::new(4, 4)));
        let before = board.clone();
        let mut search = Search::new();
        search.select_move(&board, Color::Black, 2).unwrap();
        assert_eq!(board, before);

        let mut scratch = board.clone();
        search.minimax(&mut scratch, 2, i32::MIN, i32::MAX, false);
        assert_eq!(scratch, before);
        assert_eq!(scratch.history_len(), 1);
    }

    #[test]
    fn test_minimax_is_deterministic() {
        let board = Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3").unwrap();
        let mut search = Search::new();
        let first = search.minimax(&mut board.clone(), 2, i32::MIN, i32::MAX, true);
        let second = search.minimax(&mut board.clone(), 2, i32::MIN, i32::MAX, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pruning_matches_plain_minimax() {
        let positions = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1",
            "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
        ];
        let evaluator = Evaluator::new();
        for fen in positions {
            let board = Board::from_fen(fen).unwrap();
            let mut search = Search::new();
            let pruned = search.minimax(&mut board.clone(), 2, i32::MIN, i32::MAX, true);
            let (plain, plain_nodes) = plain_minimax(&evaluator, &mut board.clone(), 2, true);
            assert_eq!(pruned, plain, "score differs for {}", fen);
            assert!(search.nodes_searched() <= plain_nodes);
        }
    }
}
