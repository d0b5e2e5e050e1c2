use crate::board::{Board, Color, PieceKind};

/// Score of a checkmated position, from the winner's point of view.
pub const MATE_SCORE: i32 = 1_000_000;

pub struct Evaluator {
    // Piece values
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: PieceKind::Pawn.value(),
            knight_value: PieceKind::Knight.value(),
            bishop_value: PieceKind::Bishop.value(),
            rook_value: PieceKind::Rook.value(),
            queen_value: PieceKind::Queen.value(),
            king_value: PieceKind::King.value(),
        }
    }

    /// Material balance seen from `perspective`.
    ///
    /// Terminal positions override the count: a mated opponent is worth
    /// `MATE_SCORE`, being mated `-MATE_SCORE`, and a stalemate on either
    /// side is 0.
    pub fn evaluate(&self, board: &Board, perspective: Color) -> i32 {
        let opponent = perspective.opposite();

        if board.is_checkmate(opponent) {
            return MATE_SCORE;
        }
        if board.is_checkmate(perspective) {
            return -MATE_SCORE;
        }
        if board.is_stalemate(perspective) || board.is_stalemate(opponent) {
            return 0;
        }

        self.material(board, perspective)
    }

    /// Material of `perspective` minus material of the opponent.
    pub fn material(&self, board: &Board, perspective: Color) -> i32 {
        board
            .pieces()
            .map(|(_, piece)| {
                let value = self.piece_value(piece.kind);
                if piece.color == perspective {
                    value
                } else {
                    -value
                }
            })
            .sum()
    }

    fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Position};

    #[test]
    fn test_start_position_is_balanced() {
        let evaluator = Evaluator::new();
        let board = Board::new();
        assert_eq!(evaluator.evaluate(&board, Color::White), 0);
        assert_eq!(evaluator.evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn test_material_difference() {
        let evaluator = Evaluator::new();
        let mut board = Board::new();
        // Remove Black's queen and a white knight
        board.set_piece(Position::new(0, 3), None);
        board.set_piece(Position::new(7, 1), None);
        assert_eq!(evaluator.evaluate(&board, Color::White), 900 - 320);
        assert_eq!(evaluator.evaluate(&board, Color::Black), 320 - 900);
    }

    #[test]
    fn test_checkmate_overrides_material() {
        let evaluator = Evaluator::new();
        // Back rank mate: Black has more material but is mated
        let board = Board::from_fen("R5k1/5ppp/8/8/8/8/8/nn4K1 b - - 0 1").unwrap();
        assert!(board.is_checkmate(Color::Black));
        assert_eq!(evaluator.evaluate(&board, Color::White), MATE_SCORE);
        assert_eq!(evaluator.evaluate(&board, Color::Black), -MATE_SCORE);
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let evaluator = Evaluator::new();
        let mut board = Board::empty();
        board.set_piece(Position::new(0, 0), Some(Piece::new(Color::Black, PieceKind::King)));
        board.set_piece(Position::new(2, 1), Some(Piece::new(Color::White, PieceKind::Queen)));
        board.set_piece(Position::new(2, 2), Some(Piece::new(Color::White, PieceKind::King)));
        assert!(board.is_stalemate(Color::Black));
        assert_eq!(evaluator.evaluate(&board, Color::White), 0);
    }
}
