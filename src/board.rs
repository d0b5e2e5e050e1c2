use std::fmt;

use crate::movegen::{self, Move, MoveType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Material value in centipawns.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 20000,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        match symbol.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn push. White advances toward row 0.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this side's king and rooks at the start of the game.
    pub fn back_row(&self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn pawn_row(&self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn promotion_row(&self) -> i8 {
        self.opposite().back_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol().to_ascii_uppercase(),
            Color::Black => self.kind.symbol(),
        }
    }
}

/// A (row, col) coordinate. Row 0 is rank 8, col 0 is file a.
///
/// Values outside `0..8` are representable and simply report
/// `is_valid() == false`; the board treats them as "no square".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_valid(&self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Position {
        Position::new(self.row + d_row, self.col + d_col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub side_to_move: Color,
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
    /// Square skipped by a pawn's two-step advance on the previous ply.
    pub en_passant: Option<Position>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            side_to_move: Color::White,
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    /// (kingside, queenside) rights for `color`.
    pub fn castling_rights(&self, color: Color) -> (bool, bool) {
        match color {
            Color::White => (self.white_kingside, self.white_queenside),
            Color::Black => (self.black_kingside, self.black_queenside),
        }
    }

    fn clear_castling(&mut self, color: Color) {
        match color {
            Color::White => {
                self.white_kingside = false;
                self.white_queenside = false;
            }
            Color::Black => {
                self.black_kingside = false;
                self.black_queenside = false;
            }
        }
    }

    fn touch_corner(&mut self, square: Position) {
        match (square.row, square.col) {
            (7, 0) => self.white_queenside = false,
            (7, 7) => self.white_kingside = false,
            (0, 0) => self.black_queenside = false,
            (0, 7) => self.black_kingside = false,
            _ => {}
        }
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    state: GameState,
    move_history: Vec<Move>,
    state_history: Vec<GameState>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position, White to move.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for col in 0..8 {
            let kind = BACK_RANK[col as usize];
            board.set_piece(Position::new(0, col), Some(Piece::new(Color::Black, kind)));
            board.set_piece(Position::new(1, col), Some(Piece::new(Color::Black, PieceKind::Pawn)));
            board.set_piece(Position::new(6, col), Some(Piece::new(Color::White, PieceKind::Pawn)));
            board.set_piece(Position::new(7, col), Some(Piece::new(Color::White, kind)));
        }
        board
    }

    /// A board with no pieces and the default game state.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
            state: GameState::default(),
            move_history: Vec::new(),
            state_history: Vec::new(),
        }
    }

    pub(crate) fn from_parts(squares: [[Option<Piece>; 8]; 8], state: GameState) -> Self {
        Self {
            squares,
            state,
            move_history: Vec::new(),
            state_history: Vec::new(),
        }
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.row as usize][pos.col as usize] = piece;
        }
    }

    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.row as usize][pos.col as usize].take()
    }

    fn relocate(&mut self, from: Position, to: Position) {
        let piece = self.remove_piece(from);
        self.set_piece(to, piece);
    }

    pub fn current_player(&self) -> Color {
        self.state.side_to_move
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replaces the game state wholesale. Used when setting up positions.
    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    pub fn history_len(&self) -> usize {
        self.move_history.len()
    }

    /// Iterates every occupied square in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        (0..8).flat_map(move |row| {
            (0..8).filter_map(move |col| {
                let pos = Position::new(row, col);
                self.piece_at(pos).map(|piece| (pos, piece))
            })
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map(|(pos, _)| pos)
    }

    /// Applies `mv` structurally. Legality is not checked here; callers
    /// filter through [`Board::legal_moves`] first.
    ///
    /// Returns `false` without touching the board when either square is off
    /// the board or `from` is empty.
    pub fn make_move(&mut self, mv: Move) -> bool {
        if !mv.from.is_valid() || !mv.to.is_valid() {
            return false;
        }
        let piece = match self.piece_at(mv.from) {
            Some(piece) => piece,
            None => return false,
        };

        self.state_history.push(self.state);

        let mut recorded = mv;
        let mut captured = self.remove_piece(mv.to);
        let home = piece.color.back_row();

        match mv.move_type {
            MoveType::CastleKingside => {
                self.relocate(mv.from, mv.to);
                self.relocate(Position::new(home, 7), Position::new(home, 5));
            }
            MoveType::CastleQueenside => {
                self.relocate(mv.from, mv.to);
                self.relocate(Position::new(home, 0), Position::new(home, 3));
            }
            MoveType::EnPassant => {
                // The captured pawn sits beside the mover, one row behind `to`
                let victim = Position::new(mv.to.row - piece.color.forward(), mv.to.col);
                captured = self.remove_piece(victim);
                self.relocate(mv.from, mv.to);
            }
            MoveType::Promotion => {
                let kind = match mv.promotion {
                    PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook => mv.promotion,
                    _ => PieceKind::Queen,
                };
                recorded.promotion = kind;
                self.remove_piece(mv.from);
                self.set_piece(mv.to, Some(Piece::new(piece.color, kind)));
            }
            MoveType::Normal => self.relocate(mv.from, mv.to),
        }

        // Castling rights
        if piece.kind == PieceKind::King {
            self.state.clear_castling(piece.color);
        }
        self.state.touch_corner(mv.from);
        self.state.touch_corner(mv.to);

        // En passant target only survives one ply
        self.state.en_passant = if piece.kind == PieceKind::Pawn && (mv.to.row - mv.from.row).abs() == 2 {
            Some(Position::new((mv.from.row + mv.to.row) / 2, mv.from.col))
        } else {
            None
        };

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.state.halfmove_clock = 0;
        } else {
            self.state.halfmove_clock += 1;
        }

        self.state.side_to_move = self.state.side_to_move.opposite();
        if self.state.side_to_move == Color::White {
            self.state.fullmove_number += 1;
        }

        recorded.captured = captured;
        self.move_history.push(recorded);
        true
    }

    /// Reverts the most recent move. Does nothing on an empty history.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_history.pop()?;
        let previous = self.state_history.pop().unwrap_or_default();
        self.state = previous;

        let color = self
            .piece_at(mv.to)
            .map(|piece| piece.color)
            .unwrap_or(previous.side_to_move);
        let home = color.back_row();

        match mv.move_type {
            MoveType::CastleKingside => {
                self.relocate(mv.to, mv.from);
                self.relocate(Position::new(home, 5), Position::new(home, 7));
                self.set_piece(mv.to, mv.captured);
            }
            MoveType::CastleQueenside => {
                self.relocate(mv.to, mv.from);
                self.relocate(Position::new(home, 3), Position::new(home, 0));
                self.set_piece(mv.to, mv.captured);
            }
            MoveType::EnPassant => {
                self.relocate(mv.to, mv.from);
                let victim = Position::new(mv.to.row - color.forward(), mv.to.col);
                self.set_piece(victim, mv.captured);
            }
            MoveType::Promotion => {
                self.remove_piece(mv.to);
                self.set_piece(mv.from, Some(Piece::new(color, PieceKind::Pawn)));
                self.set_piece(mv.to, mv.captured);
            }
            MoveType::Normal => {
                self.relocate(mv.to, mv.from);
                self.set_piece(mv.to, mv.captured);
            }
        }

        Some(mv)
    }

    /// Moves that follow each piece's movement rules, ignoring whether the
    /// mover's king is left in check.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for (pos, piece) in self.pieces() {
            if piece.color == color {
                moves.extend(piece.pseudo_legal_moves(self, pos));
            }
        }
        moves
    }

    /// Pseudo-legal moves that do not leave `color`'s king in check.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut scratch = self.scratch();
        self.pseudo_legal_moves(color)
            .into_iter()
            .filter(|mv| {
                if !scratch.make_move(*mv) {
                    return false;
                }
                let safe = !scratch.is_in_check(color);
                scratch.undo_move();
                safe
            })
            .collect()
    }

    // Copy of the position without the history stacks
    fn scratch(&self) -> Board {
        Board::from_parts(self.squares, self.state)
    }

    pub fn is_square_attacked(&self, pos: Position, by: Color) -> bool {
        movegen::is_square_attacked(self, pos, by)
    }

    /// A board without a king for `color` is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_square_attacked(king, color.opposite()),
            None => false,
        }
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.legal_moves(color).is_empty()
    }
}

/// Equal when piece placement and game state match; history is ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares && self.state == other.state
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                let symbol = self
                    .piece_at(Position::new(row, col))
                    .map(|piece| piece.symbol())
                    .unwrap_or('.');
                write!(f, "{} ", symbol)?;
            }
            writeln!(f, "{}", 8 - row)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::new();
        assert_eq!(board.piece_at(pos(7, 4)), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(board.piece_at(pos(0, 3)), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(board.piece_at(pos(6, 0)), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(board.piece_at(pos(4, 4)), None);
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.current_player(), Color::White);
        assert_eq!(*board.state(), GameState::default());
    }

    #[test]
    fn test_off_board_access() {
        let mut board = Board::new();
        assert_eq!(board.piece_at(pos(-1, -1)), None);
        assert_eq!(board.piece_at(pos(8, 0)), None);
        assert_eq!(board.remove_piece(pos(0, 8)), None);
        board.set_piece(pos(-1, 3), Some(Piece::new(Color::White, PieceKind::Queen)));
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn test_make_move_rejects_bad_input() {
        let mut board = Board::new();
        let before = board.clone();

        assert!(!board.make_move(Move::new(pos(-1, -1), pos(5, 4))));
        assert!(!board.make_move(Move::new(pos(6, 4), pos(8, 4))));
        assert!(!board.make_move(Move::new(pos(4, 4), pos(3, 4))));

        assert_eq!(board, before);
        assert_eq!(board.history_len(), 0);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut board = Board::new();
        assert!(board.undo_move().is_none());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_counters() {
        let mut board = Board::new();
        assert!(board.make_move(Move::new(pos(7, 6), pos(5, 5)))); // Ng1-f3
        assert_eq!(board.state().halfmove_clock, 1);
        assert_eq!(board.state().fullmove_number, 1);
        assert!(board.make_move(Move::new(pos(1, 4), pos(3, 4)))); // e7-e5
        assert_eq!(board.state().halfmove_clock, 0);
        assert_eq!(board.state().fullmove_number, 2);
        assert_eq!(board.current_player(), Color::White);
    }

    #[test]
    fn test_two_step_sets_en_passant_target() {
        let mut board = Board::new();
        board.make_move(Move::new(pos(6, 4), pos(4, 4))); // e2-e4
        assert_eq!(board.state().en_passant, Some(pos(5, 4)));
        board.make_move(Move::new(pos(0, 6), pos(2, 5))); // Ng8-f6
        assert_eq!(board.state().en_passant, None);
    }

    #[test]
    fn test_rook_and_king_moves_clear_rights() {
        let mut board = Board::new();
        board.set_piece(pos(7, 6), None);
        board.set_piece(pos(0, 5), None);

        board.make_move(Move::new(pos(7, 7), pos(7, 6))); // Rh1-g1
        assert!(!board.state().white_kingside);
        assert!(board.state().white_queenside);

        board.make_move(Move::new(pos(0, 4), pos(0, 5))); // Ke8-f8
        assert!(!board.state().black_kingside);
        assert!(!board.state().black_queenside);
        assert!(board.state().white_queenside);
    }

    #[test]
    fn test_display() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 r n b q k b n r 8");
        assert_eq!(lines[5], "4 . . . . . . . . 4");
        assert_eq!(lines[8], "1 R N B Q K B N R 1");
    }

    #[test]
    fn test_missing_king_is_not_check() {
        let mut board = Board::empty();
        board.set_piece(pos(0, 0), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert!(!board.is_in_check(Color::White));
        assert!(!board.is_checkmate(Color::White));
        assert!(board.is_stalemate(Color::White));
    }
}
