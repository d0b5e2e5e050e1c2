use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::board::{Board, Color, PieceKind};
use crate::error::MoveError;
use crate::movegen::{Move, MoveType};
use crate::notation;
use crate::search::{Search, MAX_SEARCH_DEPTH};

/// Rejected moves in a row after which [`Game::run`] gives up on a provider.
pub const MAX_REJECTED_MOVES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub fn is_over(&self) -> bool {
        *self != GameResult::Ongoing
    }
}

/// Anything that can choose a move for one side: a person at a terminal,
/// the search, a script.
pub trait MoveProvider {
    fn get_move(&mut self, board: &Board) -> Result<Move, MoveError>;

    fn color(&self) -> Color;
}

/// Reads coordinate moves (`e2e4`, `e7e8q`) line by line.
pub struct HumanPlayer<R, W> {
    color: Color,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(color: Color, input: R, output: W) -> Self {
        Self { color, input, output }
    }
}

impl<R: BufRead, W: Write> MoveProvider for HumanPlayer<R, W> {
    fn get_move(&mut self, _board: &Board) -> Result<Move, MoveError> {
        write!(self.output, "{} to move: ", self.color)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MoveError::Aborted);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            return Err(MoveError::Aborted);
        }
        notation::parse_move(line)
    }

    fn color(&self) -> Color {
        self.color
    }
}

/// Plays the move chosen by a fixed-depth search.
pub struct AiPlayer {
    color: Color,
    depth: u32,
    search: Search,
}

impl AiPlayer {
    /// `depth` is clamped to `1..=MAX_SEARCH_DEPTH`.
    pub fn new(color: Color, depth: u32) -> Self {
        Self {
            color,
            depth: depth.clamp(1, MAX_SEARCH_DEPTH),
            search: Search::new(),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth.clamp(1, MAX_SEARCH_DEPTH);
    }
}

impl MoveProvider for AiPlayer {
    fn get_move(&mut self, board: &Board) -> Result<Move, MoveError> {
        info!(color = %self.color, depth = self.depth, "searching");
        let mv = self.search.select_move(board, self.color, self.depth)?;
        info!(color = %self.color, best_move = %mv, nodes = self.search.nodes_searched(), "search finished");
        Ok(mv)
    }

    fn color(&self) -> Color {
        self.color
    }
}

/// Picks uniformly among the legal moves. Handy as a sparring partner.
pub struct RandomPlayer {
    color: Color,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(color: Color, seed: u64) -> Self {
        Self {
            color,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveProvider for RandomPlayer {
    fn get_move(&mut self, board: &Board) -> Result<Move, MoveError> {
        let moves = board.legal_moves(self.color);
        moves
            .choose(&mut self.rng)
            .copied()
            .ok_or(MoveError::NoLegalMoves(self.color))
    }

    fn color(&self) -> Color {
        self.color
    }
}

/// One game: the board plus the result state machine.
pub struct Game {
    board: Board,
    result: GameResult,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// Starts from an arbitrary position. A position that is already mate or
    /// stalemate starts out finished.
    pub fn from_board(board: Board) -> Self {
        let mut game = Self {
            board,
            result: GameResult::Ongoing,
        };
        game.update_result();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Validates `mv` against the legal moves of the side to move, applies
    /// the matching legal move and updates the result.
    ///
    /// `mv` only needs the right squares: the legal move's type is adopted,
    /// except that a requested promotion piece is kept.
    pub fn play_move(&mut self, mv: Move) -> Result<Move, MoveError> {
        if self.result.is_over() {
            return Err(MoveError::Illegal(format!("{}: the game is over", mv)));
        }
        if mv.move_type == MoveType::Promotion
            && !matches!(
                mv.promotion,
                PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
            )
        {
            return Err(MoveError::Illegal(format!("{}: cannot promote to {:?}", mv, mv.promotion)));
        }

        let side = self.board.current_player();
        let resolved = self
            .board
            .legal_moves(side)
            .into_iter()
            .find(|legal| {
                legal.same_squares(&mv)
                    && (mv.move_type != MoveType::Promotion || legal.move_type == MoveType::Promotion)
            })
            .map(|legal| {
                if mv.move_type == MoveType::Promotion {
                    Move::new_promotion(legal.from, legal.to, mv.promotion)
                } else {
                    legal
                }
            })
            .ok_or_else(|| MoveError::Illegal(format!("{} is not legal for {}", mv, side)))?;

        if !self.board.make_move(resolved) {
            return Err(MoveError::Illegal(format!("{} could not be applied", resolved)));
        }
        self.update_result();
        Ok(resolved)
    }

    /// Asks `provider` for a move and plays it. The provider must play the
    /// side to move.
    pub fn step(&mut self, provider: &mut dyn MoveProvider) -> Result<Move, MoveError> {
        let to_move = self.board.current_player();
        if provider.color() != to_move {
            return Err(MoveError::OutOfTurn {
                provider: provider.color(),
                to_move,
            });
        }
        let mv = provider.get_move(&self.board)?;
        self.play_move(mv)
    }

    /// Alternates between the two providers until the game ends, `max_plies`
    /// moves have been played, or a provider fails for good. Malformed and
    /// illegal moves are logged and the same provider is asked again, up to
    /// [`MAX_REJECTED_MOVES`] times in a row.
    pub fn run(
        &mut self,
        white: &mut dyn MoveProvider,
        black: &mut dyn MoveProvider,
        max_plies: Option<u32>,
        mut on_move: impl FnMut(&Board, &Move),
    ) -> Result<GameResult, MoveError> {
        let mut plies = 0;
        let mut rejected = 0;
        while !self.result.is_over() {
            if max_plies.is_some_and(|limit| plies >= limit) {
                info!(plies, "ply limit reached");
                break;
            }

            let provider: &mut dyn MoveProvider = match self.board.current_player() {
                Color::White => &mut *white,
                Color::Black => &mut *black,
            };
            match self.step(provider) {
                Ok(mv) => {
                    plies += 1;
                    rejected = 0;
                    info!(ply = plies, played = %mv, "move played");
                    on_move(&self.board, &mv);
                }
                Err(err @ (MoveError::Malformed(_) | MoveError::Illegal(_))) => {
                    rejected += 1;
                    warn!(error = %err, rejected, "move rejected");
                    if rejected >= MAX_REJECTED_MOVES {
                        return Err(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        if self.result.is_over() {
            info!(result = ?self.result, "game over");
        }
        Ok(self.result)
    }

    fn update_result(&mut self) {
        let side = self.board.current_player();
        self.result = if self.board.is_checkmate(side) {
            match side {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }
        } else if self.board.is_stalemate(side) {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        };
    }
}
