pub mod bench;
pub mod board;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod perft;
pub mod search;

pub use bench::{benchmark_search, play_match, MatchConfig, MatchResult, SearchBenchmark};
pub use board::{Board, Color, GameState, Piece, PieceKind, Position};
pub use error::MoveError;
pub use evaluation::{Evaluator, MATE_SCORE};
pub use fen::STARTING_FEN;
pub use game::{AiPlayer, Game, GameResult, HumanPlayer, MoveProvider, RandomPlayer, MAX_REJECTED_MOVES};
pub use movegen::{Move, MoveType};
pub use notation::parse_move;
pub use perft::{divide, perft};
pub use search::{Search, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH};
