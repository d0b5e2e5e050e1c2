use crate::board::Color;
use std::io;

/// Errors surfaced by move parsing, validation and selection.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// Text or coordinates that do not describe a square or move
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A well-formed move that is not in the legal move set
    #[error("illegal move: {0}")]
    Illegal(String),

    /// The side to move has nothing to play
    #[error("no legal moves available for {0}")]
    NoLegalMoves(Color),

    /// A provider was asked to move for the other side
    #[error("{provider} provider asked to move while {to_move} is to move")]
    OutOfTurn { provider: Color, to_move: Color },

    /// The move provider gave up (quit command or end of input)
    #[error("move input aborted")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
