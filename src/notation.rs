//! Coordinate notation: squares as `e4`, moves as `e2e4` or `e7e8q`.
//!
//! Only the text boundary lives here. A parsed move carries squares and an
//! optional promotion piece; callers reconcile it with the board's legal
//! moves to learn whether it is a castle, en passant and so on.

use std::fmt;
use std::str::FromStr;

use crate::board::{PieceKind, Position};
use crate::error::MoveError;
use crate::movegen::{Move, MoveType};

impl FromStr for Position {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(MoveError::Malformed(format!("invalid square `{}`", s)));
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) {
            return Err(MoveError::Malformed(format!("invalid file in `{}`", s)));
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(MoveError::Malformed(format!("invalid rank in `{}`", s)));
        }

        let col = (file - b'a') as i8;
        let row = 8 - (rank - b'0') as i8;
        Ok(Position::new(row, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "-");
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = 8 - self.row;
        write!(f, "{}{}", file, rank)
    }
}

/// Parses `from` + `to` with an optional promotion letter (`q`, `r`, `b`,
/// `n`, any case). A promotion letter produces a `Promotion` move, anything
/// else a `Normal` one.
pub fn parse_move(text: &str) -> Result<Move, MoveError> {
    let text = text.trim();
    if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
        return Err(MoveError::Malformed(format!("expected a move like e2e4, got `{}`", text)));
    }

    let from: Position = text[0..2].parse()?;
    let to: Position = text[2..4].parse()?;

    match text[4..].chars().next() {
        None => Ok(Move::new(from, to)),
        Some(symbol) => match PieceKind::from_symbol(symbol) {
            Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
                Ok(Move::new_promotion(from, to, kind))
            }
            _ => Err(MoveError::Malformed(format!("invalid promotion piece `{}`", symbol))),
        },
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.move_type == MoveType::Promotion {
            write!(f, "{}", self.promotion.symbol())?;
        }
        Ok(())
    }
}
