use crate::board::{Board, Color, GameState, Piece, PieceKind, Position};
use crate::error::MoveError;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parses a FEN record. The halfmove and fullmove fields may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, MoveError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(malformed(fen, "expected 4 to 6 fields"));
        }

        // Piece placement, rank 8 first
        let mut squares = [[None; 8]; 8];
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(malformed(fen, "expected 8 ranks"));
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for symbol in rank.chars() {
                if let Some(skip) = symbol.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(malformed(fen, "bad empty-square count"));
                    }
                    col += skip as usize;
                    continue;
                }
                let kind = PieceKind::from_symbol(symbol).ok_or_else(|| malformed(fen, "unknown piece"))?;
                let color = if symbol.is_ascii_uppercase() { Color::White } else { Color::Black };
                if col >= 8 {
                    return Err(malformed(fen, "rank too long"));
                }
                squares[row][col] = Some(Piece::new(color, kind));
                col += 1;
            }
            if col != 8 {
                return Err(malformed(fen, "rank does not cover 8 files"));
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(malformed(fen, "side to move must be w or b")),
        };

        let mut state = GameState {
            side_to_move,
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };

        if fields[2] != "-" {
            for right in fields[2].chars() {
                match right {
                    'K' => state.white_kingside = true,
                    'Q' => state.white_queenside = true,
                    'k' => state.black_kingside = true,
                    'q' => state.black_queenside = true,
                    _ => return Err(malformed(fen, "bad castling field")),
                }
            }
        }

        if fields[3] != "-" {
            let target: Position = fields[3].parse()?;
            state.en_passant = Some(target);
        }

        if let Some(halfmove) = fields.get(4) {
            state.halfmove_clock = halfmove.parse().map_err(|_| malformed(fen, "bad halfmove clock"))?;
        }
        if let Some(fullmove) = fields.get(5) {
            state.fullmove_number = fullmove.parse().map_err(|_| malformed(fen, "bad fullmove number"))?;
        }

        Ok(Board::from_parts(squares, state))
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.piece_at(Position::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.symbol());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if row < 7 {
                placement.push('/');
            }
        }

        let state = self.state();
        let side = match state.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        let mut castling = String::new();
        for (allowed, symbol) in [
            (state.white_kingside, 'K'),
            (state.white_queenside, 'Q'),
            (state.black_kingside, 'k'),
            (state.black_queenside, 'q'),
        ] {
            if allowed {
                castling.push(symbol);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = state
            .en_passant
            .map(|square| square.to_string())
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            placement, side, castling, en_passant, state.halfmove_clock, state.fullmove_number
        )
    }
}

fn malformed(fen: &str, reason: &str) -> MoveError {
    MoveError::Malformed(format!("{} in FEN `{}`", reason, fen))
}
