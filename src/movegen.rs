use crate::board::{Board, Color, Piece, PieceKind, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    Normal,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
}

/// A move descriptor.
///
/// `captured` is only filled in on the copy that [`Board::make_move`] pushes
/// onto the board's history, so that [`Board::undo_move`] can put the piece
/// back. It does not take part in equality.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub move_type: MoveType,
    pub promotion: PieceKind,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self::with_type(from, to, MoveType::Normal)
    }

    pub fn with_type(from: Position, to: Position, move_type: MoveType) -> Self {
        Self {
            from,
            to,
            move_type,
            promotion: PieceKind::Queen,
            captured: None,
        }
    }

    pub fn new_en_passant(from: Position, to: Position) -> Self {
        Self::with_type(from, to, MoveType::EnPassant)
    }

    pub fn new_promotion(from: Position, to: Position, promotion: PieceKind) -> Self {
        Self {
            promotion,
            ..Self::with_type(from, to, MoveType::Promotion)
        }
    }

    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.move_type == other.move_type
            && self.promotion == other.promotion
    }
}

impl Eq for Move {}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl Piece {
    /// Destinations this piece may reach from `pos` under its own movement
    /// rules. The mover's king safety is not considered, except that a king
    /// in check is never offered castling.
    pub fn pseudo_legal_moves(&self, board: &Board, pos: Position) -> Vec<Move> {
        let mut moves = Vec::new();
        match self.kind {
            PieceKind::Pawn => pawn_moves(board, pos, self.color, &mut moves),
            PieceKind::Knight => step_moves(board, pos, self.color, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::Bishop => ray_moves(board, pos, self.color, &DIAGONALS, &mut moves),
            PieceKind::Rook => ray_moves(board, pos, self.color, &ORTHOGONALS, &mut moves),
            PieceKind::Queen => {
                ray_moves(board, pos, self.color, &DIAGONALS, &mut moves);
                ray_moves(board, pos, self.color, &ORTHOGONALS, &mut moves);
            }
            PieceKind::King => {
                step_moves(board, pos, self.color, &KING_OFFSETS, &mut moves);
                castling_moves(board, pos, self.color, &mut moves);
            }
        }
        moves
    }
}

fn pawn_moves(board: &Board, pos: Position, color: Color, moves: &mut Vec<Move>) {
    let forward = color.forward();
    let promotion_row = color.promotion_row();
    let advance = |to: Position| {
        if to.row == promotion_row {
            Move::new_promotion(pos, to, PieceKind::Queen)
        } else {
            Move::new(pos, to)
        }
    };

    // Pushes
    let one = pos.offset(forward, 0);
    if one.is_valid() && board.piece_at(one).is_none() {
        moves.push(advance(one));

        let two = pos.offset(2 * forward, 0);
        if pos.row == color.pawn_row() && board.piece_at(two).is_none() {
            moves.push(Move::new(pos, two));
        }
    }

    // Captures
    for d_col in [-1, 1] {
        let target = pos.offset(forward, d_col);
        if !target.is_valid() {
            continue;
        }
        match board.piece_at(target) {
            Some(piece) if piece.color != color => moves.push(advance(target)),
            None if board.state().en_passant == Some(target) => {
                // Only the side facing the pawn that just advanced may take it
                let victim = target.offset(-forward, 0);
                if board.piece_at(victim) == Some(Piece::new(color.opposite(), PieceKind::Pawn)) {
                    moves.push(Move::new_en_passant(pos, target));
                }
            }
            _ => {}
        }
    }
}

fn step_moves(board: &Board, pos: Position, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(d_row, d_col) in offsets {
        let target = pos.offset(d_row, d_col);
        if !target.is_valid() {
            continue;
        }
        match board.piece_at(target) {
            Some(piece) if piece.color == color => {}
            _ => moves.push(Move::new(pos, target)),
        }
    }
}

fn ray_moves(board: &Board, pos: Position, color: Color, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(d_row, d_col) in directions {
        let mut target = pos.offset(d_row, d_col);
        while target.is_valid() {
            match board.piece_at(target) {
                None => moves.push(Move::new(pos, target)),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(pos, target));
                    }
                    break;
                }
            }
            target = target.offset(d_row, d_col);
        }
    }
}

fn castling_moves(board: &Board, pos: Position, color: Color, moves: &mut Vec<Move>) {
    let row = color.back_row();
    if pos != Position::new(row, 4) || board.is_in_check(color) {
        return;
    }

    let (kingside, queenside) = board.state().castling_rights(color);
    let enemy = color.opposite();
    let rook_home = |col: i8| board.piece_at(Position::new(row, col)) == Some(Piece::new(color, PieceKind::Rook));
    let empty = |cols: &[i8]| cols.iter().all(|&col| board.piece_at(Position::new(row, col)).is_none());
    let safe = |cols: &[i8]| cols.iter().all(|&col| !board.is_square_attacked(Position::new(row, col), enemy));

    // Kingside: f and g files must be empty and unattacked
    if kingside && rook_home(7) && empty(&[5, 6]) && safe(&[5, 6]) {
        moves.push(Move::with_type(pos, Position::new(row, 6), MoveType::CastleKingside));
    }

    // Queenside: b, c and d files empty, the king only crosses c and d
    if queenside && rook_home(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
        moves.push(Move::with_type(pos, Position::new(row, 2), MoveType::CastleQueenside));
    }
}

/// Whether any piece of `attacker` could capture on `square`.
///
/// Kings count as one-step attackers and castling is never an attack.
pub fn is_square_attacked(board: &Board, square: Position, attacker: Color) -> bool {
    let is_attacker = |pos: Position, kinds: &[PieceKind]| {
        matches!(board.piece_at(pos), Some(piece) if piece.color == attacker && kinds.contains(&piece.kind))
    };

    // Pawns attack diagonally forward, so look one row behind the square
    let pawn_row = -attacker.forward();
    if is_attacker(square.offset(pawn_row, -1), &[PieceKind::Pawn])
        || is_attacker(square.offset(pawn_row, 1), &[PieceKind::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(d_row, d_col)| is_attacker(square.offset(d_row, d_col), &[PieceKind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(d_row, d_col)| is_attacker(square.offset(d_row, d_col), &[PieceKind::King]))
    {
        return true;
    }

    // Sliders: the first piece met along each ray decides
    let rays = DIAGONALS
        .iter()
        .map(|dir| (dir, [PieceKind::Bishop, PieceKind::Queen]))
        .chain(ORTHOGONALS.iter().map(|dir| (dir, [PieceKind::Rook, PieceKind::Queen])));
    for (&(d_row, d_col), kinds) in rays {
        let mut pos = square.offset(d_row, d_col);
        while pos.is_valid() {
            if board.piece_at(pos).is_some() {
                if is_attacker(pos, &kinds) {
                    return true;
                }
                break;
            }
            pos = pos.offset(d_row, d_col);
        }
    }

    false
}
