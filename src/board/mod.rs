//! One ply of the game: piece placement, side to move, en passant and
//! castling bookkeeping.

mod apply;
mod codec;
mod fen;
mod movegen;
mod square;

pub use apply::{AppliedMove, MoveKind};
pub use codec::RECORD_SIZE;
pub use fen::FenError;
pub use movegen::{CheckState, LegalMove};
pub use square::{Bitboard, NUM_SQUARES, Square, SquareParseError};

use crate::error::ChessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row offset of a single pawn step (White moves towards row 0).
    #[inline]
    pub(crate) const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this color's king and rooks at the start.
    #[inline]
    pub(crate) const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Color::White => "White",
            Color::Black => "Black",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Role; 4] = [Role::Queen, Role::Rook, Role::Bishop, Role::Knight];

    /// Lowercase letter used on the board and in FEN.
    pub const fn char(self) -> char {
        match self {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<Role> {
        match ch.to_ascii_lowercase() {
            'p' => Some(Role::Pawn),
            'n' => Some(Role::Knight),
            'b' => Some(Role::Bishop),
            'r' => Some(Role::Rook),
            'q' => Some(Role::Queen),
            'k' => Some(Role::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(self, Role::Knight | Role::Bishop | Role::Rook | Role::Queen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub role: Role,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, role: Role) -> Self {
        Self { role, color }
    }

    /// Board letter: uppercase for White, lowercase for Black.
    pub const fn char(self) -> char {
        let ch = self.role.char();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn from_char(ch: char) -> Option<Piece> {
        let role = Role::from_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { role, color })
    }
}

/// Which rook a castling move uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// h-file rook
    Kingside,
    /// a-file rook
    Queenside,
}

/// "Has moved" flags for kings and rooks.
///
/// A set bit means the piece has left (or been captured on) its home square.
/// Flags are only ever added during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const BLACK_KING: u8 = 0x01;
    pub const BLACK_A_ROOK: u8 = 0x02;
    pub const BLACK_H_ROOK: u8 = 0x04;
    pub const WHITE_KING: u8 = 0x10;
    pub const WHITE_A_ROOK: u8 = 0x20;
    pub const WHITE_H_ROOK: u8 = 0x40;
    pub const ALL: u8 = 0x77;

    /// Build from raw flags; returns `None` if a bit outside [`Self::ALL`] is set.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn has_moved(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn mark(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub const fn king_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }

    pub const fn rook_flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Queenside) => Self::WHITE_A_ROOK,
            (Color::White, CastleSide::Kingside) => Self::WHITE_H_ROOK,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_A_ROOK,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_H_ROOK,
        }
    }

    /// Neither the king nor the rook of `side` has moved yet.
    pub const fn may_castle(self, color: Color, side: CastleSide) -> bool {
        !self.has_moved(Self::king_flag(color)) && !self.has_moved(Self::rook_flag(color, side))
    }

    /// Flag owned by a king or rook home square.
    pub(crate) fn home_flag(square: Square) -> Option<u8> {
        match square.index() {
            0 => Some(Self::BLACK_A_ROOK),
            4 => Some(Self::BLACK_KING),
            7 => Some(Self::BLACK_H_ROOK),
            56 => Some(Self::WHITE_A_ROOK),
            60 => Some(Self::WHITE_KING),
            63 => Some(Self::WHITE_H_ROOK),
            _ => None,
        }
    }
}

const BACK_RANK: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// Snapshot of the board after one ply.
///
/// A plain value: cloning is a 68-byte copy, so the history stores these
/// directly rather than behind pointers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    cells: [Option<Piece>; NUM_SQUARES],
    turn: Color,
    en_passantable: Option<Square>,
    castling: CastlingRights,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial_position()
    }
}

impl BoardState {
    /// Standard starting layout, White to move.
    pub fn initial_position() -> Self {
        let mut cells = [None; NUM_SQUARES];
        for (file, role) in BACK_RANK.into_iter().enumerate() {
            cells[file] = Some(Piece::new(Color::Black, role));
            cells[8 + file] = Some(Piece::new(Color::Black, Role::Pawn));
            cells[48 + file] = Some(Piece::new(Color::White, Role::Pawn));
            cells[56 + file] = Some(Piece::new(Color::White, role));
        }
        Self {
            cells,
            turn: Color::White,
            en_passantable: None,
            castling: CastlingRights::default(),
        }
    }

    /// A board with no pieces. Castling flags start fully set since no king
    /// or rook stands on its home square.
    pub fn empty(turn: Color) -> Self {
        Self {
            cells: [None; NUM_SQUARES],
            turn,
            en_passantable: None,
            castling: CastlingRights(CastlingRights::ALL),
        }
    }

    /// Builder used for composing test and puzzle positions.
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Self {
        self.cells[square.index()] = Some(piece);
        self
    }

    /// Contents of the square at `index`.
    pub fn piece_at(&self, index: usize) -> Result<Option<Piece>, ChessError> {
        let square = Square::try_from(index)?;
        Ok(self.piece_on(square))
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Square of the pawn that double-pushed on the previous ply.
    #[inline]
    pub fn en_passantable(&self) -> Option<Square> {
        self.en_passantable
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Squares holding a piece of `color`.
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        Square::all()
            .filter(|&sq| self.piece_on(sq).is_some_and(|p| p.color == color))
            .collect()
    }

    /// Iterate over occupied squares with their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_on(sq).map(|p| (sq, p)))
    }

    /// Whether `square` holds a pawn of the side not to move that has just
    /// landed two rows from its start.
    pub(crate) fn holds_double_pushed_pawn(&self, square: Square) -> bool {
        let pushed = self.turn.other();
        let landing_row = (pushed.back_row() as i8 + 3 * pushed.forward()) as u8;
        square.row() == landing_row
            && self.piece_on(square) == Some(Piece::new(pushed, Role::Pawn))
    }
}

impl std::fmt::Debug for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardState")
            .field("fen", &self.to_fen())
            .field("castling", &format_args!("{:#04X}", self.castling.bits()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square is invalid")
    }

    #[test_case("a8", 'r')]
    #[test_case("b8", 'n')]
    #[test_case("d8", 'q')]
    #[test_case("e8", 'k')]
    #[test_case("h7", 'p')]
    #[test_case("a2", 'P')]
    #[test_case("d1", 'Q')]
    #[test_case("e1", 'K')]
    #[test_case("h1", 'R')]
    fn test_initial_position_pieces(square: &str, expected: char) {
        let board = BoardState::initial_position();
        assert_eq!(board.piece_on(sq(square)).map(Piece::char), Some(expected));
    }

    #[test]
    fn test_initial_position_matches_layout_exactly() {
        let board = BoardState::initial_position();
        let layout = concat!(
            "rnbqkbnr",
            "pppppppp",
            "        ",
            "        ",
            "        ",
            "        ",
            "PPPPPPPP",
            "RNBQKBNR",
        );

        for (index, expected) in layout.chars().enumerate() {
            let actual = board.piece_at(index).unwrap().map_or(' ', Piece::char);
            assert_eq!(actual, expected, "mismatch at {}", Square::new(index as u8).unwrap());
        }
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.en_passantable(), None);
        assert_eq!(board.castling_rights().bits(), 0);
    }

    #[test]
    fn test_piece_at_out_of_range() {
        let board = BoardState::initial_position();
        assert_eq!(board.piece_at(64), Err(ChessError::OutOfRange(64)));
    }

    #[test]
    fn test_piece_char_roundtrip() {
        for ch in "pnbrqkPNBRQK".chars() {
            assert_eq!(Piece::from_char(ch).map(Piece::char), Some(ch));
        }
        assert_eq!(Piece::from_char('x'), None);
    }

    #[test]
    fn test_castling_rights_reject_unknown_bits() {
        assert!(CastlingRights::from_bits(0x77).is_some());
        assert!(CastlingRights::from_bits(0x08).is_none());
        assert!(CastlingRights::from_bits(0x80).is_none());
    }

    #[test]
    fn test_may_castle_tracks_king_and_rook() {
        let mut rights = CastlingRights::default();
        rights.mark(CastlingRights::WHITE_H_ROOK);

        assert!(!rights.may_castle(Color::White, CastleSide::Kingside));
        assert!(rights.may_castle(Color::White, CastleSide::Queenside));

        rights.mark(CastlingRights::BLACK_KING);
        assert!(!rights.may_castle(Color::Black, CastleSide::Queenside));
        assert!(!rights.may_castle(Color::Black, CastleSide::Kingside));
    }
}
