use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};
use std::str::FromStr;

use crate::error::ChessError;

/// Number of squares on the board.
pub const NUM_SQUARES: usize = 64;

/// A single square on the chess board (0-63).
///
/// Squares are laid out row-major starting from Black's back rank:
/// - 0 = a8, 7 = h8
/// - 56 = a1, 63 = h1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a new Square if the index is valid (0-63).
    #[inline]
    pub const fn new(idx: u8) -> Option<Self> {
        if (idx as usize) < NUM_SQUARES {
            Some(Square(idx))
        } else {
            None
        }
    }

    /// Square from a file (0 = a) and row (0 = rank 8).
    #[inline]
    pub const fn from_coords(file: u8, row: u8) -> Option<Self> {
        if file < 8 && row < 8 {
            Some(Square(row * 8 + file))
        } else {
            None
        }
    }

    /// Square from coordinates known to be on the board; out-of-range inputs wrap.
    #[inline]
    pub(crate) const fn at(file: u8, row: u8) -> Self {
        Square((row % 8) * 8 + file % 8)
    }

    /// Returns the internal index value (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File index, 0 = a-file.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Row index, 0 = rank 8.
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Rank number (1-8) as printed in algebraic notation.
    #[inline]
    pub const fn rank(self) -> u8 {
        8 - self.row()
    }

    /// The square `files` to the right and `rows` down, if it stays on the board.
    pub fn offset(self, files: i8, rows: i8) -> Option<Square> {
        let file = i16::from(self.file()) + i16::from(files);
        let row = i16::from(self.row()) + i16::from(rows);
        if (0..8).contains(&file) && (0..8).contains(&row) {
            Square::from_coords(file as u8, row as u8)
        } else {
            None
        }
    }

    /// Iterate over all 64 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).map(Square)
    }
}

impl TryFrom<usize> for Square {
    type Error = ChessError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u8::try_from(index)
            .ok()
            .and_then(Square::new)
            .ok_or(ChessError::OutOfRange(index))
    }
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use chess_session::board::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!(square.index(), 36);
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(SquareParseError::BadRank)?;

        Ok(Square((8 - rank as u8) * 8 + (file as u8 - b'a')))
    }
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    #[error("file must be a-h")]
    BadFile,
    #[error("rank must be 1-8")]
    BadRank,
}

/// A set of squares packed into 64 bits.
///
/// Bit N corresponds to square index N (bit 0 = a8, bit 63 = h1).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Bitboard(value)
    }

    #[inline]
    pub const fn from_square(square: Square) -> Self {
        Bitboard(1 << square.0)
    }

    /// Returns the underlying u64 value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn contains(self, square: Square) -> bool {
        self.0 & (1 << square.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1 << square.0;
    }

    /// Toggles the bit at the given square.
    #[inline]
    pub fn toggle(&mut self, square: Square) {
        self.0 ^= 1 << square.0;
    }

    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest-index square in the set.
    #[inline]
    pub fn first(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square(self.0.trailing_zeros() as u8))
        }
    }

    /// The only square in the set, or `None` if it holds zero or several.
    #[inline]
    pub fn single_square(self) -> Option<Square> {
        if self.0.count_ones() == 1 { self.first() } else { None }
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let square = self.first()?;
        self.0 &= self.0 - 1;
        Some(square)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count(), Some(self.count()))
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for square in iter {
            bb.insert(square);
        }
        bb
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitboard({:#018X})", self.0)
    }
}
