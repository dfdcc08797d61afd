//! Fixed-size save record for a [`BoardState`].
//!
//! Layout (66 bytes):
//! - bytes 0..64: one ASCII cell code per square in index order
//!   (`' '` empty, `pnbrqk` Black, `PNBRQK` White)
//! - byte 64: square index of the en-passant-capturable pawn, `0xFF` for none
//! - byte 65: castling "has moved" flags, plus bit 3 set when Black is to move

use super::{BoardState, CastlingRights, Color, NUM_SQUARES, Piece, Square};
use crate::error::ChessError;

pub const RECORD_SIZE: usize = NUM_SQUARES + 2;

const NO_EN_PASSANT: u8 = 0xFF;
const BLACK_TO_MOVE: u8 = 0x08;
const EMPTY_CELL: u8 = b' ';

impl BoardState {
    pub fn serialize(&self) -> [u8; RECORD_SIZE] {
        let mut record = [EMPTY_CELL; RECORD_SIZE];
        for (byte, cell) in record.iter_mut().zip(self.cells.iter()) {
            if let Some(piece) = cell {
                *byte = piece.char() as u8;
            }
        }
        record[NUM_SQUARES] = self
            .en_passantable
            .map_or(NO_EN_PASSANT, |sq| sq.index() as u8);
        record[NUM_SQUARES + 1] = self.castling.bits()
            | match self.turn {
                Color::White => 0,
                Color::Black => BLACK_TO_MOVE,
            };
        record
    }

    /// Decode a save record, validating every byte.
    pub fn deserialize(record: &[u8]) -> Result<Self, ChessError> {
        let record: &[u8; RECORD_SIZE] = record
            .try_into()
            .map_err(|_| ChessError::InvalidRecord("record must be 66 bytes"))?;

        let flags = record[NUM_SQUARES + 1];
        let turn = if flags & BLACK_TO_MOVE != 0 {
            Color::Black
        } else {
            Color::White
        };
        let castling = CastlingRights::from_bits(flags & !BLACK_TO_MOVE)
            .ok_or(ChessError::InvalidRecord("unknown castling flag bits"))?;

        let mut board = BoardState::empty(turn);
        board.castling = castling;
        for (cell, &byte) in board.cells.iter_mut().zip(record.iter()) {
            *cell = match byte {
                EMPTY_CELL => None,
                code => Some(
                    Piece::from_char(code as char)
                        .ok_or(ChessError::InvalidRecord("unknown cell code"))?,
                ),
            };
        }

        board.en_passantable = match record[NUM_SQUARES] {
            NO_EN_PASSANT => None,
            index => {
                let square = Square::new(index)
                    .ok_or(ChessError::InvalidRecord("en passant index out of range"))?;
                if !board.holds_double_pushed_pawn(square) {
                    return Err(ChessError::InvalidRecord(
                        "en passant square does not hold a double-pushed pawn",
                    ));
                }
                Some(square)
            }
        };

        Ok(board)
    }
}
