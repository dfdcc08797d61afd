//! Forsyth-Edwards Notation for setting up and printing positions.
//!
//! Move clocks are not part of [`BoardState`]; they are accepted on input
//! and written as `0 1`.

use super::{BoardState, CastleSide, CastlingRights, Color, Piece, Square};

/// Error when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("board layout must contain 8 ranks of 8 files")]
    BadLayout,
    #[error("invalid piece character '{0}'")]
    BadPiece(char),
    #[error("side to move must be 'w' or 'b', got '{0}'")]
    BadTurn(String),
    #[error("invalid castling field '{0}'")]
    BadCastling(String),
    #[error("invalid en passant field '{0}'")]
    BadEnPassant(String),
}

impl BoardState {
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut parts = fen.split_whitespace();
        let layout = parts.next().ok_or(FenError::MissingField("board"))?;
        let turn = parts.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = parts.next().ok_or(FenError::MissingField("castling"))?;
        let en_passant = parts.next().ok_or(FenError::MissingField("en passant"))?;

        let turn = match turn {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadTurn(other.to_owned())),
        };

        let mut board = BoardState::empty(turn);
        parse_layout(layout, &mut board)?;
        board.castling = parse_castling(castling)?;
        board.en_passantable = parse_en_passant(en_passant, &board)?;
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(Square::at(file, row)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        let castling: String = [
            ('K', Color::White, CastleSide::Kingside),
            ('Q', Color::White, CastleSide::Queenside),
            ('k', Color::Black, CastleSide::Kingside),
            ('q', Color::Black, CastleSide::Queenside),
        ]
        .into_iter()
        .filter(|&(_, color, side)| self.castling.may_castle(color, side))
        .map(|(ch, _, _)| ch)
        .collect();
        fen.push_str(if castling.is_empty() { "-" } else { castling.as_str() });

        fen.push(' ');
        // FEN names the skipped square, we store the pawn itself.
        match self
            .en_passantable
            .and_then(|pawn| pawn.offset(0, self.turn.forward()))
        {
            Some(target) => fen.push_str(&target.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(" 0 1");
        fen
    }
}

fn parse_layout(layout: &str, board: &mut BoardState) -> Result<(), FenError> {
    let rows: Vec<&str> = layout.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::BadLayout);
    }

    for (row, text) in rows.into_iter().enumerate() {
        let mut file = 0u8;
        for ch in text.chars() {
            if let Some(skip) = ch.to_digit(10) {
                file = file
                    .checked_add(skip as u8)
                    .filter(|f| skip > 0 && *f <= 8)
                    .ok_or(FenError::BadLayout)?;
                continue;
            }
            let piece = Piece::from_char(ch).ok_or(FenError::BadPiece(ch))?;
            let square = Square::from_coords(file, row as u8).ok_or(FenError::BadLayout)?;
            board.cells[square.index()] = Some(piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadLayout);
        }
    }
    Ok(())
}

/// FEN lists remaining rights; we track what has moved, so start from
/// "everything moved" and clear per letter.
fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut bits = CastlingRights::ALL;
    if field == "-" {
        return CastlingRights::from_bits(bits).ok_or(FenError::BadCastling(field.to_owned()));
    }
    for ch in field.chars() {
        let (color, side) = match ch {
            'K' => (Color::White, CastleSide::Kingside),
            'Q' => (Color::White, CastleSide::Queenside),
            'k' => (Color::Black, CastleSide::Kingside),
            'q' => (Color::Black, CastleSide::Queenside),
            _ => return Err(FenError::BadCastling(field.to_owned())),
        };
        bits &= !(CastlingRights::king_flag(color) | CastlingRights::rook_flag(color, side));
    }
    CastlingRights::from_bits(bits).ok_or(FenError::BadCastling(field.to_owned()))
}

fn parse_en_passant(field: &str, board: &BoardState) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let bad = || FenError::BadEnPassant(field.to_owned());
    let target: Square = field.parse().map_err(|_| bad())?;
    // The pawn that double-pushed belongs to the side not on move and sits
    // one step past the target square in its own direction.
    let pawn = target
        .offset(0, board.turn.other().forward())
        .ok_or_else(bad)?;
    if !board.holds_double_pushed_pawn(pawn) {
        return Err(bad());
    }
    Ok(Some(pawn))
}
