use super::{BoardState, CastlingRights, Piece, Role, Square};
use crate::error::ChessError;

/// How a move changed the board, beyond relocating one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    /// Pawn advanced two rows and may be taken en passant next ply
    DoublePush,
    EnPassant,
    CastleKingside,
    CastleQueenside,
    /// Pawn replaced on the far row, with or without a capture
    Promotion,
}

/// Result of applying a move: the next board and the piece removed from play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub state: BoardState,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
}

impl BoardState {
    /// Validate and apply a move given as raw square indices.
    pub fn apply_move(
        &self,
        from: usize,
        to: usize,
        promotion: Option<Role>,
    ) -> Result<AppliedMove, ChessError> {
        let from = Square::try_from(from)?;
        let to = Square::try_from(to)?;
        self.play(from, to, promotion)
    }

    /// Validate and apply a move.
    ///
    /// `promotion` is required exactly when a pawn reaches the far row, and must
    /// name a knight, bishop, rook or queen. `self` is never modified.
    pub fn play(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<AppliedMove, ChessError> {
        if !self.valid_moves(from).contains(to) {
            return Err(ChessError::IllegalMove { from, to });
        }
        match (self.is_promotion(from, to), promotion) {
            (true, Some(role)) if role.is_promotion_choice() => {}
            (false, None) => {}
            _ => return Err(ChessError::InvalidPromotion { from, to }),
        }
        Ok(self.play_unchecked(from, to, promotion))
    }

    /// Apply a move without checking legality.
    ///
    /// Also used for king-safety probes, where a promoting pawn may arrive
    /// without a promotion piece and simply stays a pawn.
    pub(crate) fn play_unchecked(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> AppliedMove {
        let mut next = *self;
        let Some(piece) = next.cells[from.index()].take() else {
            return AppliedMove {
                state: *self,
                captured: None,
                kind: MoveKind::Quiet,
            };
        };

        let mut captured = next.cells[to.index()].take();
        let mut kind = if captured.is_some() {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        };
        next.en_passantable = None;

        match piece.role {
            Role::Pawn if from.file() != to.file() && captured.is_none() => {
                let victim = Square::at(to.file(), from.row());
                captured = next.cells[victim.index()].take();
                kind = MoveKind::EnPassant;
            }
            Role::Pawn if from.row().abs_diff(to.row()) == 2 => {
                next.en_passantable = Some(to);
                kind = MoveKind::DoublePush;
            }
            Role::King if from.file().abs_diff(to.file()) == 2 => {
                let row = from.row();
                let (rook_from, rook_to) = if to.file() > from.file() {
                    kind = MoveKind::CastleKingside;
                    (Square::at(7, row), Square::at(5, row))
                } else {
                    kind = MoveKind::CastleQueenside;
                    (Square::at(0, row), Square::at(3, row))
                };
                next.cells[rook_to.index()] = next.cells[rook_from.index()].take();
                if let Some(flag) = CastlingRights::home_flag(rook_from) {
                    next.castling.mark(flag);
                }
            }
            _ => {}
        }

        let placed = match promotion {
            Some(role) if self.is_promotion(from, to) => {
                kind = MoveKind::Promotion;
                Piece::new(piece.color, role)
            }
            _ => piece,
        };
        next.cells[to.index()] = Some(placed);

        for square in [from, to] {
            if let Some(flag) = CastlingRights::home_flag(square) {
                next.castling.mark(flag);
            }
        }
        next.turn = piece.color.other();

        AppliedMove {
            state: next,
            captured,
            kind,
        }
    }
}
