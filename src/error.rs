use crate::board::Square;

/// Errors reported by board, history and session operations.
///
/// Every operation that returns one of these leaves its receiver unchanged,
/// so the caller can keep displaying the current position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// Square index outside 0-63
    #[error("square index {0} is out of range (0-63)")]
    OutOfRange(usize),

    /// Destination is not among the legal moves of the piece
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    /// Promotion piece missing on a promoting move, given on a non-promoting
    /// move, or not one of knight/bishop/rook/queen
    #[error("invalid promotion for move {from}{to}")]
    InvalidPromotion { from: Square, to: Square },

    /// Undo or redo past the recorded timeline
    #[error("no history in that direction")]
    NoHistory,

    /// A save record that does not decode to a board
    #[error("invalid board record: {0}")]
    InvalidRecord(&'static str),

    /// A pawn is waiting for its promotion piece
    #[error("a promotion choice is pending")]
    PromotionPending,

    /// A promotion piece was chosen while no pawn was waiting for one
    #[error("no promotion is pending")]
    NothingToPromote,

    /// Save slot index beyond the configured number of slots
    #[error("save slot {0} does not exist")]
    NoSuchSlot(usize),

    /// Loading from a slot nothing was saved to
    #[error("save slot {0} is empty")]
    EmptySlot(usize),
}
