use crate::board::{Bitboard, BoardState, Role, Square};

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Tap here to move the selected piece
    Destination,
    /// Tapping here captures an opponent piece
    Capture,
    /// The selected piece
    Origin,
    /// King of the side to move, currently in check
    Check,
    /// A piece giving check
    Checker,
}

/// Contains the set of squares and their associated feedback types for the current board state.
///
/// `BoardFeedback` is computed by `compute_feedback()` and consumed by the front end
/// to highlight squares. It is the primary interface between the game logic and
/// whatever renders the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any previous entry
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    /// Returns true if there are no feedback squares to display.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Square, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Square, SquareFeedback)>) -> Self {
        Self { squares }
    }
}

/// Game state information needed to compute feedback
///
/// This trait defines what the feedback system needs from the session.
pub trait FeedbackSource {
    /// Position currently shown
    fn board(&self) -> &BoardState;

    /// Selected square and its cached legal destinations, if a piece is selected
    fn selected(&self) -> Option<(Square, Bitboard)>;
}

/// Compute visual feedback based on current game state.
///
/// - Piece selected: origin plus legal destinations, captures marked apart
/// - Nothing selected, side to move in check: king and checking pieces
/// - Otherwise: nothing
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let board = source.board();

    match source.selected() {
        Some((from, destinations)) => show_destinations_for(board, from, destinations),
        None if board.is_check() => show_check(board),
        None => BoardFeedback::default(),
    }
}

fn show_destinations_for(board: &BoardState, from: Square, destinations: Bitboard) -> BoardFeedback {
    std::iter::once((from, SquareFeedback::Origin))
        .chain(destinations.map(|to| classify_move(board, from, to)))
        .collect::<Vec<_>>()
        .into()
}

fn show_check(board: &BoardState) -> BoardFeedback {
    board
        .king_square(board.turn())
        .map(|king| (king, SquareFeedback::Check))
        .into_iter()
        .chain(board.checkers().map(|sq| (sq, SquareFeedback::Checker)))
        .collect::<Vec<_>>()
        .into()
}

/// Classify a move as either a capture or regular destination
fn classify_move(board: &BoardState, from: Square, to: Square) -> (Square, SquareFeedback) {
    let takes_piece = board.piece_on(to).is_some();
    let en_passant = board.piece_on(from).is_some_and(|p| p.role == Role::Pawn)
        && from.file() != to.file();

    if takes_piece || en_passant {
        (to, SquareFeedback::Capture)
    } else {
        (to, SquareFeedback::Destination)
    }
}
