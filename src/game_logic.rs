use std::fmt;

use crate::BoardDisplay;
use crate::board::{
    AppliedMove, Bitboard, BoardState, CheckState, Color, MoveKind, Piece, RECORD_SIZE, Role,
    Square,
};
use crate::config::SessionConfig;
use crate::error::ChessError;
use crate::feedback::{BoardFeedback, FeedbackSource, compute_feedback};
use crate::history::GameHistory;

/// What the player has picked on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// A piece of the side to move is selected; its destinations are cached
    /// until the selection changes.
    PieceSelected {
        square: Square,
        destinations: Bitboard,
    },
    /// A pawn was sent to the far row and waits for a promotion piece.
    PromotionPending { from: Square, to: Square },
}

/// Result of tapping a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    /// A piece was (re)selected; highlight these destinations
    Highlight(Bitboard),
    /// Selection cleared, nothing to highlight
    Cleared,
    /// The selected piece moved
    Moved(MoveReport),
    /// Show the promotion picker, then call [`GameSession::promote`]
    AwaitingPromotion { from: Square, to: Square },
}

impl Tap {
    /// Squares to highlight after this tap.
    pub fn highlight(&self) -> Bitboard {
        match self {
            Tap::Highlight(destinations) => *destinations,
            Tap::AwaitingPromotion { to, .. } => Bitboard::from_square(*to),
            Tap::Cleared | Tap::Moved(_) => Bitboard::EMPTY,
        }
    }
}

/// Everything the front end needs to show after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub mover: Color,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    /// Check status of the opponent, who is now to move
    pub outcome: CheckState,
}

/// Move label data: whose turn, how many plies, check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub turn: Color,
    pub ply: usize,
    pub outcome: CheckState,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            CheckState::None => write!(f, "{} to move", self.turn),
            CheckState::Check => write!(f, "{} to move (check)", self.turn),
            CheckState::Checkmate => write!(f, "Checkmate, {} wins", self.turn.other()),
            CheckState::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// A game in progress: timeline, selection and save slots.
///
/// Every method either succeeds or leaves the session exactly as it was.
pub struct GameSession {
    config: SessionConfig,
    history: GameHistory,
    selection: SelectionState,
    slots: Vec<Option<[u8; RECORD_SIZE]>>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::from_position(BoardState::initial_position(), config)
    }

    /// Creates a session starting from an existing position.
    pub fn from_position(board: BoardState, config: SessionConfig) -> Self {
        let slots = vec![None; config.save_slots];
        Self {
            config,
            history: GameHistory::new(board),
            selection: SelectionState::Idle,
            slots,
        }
    }

    /// Start over from the initial position. Save slots are kept.
    pub fn new_game(&mut self) {
        log::info!("new game");
        self.restart_from(BoardState::initial_position());
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        self.history.current()
    }

    #[inline]
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    #[inline]
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            turn: self.board().turn(),
            ply: self.history.current_index(),
            outcome: self.board().outcome(),
        }
    }

    /// Pieces of `color` taken so far on the current timeline.
    pub fn captured(&self, color: Color) -> Vec<Piece> {
        self.history.captured_pieces(color)
    }

    /// Handle a tap on the square at `index`.
    ///
    /// - Idle: a piece of the side to move becomes selected
    /// - Selected, same square: deselect
    /// - Selected, legal destination: move (or ask for a promotion piece)
    /// - Selected, another own piece: reselect
    /// - Anything else clears the selection
    pub fn select(&mut self, index: usize) -> Result<Tap, ChessError> {
        let square = Square::try_from(index)?;
        log::debug!("tap {square} while {:?}", self.selection);

        match self.selection {
            SelectionState::PromotionPending { .. } => Err(ChessError::PromotionPending),
            SelectionState::PieceSelected { square: from, .. } if from == square => {
                self.selection = SelectionState::Idle;
                Ok(Tap::Cleared)
            }
            SelectionState::PieceSelected {
                square: from,
                destinations,
            } if destinations.contains(square) => self.tap_destination(from, square),
            _ => Ok(self.pick_up(square)),
        }
    }

    /// Apply a move directly, bypassing the selection flow.
    pub fn make_move(
        &mut self,
        from: usize,
        to: usize,
        promotion: Option<Role>,
    ) -> Result<MoveReport, ChessError> {
        if let SelectionState::PromotionPending { .. } = self.selection {
            return Err(ChessError::PromotionPending);
        }
        let from = Square::try_from(from)?;
        let to = Square::try_from(to)?;
        self.commit(from, to, promotion)
    }

    /// Finish a pending promotion with the chosen piece.
    pub fn promote(&mut self, role: Role) -> Result<MoveReport, ChessError> {
        let SelectionState::PromotionPending { from, to } = self.selection else {
            return Err(ChessError::NothingToPromote);
        };
        self.commit(from, to, Some(role))
    }

    /// Abandon a pending promotion; the pawn stays where it was.
    pub fn cancel_promotion(&mut self) -> bool {
        if let SelectionState::PromotionPending { .. } = self.selection {
            self.selection = SelectionState::Idle;
            true
        } else {
            false
        }
    }

    pub fn undo(&mut self) -> Result<&BoardState, ChessError> {
        self.ensure_no_pending_promotion()?;
        self.history.undo()?;
        self.selection = SelectionState::Idle;
        log::debug!("undo to ply {}", self.history.current_index());
        Ok(self.history.current())
    }

    pub fn redo(&mut self) -> Result<&BoardState, ChessError> {
        self.ensure_no_pending_promotion()?;
        self.history.redo()?;
        self.selection = SelectionState::Idle;
        log::debug!("redo to ply {}", self.history.current_index());
        Ok(self.history.current())
    }

    /// Highlights for the current selection or check.
    pub fn feedback(&self) -> BoardFeedback {
        compute_feedback(self)
    }

    /// Push the current board and feedback to a display.
    pub fn render<D: BoardDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        display.show(self.board(), &self.feedback())
    }

    /// Save record of the current board.
    pub fn serialize_board(&self) -> [u8; RECORD_SIZE] {
        self.board().serialize()
    }

    /// Replace the game with one starting from a decoded save record.
    pub fn deserialize_board(&mut self, record: &[u8]) -> Result<(), ChessError> {
        let board = BoardState::deserialize(record)?;
        self.restart_from(board);
        Ok(())
    }

    /// Store the current board in save slot `slot`.
    pub fn save(&mut self, slot: usize) -> Result<(), ChessError> {
        let record = self.serialize_board();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(ChessError::NoSuchSlot(slot))?;
        *entry = Some(record);
        log::info!("saved ply {} to slot {slot}", self.history.current_index());
        Ok(())
    }

    /// Restart from the board stored in save slot `slot`.
    pub fn load(&mut self, slot: usize) -> Result<(), ChessError> {
        let record = self
            .slots
            .get(slot)
            .ok_or(ChessError::NoSuchSlot(slot))?
            .ok_or(ChessError::EmptySlot(slot))?;
        self.deserialize_board(&record)?;
        log::info!("loaded slot {slot}");
        Ok(())
    }

    /// One title per save slot, for the load screen picker.
    pub fn slot_titles(&self) -> Vec<String> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let summary = slot
                    .as_ref()
                    .and_then(|record| BoardState::deserialize(record).ok())
                    .map_or_else(
                        || "empty".to_owned(),
                        |board| format!("{} to move", board.turn()),
                    );
                format!("Slot {}: {summary}", index + 1)
            })
            .collect()
    }

    fn restart_from(&mut self, board: BoardState) {
        self.history = GameHistory::new(board);
        self.selection = SelectionState::Idle;
    }

    fn ensure_no_pending_promotion(&self) -> Result<(), ChessError> {
        match self.selection {
            SelectionState::PromotionPending { .. } => Err(ChessError::PromotionPending),
            _ => Ok(()),
        }
    }

    fn pick_up(&mut self, square: Square) -> Tap {
        let board = self.board();
        if board.piece_on(square).is_some_and(|p| p.color == board.turn()) {
            let destinations = board.valid_moves(square);
            self.selection = SelectionState::PieceSelected {
                square,
                destinations,
            };
            Tap::Highlight(destinations)
        } else {
            self.selection = SelectionState::Idle;
            Tap::Cleared
        }
    }

    fn tap_destination(&mut self, from: Square, to: Square) -> Result<Tap, ChessError> {
        if !self.board().is_promotion(from, to) {
            return self.commit(from, to, None).map(Tap::Moved);
        }
        match self.config.auto_promotion {
            Some(role) => self.commit(from, to, Some(role)).map(Tap::Moved),
            None => {
                self.selection = SelectionState::PromotionPending { from, to };
                Ok(Tap::AwaitingPromotion { from, to })
            }
        }
    }

    fn commit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Result<MoveReport, ChessError> {
        let mover = self.board().turn();
        let AppliedMove {
            state,
            captured,
            kind,
        } = self.board().play(from, to, promotion)?;

        self.history.record(state, captured);
        self.selection = SelectionState::Idle;

        let report = MoveReport {
            mover,
            from,
            to,
            captured,
            kind,
            outcome: state.outcome(),
        };
        log::debug!("{mover} played {from}{to} ({kind:?}), now {:?}", report.outcome);
        Ok(report)
    }
}

impl FeedbackSource for GameSession {
    fn board(&self) -> &BoardState {
        self.history.current()
    }

    fn selected(&self) -> Option<(Square, Bitboard)> {
        match self.selection {
            SelectionState::Idle => None,
            SelectionState::PieceSelected {
                square,
                destinations,
            } => Some((square, destinations)),
            SelectionState::PromotionPending { from, to } => {
                Some((from, Bitboard::from_square(to)))
            }
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("position", &self.board().to_fen())
            .field("ply", &self.history.current_index())
            .field("cached", &self.history.cached_count())
            .field("selection", &self.selection)
            .finish()
    }
}
