use crate::board::{BoardState, Color, Piece};
use crate::error::ChessError;

/// One entry on the timeline: the board after a ply and what that ply captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    state: BoardState,
    captured: Option<Piece>,
}

/// Linear undo/redo timeline of board snapshots.
///
/// Entry 0 is the starting position and is never removed. Undo and redo only
/// move the cursor; redo-able entries are discarded when a new state is
/// pushed while the cursor is behind the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHistory {
    entries: Vec<Entry>,
    cursor: usize,
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::new(BoardState::initial_position())
    }
}

impl GameHistory {
    pub fn new(initial: BoardState) -> Self {
        Self {
            entries: vec![Entry {
                state: initial,
                captured: None,
            }],
            cursor: 0,
        }
    }

    /// Append `state` after the cursor, dropping any redo-able tail.
    #[inline]
    pub fn push(&mut self, state: BoardState) {
        self.record(state, None);
    }

    /// Like [`push`](Self::push), remembering the piece the ply captured.
    pub fn record(&mut self, state: BoardState, captured: Option<Piece>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Entry { state, captured });
        self.cursor += 1;
    }

    /// Step back one ply.
    pub fn undo(&mut self) -> Result<&BoardState, ChessError> {
        if !self.can_undo() {
            return Err(ChessError::NoHistory);
        }
        self.cursor -= 1;
        Ok(self.current())
    }

    /// Step forward one ply along the previously undone timeline.
    pub fn redo(&mut self) -> Result<&BoardState, ChessError> {
        if !self.can_redo() {
            return Err(ChessError::NoHistory);
        }
        self.cursor += 1;
        Ok(self.current())
    }

    #[inline]
    pub fn current(&self) -> &BoardState {
        &self.entries[self.cursor].state
    }

    /// Plies played up to the cursor.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Number of redo-able states beyond the cursor.
    #[inline]
    pub fn cached_count(&self) -> usize {
        self.entries.len() - 1 - self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the starting position is never removed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Pieces of `color` captured on the timeline up to the cursor, oldest first.
    pub fn captured_pieces(&self, color: Color) -> Vec<Piece> {
        self.entries[1..=self.cursor]
            .iter()
            .filter_map(|entry| entry.captured)
            .filter(|piece| piece.color == color)
            .collect()
    }
}
