use std::collections::VecDeque;

use thiserror::Error;

use crate::board::{Role, Square};
use crate::error::ChessError;
use crate::game_logic::{GameSession, Tap};

/// One scripted player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Tap(Square),
    Promote(Role),
    Undo,
    Redo,
}

/// Error when parsing a tap script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid script token: '{0}'")]
pub struct ParseError(String);

/// A scripted action the session rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{action:?} failed: {source}")]
pub struct ScriptError {
    pub action: TapAction,
    pub source: ChessError,
}

/// A scriptable stand-in for a touch front end.
///
/// Queues actions parsed from a script and replays them into a
/// [`GameSession`] on demand. New script can be appended at any time.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTaps {
    pending: VecDeque<TapAction>,
}

impl ScriptedTaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and queue additional script.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "e2", "a1") and mean a tap
    /// - `=Q`, `=n`, ... choose a promotion piece
    /// - `<` undo, `>` redo
    /// - Spaces and periods only separate
    ///
    /// Examples:
    /// - `"e2e4."` - Tap e2, then e4
    /// - `"e2 e4. e7 e5."` - Two moves
    /// - `"b7 b8 =N"` - Promote to a knight
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let actions = parse_script(script)?;
        self.pending.extend(actions);
        Ok(())
    }

    /// Next pending action, if any.
    #[inline]
    pub fn tick(&mut self) -> Option<TapAction> {
        self.pending.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Execute all pending actions, calling the provided callback for each.
    pub fn drain<F>(&mut self, mut on_tick: F)
    where
        F: FnMut(TapAction),
    {
        while let Some(action) = self.tick() {
            on_tick(action);
        }
    }

    /// Replay pending actions into `session`, stopping at the first rejection.
    ///
    /// Returns the result of the last action if it was a tap or promotion, and
    /// `None` if the script ended with undo or redo. Actions after a rejected
    /// one stay queued.
    pub fn play(&mut self, session: &mut GameSession) -> Result<Option<Tap>, ScriptError> {
        let mut last = None;
        while let Some(action) = self.tick() {
            let result = match action {
                TapAction::Tap(square) => session.select(square.index()).map(Some),
                TapAction::Promote(role) => session.promote(role).map(|r| Some(Tap::Moved(r))),
                TapAction::Undo => session.undo().map(|_| None),
                TapAction::Redo => session.redo().map(|_| None),
            };
            match result {
                Ok(tap) => last = tap,
                Err(source) => return Err(ScriptError { action, source }),
            }
        }
        Ok(last)
    }
}

/// Parse a tap script into actions.
fn parse_script(script: &str) -> Result<Vec<TapAction>, ParseError> {
    let mut actions = Vec::new();
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => flush_token(&mut current_token, &mut actions)?,
            c if c.is_whitespace() => flush_token(&mut current_token, &mut actions)?,
            '<' | '>' if current_token.is_empty() => {
                actions.push(if ch == '<' {
                    TapAction::Undo
                } else {
                    TapAction::Redo
                });
            }
            _ => {
                current_token.push(ch);

                // Squares and promotion choices are exactly 2 characters
                if current_token.chars().count() == 2 {
                    flush_token(&mut current_token, &mut actions)?;
                }
            }
        }
    }

    // Flush any remaining token
    flush_token(&mut current_token, &mut actions)?;
    Ok(actions)
}

/// Convert the current token to an action and clear it.
fn flush_token(token: &mut String, actions: &mut Vec<TapAction>) -> Result<(), ParseError> {
    if token.is_empty() {
        return Ok(());
    }
    let action = match token.strip_prefix('=') {
        Some(piece) => piece
            .chars()
            .next()
            .and_then(Role::from_char)
            .map(TapAction::Promote),
        None => token.parse::<Square>().ok().map(TapAction::Tap),
    };
    actions.push(action.ok_or_else(|| ParseError(token.clone()))?);
    token.clear();
    Ok(())
}
