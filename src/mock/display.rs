use std::io::{self, Write};

use crate::BoardDisplay;
use crate::board::{BoardState, Square};
use crate::feedback::{BoardFeedback, SquareFeedback};

/// Terminal-based board display for development and testing.
///
/// Renders the position as an 8×8 grid with ANSI color-coded
/// squares matching the feedback type (destinations, captures, etc.).
#[derive(Debug)]
pub struct TerminalDisplay<W: Write = io::Stdout> {
    out: W,
}

impl TerminalDisplay {
    /// Create a display writing to stdout.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Create a display writing to any writer.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl<W: Write> BoardDisplay for TerminalDisplay<W> {
    type Error = DisplayError;

    fn show(&mut self, board: &BoardState, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render_board(&mut self.out, board, feedback)
    }
}

/// Render the board to any writer, rank 8 first.
fn render_board(
    w: &mut impl Write,
    board: &BoardState,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for (index, square) in Square::all().enumerate() {
        if index % 8 == 0 {
            write!(w, " {} ", square.rank())?;
        }
        let symbol = board.piece_on(square).map_or('·', |piece| piece.char());
        match color_code(feedback.get(square)) {
            Some(code) => write!(w, "\x1b[{code}m {symbol} \x1b[0m")?,
            None => write!(w, " {symbol} ")?,
        }
        if index % 8 == 7 {
            writeln!(w)?;
        }
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    w.flush()?;
    Ok(())
}

/// ANSI background color for a feedback variant.
fn color_code(feedback: Option<SquareFeedback>) -> Option<u8> {
    match feedback? {
        SquareFeedback::Destination => Some(44),
        SquareFeedback::Capture => Some(41),
        SquareFeedback::Origin => Some(42),
        SquareFeedback::Check => Some(45),
        SquareFeedback::Checker => Some(43),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(board: &BoardState, feedback: &BoardFeedback) -> String {
        let mut display = TerminalDisplay::with_writer(Vec::new());
        display
            .show(board, feedback)
            .expect("rendering to buffer should succeed");
        String::from_utf8(display.into_inner()).expect("output should be valid UTF-8")
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn show_initial_board_lists_ranks_top_down() {
        let output = render_to_string(&BoardState::initial_position(), &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with(" 8 "));
        assert!(lines[0].contains(" r  n  b  q  k  b  n  r "));
        assert!(lines[7].starts_with(" 1 "));
        assert!(lines[7].contains(" R  N  B  Q  K  B  N  R "));
        assert_eq!(lines[8], "    a  b  c  d  e  f  g  h");
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e4"), SquareFeedback::Destination);

        let output = render_to_string(&BoardState::initial_position(), &feedback);

        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("d7"), SquareFeedback::Capture);

        let output = render_to_string(&BoardState::initial_position(), &feedback);

        assert!(
            output.contains("\x1b[41m p \x1b[0m"),
            "capture should use red ANSI background"
        );
    }

    #[test]
    fn show_check_and_checker_colors() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e8"), SquareFeedback::Check);
        feedback.set(sq("d8"), SquareFeedback::Checker);

        let output = render_to_string(&BoardState::initial_position(), &feedback);

        assert!(output.contains("\x1b[45m k \x1b[0m"));
        assert!(output.contains("\x1b[43m q \x1b[0m"));
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&BoardState::initial_position(), &BoardFeedback::new());

        assert!(
            !output.contains("\x1b[4"),
            "empty feedback should have no ANSI background codes"
        );
    }
}
