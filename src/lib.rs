pub mod board;
pub mod config;
pub mod error;
pub mod feedback;
pub mod game_logic;
pub mod history;
pub mod mock;
pub mod screen;

pub use error::ChessError;

/// Trait for displaying the board and its highlights to the player.
///
/// Abstracts over whatever front end hosts the game (a touch UI, a
/// terminal), providing a uniform interface for the output side of the
/// session. The session never draws anything itself.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the given position and feedback state on the display.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants
    /// to front-end specific output (square borders, terminal colors, etc.).
    fn show(
        &mut self,
        board: &board::BoardState,
        feedback: &feedback::BoardFeedback,
    ) -> Result<(), Self::Error>;
}
