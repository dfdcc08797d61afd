mod display;
mod script;

pub use display::{DisplayError, TerminalDisplay};
pub use script::{ParseError, ScriptError, ScriptedTaps, TapAction};
