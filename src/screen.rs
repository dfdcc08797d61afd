/// Which screen the front end is showing.
///
/// Owned and advanced by the UI layer; the session never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayState {
    #[default]
    DisplayingGame,
    DisplayingPromotionScreen,
    DisplayingLoadScreen,
}

/// UI events that move between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenEvent {
    PromotionRequested,
    PromotionChosen,
    PromotionCancelled,
    LoadRequested,
    LoadFinished,
}

impl DisplayState {
    /// Screen after `event`. Events that do not apply to the current screen
    /// leave it unchanged.
    pub fn next(self, event: ScreenEvent) -> Self {
        use DisplayState::*;
        use ScreenEvent::*;

        match (self, event) {
            (DisplayingGame, PromotionRequested) => DisplayingPromotionScreen,
            (DisplayingGame, LoadRequested) => DisplayingLoadScreen,
            (DisplayingPromotionScreen, PromotionChosen | PromotionCancelled) => DisplayingGame,
            (DisplayingLoadScreen, LoadFinished) => DisplayingGame,
            (state, event) => {
                log::warn!("ignoring {event:?} while {state:?}");
                state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(DisplayState::DisplayingGame, ScreenEvent::PromotionRequested, DisplayState::DisplayingPromotionScreen)]
    #[test_case(DisplayState::DisplayingGame, ScreenEvent::LoadRequested, DisplayState::DisplayingLoadScreen)]
    #[test_case(DisplayState::DisplayingPromotionScreen, ScreenEvent::PromotionChosen, DisplayState::DisplayingGame)]
    #[test_case(DisplayState::DisplayingPromotionScreen, ScreenEvent::PromotionCancelled, DisplayState::DisplayingGame)]
    #[test_case(DisplayState::DisplayingLoadScreen, ScreenEvent::LoadFinished, DisplayState::DisplayingGame)]
    fn test_valid_transitions(from: DisplayState, event: ScreenEvent, to: DisplayState) {
        assert_eq!(from.next(event), to);
    }

    #[test_case(DisplayState::DisplayingPromotionScreen, ScreenEvent::LoadRequested)]
    #[test_case(DisplayState::DisplayingLoadScreen, ScreenEvent::PromotionRequested)]
    #[test_case(DisplayState::DisplayingGame, ScreenEvent::LoadFinished)]
    fn test_invalid_transitions_keep_state(from: DisplayState, event: ScreenEvent) {
        assert_eq!(from.next(event), from);
    }

    #[test]
    fn test_starts_on_game_screen() {
        assert_eq!(DisplayState::default(), DisplayState::DisplayingGame);
    }
}
