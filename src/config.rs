use crate::board::Role;

/// Tunables for a [`GameSession`](crate::game_logic::GameSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Promote to this piece without asking.
    ///
    /// Front ends without a promotion picker set this to [`Role::Queen`];
    /// `None` makes the session wait for [`promote`](crate::game_logic::GameSession::promote).
    pub auto_promotion: Option<Role>,

    /// Number of in-memory save slots offered on the load screen.
    pub save_slots: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_promotion: None,
            save_slots: 5,
        }
    }
}

impl SessionConfig {
    #[inline]
    pub fn with_auto_promotion(mut self, role: Role) -> Self {
        self.auto_promotion = Some(role);
        self
    }

    #[inline]
    pub fn with_save_slots(mut self, slots: usize) -> Self {
        self.save_slots = slots;
        self
    }
}
