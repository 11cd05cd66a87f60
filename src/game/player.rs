use crate::cards::Card;

/// Chip counts. `i64` rather than a narrower int: a live server has no
/// reason to cap stack size.
pub type Chips = i64;

/// A seat index around the table, `0..seats`.
pub type PlayerId = usize;

/// A player's betting status within the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Folded,
    AllIn,
    SittingOut,
}

impl Status {
    pub fn can_act(&self) -> bool {
        matches!(self, Status::Active)
    }
    pub fn is_in_hand(&self) -> bool {
        matches!(self, Status::Active | Status::AllIn)
    }
}

/// A player's state at the table. Outlives individual hands; only the
/// hand-scoped fields (`bet_this_street`, `contributed_this_hand`,
/// `hole_cards`, `status`) are reset between hands.
#[derive(Debug, Clone)]
pub struct Player {
    pub player_id: PlayerId,
    pub display_name: String,
    pub is_bot: bool,
    pub chips: Chips,
    pub bet_this_street: Chips,
    pub contributed_this_hand: Chips,
    pub hole_cards: Option<[Card; 2]>,
    pub status: Status,
}

impl Player {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>, is_bot: bool, chips: Chips) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            is_bot,
            chips,
            bet_this_street: 0,
            contributed_this_hand: 0,
            hole_cards: None,
            status: Status::SittingOut,
        }
    }
    /// Resets the hand-scoped fields for a new hand. Chips carry forward.
    /// `connected` is irrelevant for bots (always eligible) but for a human
    /// seat tells us whether sitting_out was caused by a disconnect that
    /// hasn't resolved — such a seat stays sitting_out instead of being
    /// silently reactivated just because it still has chips.
    pub fn reset_for_hand(&mut self, connected: bool) {
        self.bet_this_street = 0;
        self.contributed_this_hand = 0;
        self.hole_cards = None;
        self.status = if self.chips > 0 && connected {
            Status::Active
        } else {
            Status::SittingOut
        };
    }
    pub fn reset_for_street(&mut self) {
        self.bet_this_street = 0;
    }
    /// Commits `amount` from the stack to the pot, capping at the stack
    /// (an all-in for less than requested). Returns the amount actually bet.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let amount = amount.min(self.chips);
        self.chips -= amount;
        self.bet_this_street += amount;
        self.contributed_this_hand += amount;
        if self.chips == 0 && self.status == Status::Active {
            self.status = Status::AllIn;
        }
        amount
    }
    pub fn win(&mut self, amount: Chips) {
        self.chips += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_flips_to_all_in() {
        let mut p = Player::new(0, "a", false, 50);
        p.status = Status::Active;
        let committed = p.commit(80);
        assert_eq!(committed, 50);
        assert_eq!(p.chips, 0);
        assert_eq!(p.status, Status::AllIn);
    }

    #[test]
    fn reset_for_hand_sits_out_busted_players() {
        let mut p = Player::new(0, "a", false, 0);
        p.reset_for_hand(true);
        assert_eq!(p.status, Status::SittingOut);
    }

    #[test]
    fn reset_for_hand_leaves_a_disconnected_player_sitting_out() {
        let mut p = Player::new(0, "a", false, 100);
        p.reset_for_hand(false);
        assert_eq!(p.status, Status::SittingOut);
    }

    #[test]
    fn reset_for_hand_reactivates_a_connected_player_with_chips() {
        let mut p = Player::new(0, "a", false, 100);
        p.reset_for_hand(true);
        assert_eq!(p.status, Status::Active);
    }
}
