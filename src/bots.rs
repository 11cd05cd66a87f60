use crate::cards::Card;
use crate::game::action::Action;
use crate::game::player::{Chips, PlayerId};
use rand::Rng;

/// The redacted view of the table a bot decides from: its own hole cards,
/// the board, and the bounds of its legal actions. Never includes
/// opponents' hole cards, matching the same redaction rule a human client
/// sees over the wire.
pub struct GameView {
    pub player_id: PlayerId,
    pub hole_cards: [Card; 2],
    pub community_cards: Vec<Card>,
    pub call_amount: Chips,
    pub can_check: bool,
    pub min_raise: Option<Chips>,
    pub max_raise: Option<Chips>,
    pub pot: Chips,
}

/// The narrow contract a bet-sizing/decision strategy must implement.
/// Swappable per seat, so each bot at a table can run a different policy.
pub trait BotStrategy: Send + Sync {
    fn decide(&self, view: &GameView) -> Action;
}

/// A weighted-random policy: mostly
/// passive (check/call), folds to a bet it doesn't want to pay, and
/// occasionally raises when raising is legal.
pub struct RandomBot;

impl BotStrategy for RandomBot {
    fn decide(&self, view: &GameView) -> Action {
        let mut rng = rand::rng();
        if view.can_check {
            return if view.min_raise.is_some() && rng.random_bool(0.1) {
                Action::Raise(view.min_raise.unwrap())
            } else {
                Action::Check
            };
        }
        let roll: f64 = rng.random();
        match roll {
            r if r < 0.15 => Action::Fold,
            r if r < 0.90 => Action::Call,
            _ => match view.min_raise {
                Some(total) => Action::Raise(total),
                None => Action::Call,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(can_check: bool, min_raise: Option<Chips>) -> GameView {
        GameView {
            player_id: 0,
            hole_cards: [
                Card::from((crate::cards::Rank::Two, crate::cards::Suit::Clubs)),
                Card::from((crate::cards::Rank::Seven, crate::cards::Suit::Hearts)),
            ],
            community_cards: vec![],
            call_amount: 10,
            can_check,
            min_raise,
            max_raise: Some(100),
            pot: 20,
        }
    }

    #[test]
    fn checks_or_raises_when_check_is_legal() {
        let bot = RandomBot;
        for _ in 0..20 {
            let action = bot.decide(&view(true, Some(20)));
            assert!(matches!(action, Action::Check | Action::Raise(_)));
        }
    }

    #[test]
    fn never_raises_without_a_legal_raise_total() {
        let bot = RandomBot;
        for _ in 0..20 {
            let action = bot.decide(&view(false, None));
            assert!(!matches!(action, Action::Raise(_)));
        }
    }
}
