use crate::cards::Card;
use crate::game::action::Action;
use crate::game::player::{Chips, PlayerId};

/// Internal domain events emitted by the orchestrator. Distinct from the
/// wire-facing [`super::message::ServerMessage`]: events carry the raw,
/// unredacted truth; [`super::protocol::Protocol::encode`] turns each one
/// into a payload tailored to its recipient.
#[derive(Debug, Clone)]
pub enum Event {
    HandStarting {
        hand_number: u64,
        dealer_index: PlayerId,
    },
    HoleCards {
        player_id: PlayerId,
        cards: [Card; 2],
    },
    CommunityCards {
        phase: &'static str,
        cards: Vec<Card>,
    },
    Turn {
        player_id: PlayerId,
        call_amount: Chips,
        can_check: bool,
        min_raise: Option<Chips>,
        max_raise: Option<Chips>,
    },
    ActionTaken {
        player_id: PlayerId,
        action: Action,
        pot: Chips,
    },
    Winner {
        winners: Vec<(PlayerId, Chips, &'static str)>,
        all_hands: Option<Vec<(PlayerId, [Card; 2], &'static str, u16)>>,
    },
    HandOver,
    Error {
        player_id: Option<PlayerId>,
        message: String,
    },
    Disconnect {
        player_id: PlayerId,
    },
}

impl Event {
    /// The player this event is specifically addressed to, if any. Used by
    /// [`super::protocol::Protocol::encode`] to filter an event down to the
    /// one recipient it's meant for before building its payload.
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            Event::HoleCards { player_id, .. } => Some(*player_id),
            Event::Turn { player_id, .. } => Some(*player_id),
            Event::Error { player_id, .. } => *player_id,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_over_has_no_target() {
        assert_eq!(Event::HandOver.target(), None);
    }

    #[test]
    fn broadcast_error_has_no_target() {
        let event = Event::Error { player_id: None, message: "oops".into() };
        assert_eq!(event.target(), None);
    }

    #[test]
    fn targeted_error_names_its_player() {
        let event = Event::Error { player_id: Some(2), message: "oops".into() };
        assert_eq!(event.target(), Some(2));
    }
}
