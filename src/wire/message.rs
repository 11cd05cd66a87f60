use crate::cards::Card;
use crate::game::action::Action;
use crate::game::player::{Chips, PlayerId, Status};
use crate::game::state::{Blinds, Phase};
use serde::{Deserialize, Serialize};

/// A player's hole cards as seen by one particular recipient: their own, in
/// the clear, or `["??","??"]` for anyone else's.
pub type WireCards = [String; 2];

pub const HIDDEN_CARDS: [&str; 2] = ["??", "??"];

fn reveal(cards: Option<[Card; 2]>) -> WireCards {
    match cards {
        Some([a, b]) => [a.to_string(), b.to_string()],
        None => [HIDDEN_CARDS[0].to_string(), HIDDEN_CARDS[1].to_string()],
    }
}

/// A player's entry inside a state snapshot, personalized per-recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub bet: Chips,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub hole_cards: WireCards,
}

impl PlayerView {
    /// Builds this player's view as seen by `viewer` — their own cards in
    /// the clear, everyone else's redacted.
    pub fn for_viewer(
        player_id: PlayerId,
        name: &str,
        chips: Chips,
        bet: Chips,
        status: Status,
        hole_cards: Option<[Card; 2]>,
        viewer: PlayerId,
    ) -> Self {
        let visible = if player_id == viewer { hole_cards } else { None };
        Self {
            player_id,
            name: name.to_string(),
            chips,
            bet,
            is_folded: status == Status::Folded,
            is_all_in: status == Status::AllIn,
            hole_cards: reveal(visible),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidActions {
    pub can_check: bool,
    pub call_amount: Chips,
    pub can_raise: bool,
    pub min_raise: Option<Chips>,
    pub max_raise: Option<Chips>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Winner {
    pub player_id: PlayerId,
    pub amount: Chips,
    pub hand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reveal {
    pub hole_cards: [String; 2],
    pub hand_name: String,
    pub score: u16,
}

/// Outbound messages, tagged `{"type": "...", ...}` in the wire JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        phase: String,
        variant: String,
        players: Vec<PlayerView>,
        community_cards: Vec<String>,
        pot: Chips,
        hand_number: u64,
        dealer_index: PlayerId,
        current_player_index: Option<PlayerId>,
        small_blind: Chips,
        big_blind: Chips,
    },
    HandStarting {
        phase: String,
        variant: String,
        players: Vec<PlayerView>,
        community_cards: Vec<String>,
        pot: Chips,
        hand_number: u64,
        dealer_index: PlayerId,
        current_player_index: Option<PlayerId>,
        small_blind: Chips,
        big_blind: Chips,
    },
    CommunityCard {
        phase: String,
        community_cards: Vec<String>,
    },
    YourTurn {
        player_id: PlayerId,
        valid_actions: ValidActions,
    },
    ActionTaken {
        player_id: PlayerId,
        name: String,
        action: String,
        amount: Chips,
        pot: Chips,
    },
    Winner {
        winners: Vec<Winner>,
        all_hands: Option<std::collections::HashMap<PlayerId, Reveal>>,
    },
    HandOver,
    PlayerDisconnected {
        player_id: PlayerId,
    },
    Error {
        message: String,
    },
    Chat {
        player_id: PlayerId,
        message: String,
    },
    Pong,
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerMessage always serializes")
    }
}

/// Inbound message payloads, accepted from either a human client or a bot
/// harness exercising the same protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Action { action: ActionPayload },
    Chat { message: String },
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: String,
    pub amount: Option<Chips>,
}

impl TryFrom<ActionPayload> for Action {
    type Error = String;

    fn try_from(p: ActionPayload) -> Result<Self, Self::Error> {
        match p.action.as_str() {
            "fold" => Ok(Action::Fold),
            "check" => Ok(Action::Check),
            "call" => Ok(Action::Call),
            "all_in" => Ok(Action::AllIn),
            "raise" => p
                .amount
                .map(Action::Raise)
                .ok_or_else(|| "raise requires an amount".to_string()),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

pub fn phase_name(phase: Phase) -> &'static str {
    phase.label()
}

pub fn blinds_of(b: Blinds) -> (Chips, Chips) {
    (b.small_blind, b.big_blind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_view_hides_other_players_cards() {
        let rank = crate::cards::Rank::Ace;
        let suit = crate::cards::Suit::Hearts;
        let card = crate::cards::Card::from((rank, suit));
        let view = PlayerView::for_viewer(1, "bob", 100, 0, Status::Active, Some([card, card]), 0);
        assert_eq!(view.hole_cards, HIDDEN_CARDS);
    }

    #[test]
    fn player_view_reveals_own_cards() {
        let rank = crate::cards::Rank::Ace;
        let suit = crate::cards::Suit::Hearts;
        let card = crate::cards::Card::from((rank, suit));
        let view = PlayerView::for_viewer(0, "me", 100, 0, Status::Active, Some([card, card]), 0);
        assert_ne!(view.hole_cards, HIDDEN_CARDS);
    }

    #[test]
    fn action_payload_parses_raise_with_amount() {
        let p = ActionPayload {
            action: "raise".into(),
            amount: Some(40),
        };
        assert_eq!(Action::try_from(p).unwrap(), Action::Raise(40));
    }

    #[test]
    fn action_payload_rejects_raise_without_amount() {
        let p = ActionPayload {
            action: "raise".into(),
            amount: None,
        };
        assert!(Action::try_from(p).is_err());
    }
}
