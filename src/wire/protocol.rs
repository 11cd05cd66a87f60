use super::event::Event;
use super::message::{
    blinds_of, phase_name, ActionPayload, ClientMessage, PlayerView, Reveal, ServerMessage, ValidActions, Winner,
};
use crate::cards::Card;
use crate::error::PokerError;
use crate::game::action::Action;
use crate::game::player::PlayerId;
use crate::game::state::GameState;
use std::collections::HashMap;

/// Bridges internal [`Event`]s and the wire [`ServerMessage`] enum, and
/// parses/validates inbound [`ClientMessage`]s into [`Action`]s. The engine
/// never touches JSON directly.
pub struct Protocol;

impl Protocol {
    /// Encodes an internal event into the message a given `viewer` should
    /// receive, given the authoritative `state`. Returns `None` for events
    /// addressed to a different seat than `viewer` ([`Event::target`]).
    pub fn encode(event: &Event, state: &GameState, viewer: PlayerId) -> Option<ServerMessage> {
        if event.target().is_some_and(|target| target != viewer) {
            return None;
        }
        match event {
            Event::HandStarting { hand_number, dealer_index } => {
                let (small_blind, big_blind) = blinds_of(state.blinds);
                Some(ServerMessage::HandStarting {
                    phase: phase_name(state.phase).to_string(),
                    variant: format!("{:?}", state.variant),
                    players: player_views(state, viewer),
                    community_cards: vec![],
                    pot: state.pot_total(),
                    hand_number: *hand_number,
                    dealer_index: *dealer_index,
                    current_player_index: state.betting.as_ref().and_then(|b| b.current_player),
                    small_blind,
                    big_blind,
                })
            }
            Event::HoleCards { .. } => Some(Self::snapshot(state, viewer)),
            Event::CommunityCards { phase, cards } => Some(ServerMessage::CommunityCard {
                phase: phase.to_string(),
                community_cards: cards.iter().map(Card::to_string).collect(),
            }),
            Event::Turn {
                player_id,
                call_amount,
                can_check,
                min_raise,
                max_raise,
            } => Some(ServerMessage::YourTurn {
                player_id: *player_id,
                valid_actions: ValidActions {
                    can_check: *can_check,
                    call_amount: *call_amount,
                    can_raise: min_raise.is_some(),
                    min_raise: *min_raise,
                    max_raise: *max_raise,
                },
            }),
            Event::ActionTaken { player_id, action, pot } => Some(ServerMessage::ActionTaken {
                player_id: *player_id,
                name: state.player(*player_id).display_name.clone(),
                action: action.to_string(),
                amount: match action {
                    Action::Raise(total) => *total,
                    _ => 0,
                },
                pot: *pot,
            }),
            Event::Winner { winners, all_hands } => Some(ServerMessage::Winner {
                winners: winners
                    .iter()
                    .map(|(pid, amount, hand)| Winner {
                        player_id: *pid,
                        amount: *amount,
                        hand: hand.to_string(),
                    })
                    .collect(),
                all_hands: all_hands.as_ref().map(|hands| {
                    hands
                        .iter()
                        .map(|(pid, cards, name, score)| {
                            (
                                *pid,
                                Reveal {
                                    hole_cards: [cards[0].to_string(), cards[1].to_string()],
                                    hand_name: name.to_string(),
                                    score: *score,
                                },
                            )
                        })
                        .collect::<HashMap<PlayerId, Reveal>>()
                }),
            }),
            Event::HandOver => Some(ServerMessage::HandOver),
            Event::Error { message, .. } => Some(ServerMessage::Error { message: message.clone() }),
            Event::Disconnect { player_id } => Some(ServerMessage::PlayerDisconnected { player_id: *player_id }),
        }
    }

    /// Builds the full current-state snapshot `viewer` would see right now,
    /// independent of any event. Used both by [`Self::encode`]'s
    /// `HoleCards` arm and to bring a freshly connected client up to date
    /// without waiting on the next event.
    pub fn snapshot(state: &GameState, viewer: PlayerId) -> ServerMessage {
        let (small_blind, big_blind) = blinds_of(state.blinds);
        ServerMessage::GameState {
            phase: phase_name(state.phase).to_string(),
            variant: format!("{:?}", state.variant),
            players: player_views(state, viewer),
            community_cards: state.community_cards.iter().map(Card::to_string).collect(),
            pot: state.pot_total(),
            hand_number: state.hand_number,
            dealer_index: state.dealer_index,
            current_player_index: state.betting.as_ref().and_then(|b| b.current_player),
            small_blind,
            big_blind,
        }
    }

    /// Parses a raw inbound JSON string into a client message.
    pub fn decode(raw: &str) -> Result<ClientMessage, PokerError> {
        serde_json::from_str(raw).map_err(|e| PokerError::ProtocolViolation(e.to_string()))
    }

    /// Converts a decoded action payload into a domain [`Action`], without
    /// yet checking it against the current legal action set (that's
    /// [`Protocol::validate`]'s job, which needs the betting round).
    pub fn parse_action(payload: ActionPayload) -> Result<Action, PokerError> {
        Action::try_from(payload).map_err(PokerError::InvalidAction)
    }
}

fn player_views(state: &GameState, viewer: PlayerId) -> Vec<PlayerView> {
    state
        .players
        .iter()
        .map(|p| {
            PlayerView::for_viewer(
                p.player_id,
                &p.display_name,
                p.chips,
                p.bet_this_street,
                p.status,
                p.hole_cards,
                viewer,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::betting::Variant;
    use crate::game::player::Player;
    use crate::game::state::Blinds;

    fn state() -> GameState {
        GameState::new(
            Variant::NoLimit,
            Blinds { small_blind: 1, big_blind: 2 },
            vec![Player::new(0, "a", false, 100), Player::new(1, "b", false, 100)],
        )
    }

    #[test]
    fn hole_cards_event_is_filtered_to_its_owner() {
        let s = state();
        let card = crate::cards::Card::from((crate::cards::Rank::Ace, crate::cards::Suit::Hearts));
        let event = Event::HoleCards { player_id: 0, cards: [card, card] };
        assert!(Protocol::encode(&event, &s, 0).is_some());
        assert!(Protocol::encode(&event, &s, 1).is_none());
    }

    #[test]
    fn turn_event_is_filtered_to_its_player() {
        let s = state();
        let event = Event::Turn {
            player_id: 1,
            call_amount: 0,
            can_check: true,
            min_raise: Some(4),
            max_raise: Some(100),
        };
        assert!(Protocol::encode(&event, &s, 0).is_none());
        assert!(Protocol::encode(&event, &s, 1).is_some());
    }

    #[test]
    fn snapshot_reveals_only_the_viewers_own_hole_cards() {
        let mut s = state();
        let card = crate::cards::Card::from((crate::cards::Rank::Ace, crate::cards::Suit::Hearts));
        s.players[0].hole_cards = Some([card, card]);
        s.players[1].hole_cards = Some([card, card]);

        let ServerMessage::GameState { players, .. } = Protocol::snapshot(&s, 0) else {
            panic!("expected a game_state message");
        };
        let hidden = ["??".to_string(), "??".to_string()];
        assert_ne!(players[0].hole_cards, hidden);
        assert_eq!(players[1].hole_cards, hidden);
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = Protocol::decode("not json").unwrap_err();
        assert!(matches!(err, PokerError::ProtocolViolation(_)));
    }
}
