use crate::cards::{Card, Deck};
use super::betting::{BettingRound, Variant};
use super::player::{Chips, Player, PlayerId, Status};

/// The hand's progress through the streets, mirroring the orchestrator's
/// phase machine one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Starting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    AllFolded,
    HandOver,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Waiting => "WAITING",
            Phase::Starting => "STARTING",
            Phase::Preflop => "PREFLOP",
            Phase::Flop => "FLOP",
            Phase::Turn => "TURN",
            Phase::River => "RIVER",
            Phase::Showdown => "SHOWDOWN",
            Phase::AllFolded => "ALL_FOLDED",
            Phase::HandOver => "HAND_OVER",
        }
    }
}

/// Fixed blind/ante structure for the table.
#[derive(Debug, Clone, Copy)]
pub struct Blinds {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

/// All state for one table: seats, the running hand's cards and pot, and
/// the active betting round. One `GameState` lives for the table's whole
/// life; `start_hand` resets the hand-scoped fields each time.
pub struct GameState {
    pub variant: Variant,
    pub blinds: Blinds,
    pub phase: Phase,
    pub hand_number: u64,
    pub dealer_index: PlayerId,
    pub players: Vec<Player>,
    pub community_cards: Vec<Card>,
    pub deck: Deck,
    pub betting: Option<BettingRound>,
}

impl GameState {
    pub fn new(variant: Variant, blinds: Blinds, players: Vec<Player>) -> Self {
        Self {
            variant,
            blinds,
            phase: Phase::Waiting,
            hand_number: 0,
            dealer_index: 0,
            players,
            community_cards: Vec::new(),
            deck: Deck::new(),
            betting: None,
        }
    }

    /// Seat indices of players with chips, in order starting just after the
    /// dealer (the order action and pot distribution follow).
    pub fn seat_order_from_dealer(&self) -> Vec<PlayerId> {
        let n = self.players.len();
        (1..=n)
            .map(|offset| (self.dealer_index + offset) % n)
            .filter(|&i| self.players[i].status != Status::SittingOut)
            .collect()
    }

    pub fn players_in_hand(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.status.is_in_hand())
            .map(|p| p.player_id)
            .collect()
    }

    pub fn pot_total(&self) -> Chips {
        self.players.iter().map(|p| p.contributed_this_hand).sum()
    }

    /// Resets hand-scoped state and advances the dealer button. Does not
    /// deal cards or post blinds; that's the orchestrator's job, since it
    /// needs to broadcast each step. `connected` reports whether a seat's
    /// human connection is currently live (irrelevant for bots); a human
    /// seat sitting out because it disconnected stays sitting out instead
    /// of reactivating just because it still has chips.
    pub fn start_hand(&mut self, connected: impl Fn(PlayerId) -> bool) {
        self.hand_number += 1;
        self.community_cards.clear();
        self.deck = Deck::new();
        self.betting = None;
        self.phase = Phase::Starting;
        for p in &mut self.players {
            let eligible = p.is_bot || connected(p.player_id);
            p.reset_for_hand(eligible);
        }
        let seated: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.status != Status::SittingOut)
            .map(|p| p.player_id)
            .collect();
        if let Some(&next) = seated
            .iter()
            .find(|&&id| id > self.dealer_index)
            .or_else(|| seated.first())
        {
            self.dealer_index = next;
        }
    }

    /// Seats still in the hand (active or all-in), in clockwise order
    /// starting `offset` seats after the dealer. Preflop starts 3 past the
    /// dealer (big blind acts last); postflop streets start 1 past.
    pub fn turn_order(&self, offset: usize) -> Vec<PlayerId> {
        let n = self.players.len();
        (offset..offset + n)
            .map(|o| (self.dealer_index + o) % n)
            .filter(|&i| self.players[i].status.is_in_hand())
            .collect()
    }

    pub fn start_street(&mut self, phase: Phase, turn_order: Vec<PlayerId>, current_bet: Chips) {
        self.phase = phase;
        for p in &mut self.players {
            p.reset_for_street();
        }
        let fixed_bet_size = match phase {
            Phase::Turn | Phase::River => self.blinds.big_blind * 2,
            _ => self.blinds.big_blind,
        };
        let mut betting = BettingRound::new(
            self.variant,
            self.blinds.big_blind,
            fixed_bet_size,
            current_bet,
            turn_order,
        );
        // The first seat in turn order may itself be all-in already (no
        // chips to act with); skip forward to the first seat that can.
        if betting
            .current_player
            .is_some_and(|id| self.players[id].status != Status::Active)
        {
            betting.advance(&self.players);
        }
        self.betting = Some(betting);
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("p{i}"), false, 100)).collect()
    }

    #[test]
    fn seat_order_skips_sitting_out_players() {
        let mut ps = players(3);
        ps[1].status = Status::SittingOut;
        let state = GameState::new(Variant::NoLimit, Blinds { small_blind: 1, big_blind: 2 }, ps);
        assert_eq!(state.seat_order_from_dealer(), vec![2, 0]);
    }

    #[test]
    fn start_hand_resets_contributions_and_advances_dealer() {
        let mut state = GameState::new(
            Variant::NoLimit,
            Blinds { small_blind: 1, big_blind: 2 },
            players(3),
        );
        state.players[0].contributed_this_hand = 50;
        state.dealer_index = 0;
        state.start_hand(|_| true);
        assert_eq!(state.players[0].contributed_this_hand, 0);
        assert_eq!(state.dealer_index, 1);
        assert_eq!(state.phase, Phase::Starting);
    }

    #[test]
    fn start_hand_leaves_a_disconnected_human_sitting_out() {
        let mut state = GameState::new(Variant::NoLimit, Blinds { small_blind: 1, big_blind: 2 }, players(3));
        state.start_hand(|id| id != 1);
        assert_eq!(state.players[1].status, Status::SittingOut);
        assert_eq!(state.players[0].status, Status::Active);
        assert_eq!(state.players[2].status, Status::Active);
    }

    #[test]
    fn pot_total_sums_contributions() {
        let mut ps = players(2);
        ps[0].contributed_this_hand = 10;
        ps[1].contributed_this_hand = 20;
        let state = GameState::new(Variant::NoLimit, Blinds { small_blind: 1, big_blind: 2 }, ps);
        assert_eq!(state.pot_total(), 30);
    }
}
