use crate::bots::{BotStrategy, GameView, RandomBot};
use crate::broadcast::{Broadcaster, ConnectionChannel, ConnectionCommand};
use crate::cards::Card;
use crate::dispatch::{schedule_bot_action, ActionChannel, Submission};
use crate::eval;
use crate::wire::{Event, Protocol};
use std::sync::Arc;
use uuid::Uuid;

use super::action::Action;
use super::betting::Variant;
use super::player::{Chips, PlayerId, Status};
use super::pot::PotManager;
use super::state::{Blinds, GameState, Phase};

/// Opaque table identifier: a bare v4 UUID newtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The per-table async task: one `Table` drives hand after hand to
/// completion for as long as it has players, cycling
/// reset → play_hand → showdown → loop.
pub struct Table {
    pub id: TableId,
    pub state: GameState,
    pub broadcaster: Broadcaster,
    strategies: Vec<Option<Arc<dyn BotStrategy>>>,
    /// The in-flight `schedule_bot_action` task for each seat, if any. Its
    /// `JoinHandle` is the cancellation token for that pending decision;
    /// aborted whenever the seat's turn resolves some other way, so a timer
    /// that fires late can never submit into a street or hand it no longer
    /// belongs to.
    pending_bot_action: Vec<Option<tokio::task::JoinHandle<()>>>,
    decision_timeout: std::time::Duration,
    /// How long to pause after a hand that reached showdown, so clients have
    /// time to render the revealed hands before the next one starts. A hand
    /// that ends by everyone folding skips straight to [`INTER_HAND_PAUSE`]
    /// instead, since there's nothing to reveal.
    showdown_pause: std::time::Duration,
}

const INTER_HAND_PAUSE: std::time::Duration = std::time::Duration::from_millis(1500);
const DEFAULT_DECISION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
const DEFAULT_SHOWDOWN_PAUSE: std::time::Duration = std::time::Duration::from_secs(5);

/// How long to idle between hands: the configured showdown pause if cards
/// were revealed, otherwise the short fixed pause.
fn post_hand_pause(was_showdown: bool, showdown_pause: std::time::Duration) -> std::time::Duration {
    if was_showdown {
        showdown_pause
    } else {
        INTER_HAND_PAUSE
    }
}

impl Table {
    pub fn new(id: TableId, variant: Variant, blinds: Blinds, players: Vec<super::player::Player>) -> Self {
        let seats = players.len();
        let strategies = players
            .iter()
            .map(|p| {
                if p.is_bot {
                    Some(Arc::new(RandomBot) as Arc<dyn BotStrategy>)
                } else {
                    None
                }
            })
            .collect();
        Self {
            id,
            state: GameState::new(variant, blinds, players),
            broadcaster: Broadcaster::new(seats),
            strategies,
            pending_bot_action: (0..seats).map(|_| None).collect(),
            decision_timeout: DEFAULT_DECISION_TIMEOUT,
            showdown_pause: DEFAULT_SHOWDOWN_PAUSE,
        }
    }

    /// Overrides the default decision timeout (10s), used by the hosting
    /// layer to apply the configured value.
    pub fn with_decision_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.decision_timeout = timeout;
        self
    }

    /// Overrides the default post-showdown pause (5s), used by the hosting
    /// layer to apply the configured value.
    pub fn with_showdown_pause(mut self, pause: std::time::Duration) -> Self {
        self.showdown_pause = pause;
        self
    }

    /// Cancels and clears any in-flight scheduled decision for `seat`. A
    /// no-op if none is pending, or if it already fired.
    fn abort_pending_bot_action(&mut self, seat: PlayerId) {
        if let Some(handle) = self.pending_bot_action[seat].take() {
            handle.abort();
        }
    }

    /// Cancels every in-flight scheduled decision at this table, used at
    /// street and hand boundaries so a stale bot timer can never land on the
    /// wrong turn.
    fn abort_all_pending_bot_actions(&mut self) {
        for handle in self.pending_bot_action.iter_mut().filter_map(|h| h.take()) {
            handle.abort();
        }
    }

    fn emit(&self, event: Event) {
        self.broadcaster.broadcast_personalized(&event, &self.state);
    }

    /// Seats that could actually take part in the next hand: monied, and
    /// either a bot or a currently connected human. A seat sitting out from
    /// a disconnect has chips but isn't counted, so the table idles instead
    /// of starting (and immediately stalling) a hand it can't deal.
    fn ready_seats(&self) -> usize {
        self.state
            .players
            .iter()
            .filter(|p| p.chips > 0 && (p.is_bot || self.broadcaster.is_connected(p.player_id)))
            .count()
    }

    fn apply_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect(player_id, sender) => {
                self.broadcaster.connect(player_id, sender);
                let snapshot = Protocol::snapshot(&self.state, player_id);
                self.broadcaster.unicast(player_id, snapshot);
            }
            ConnectionCommand::Disconnect(player_id) => {
                self.broadcaster.disconnect(player_id);
            }
            ConnectionCommand::Seat { player_id, name, buy_in } => {
                let player = self.state.player_mut(player_id);
                player.display_name = name;
                player.chips = buy_in;
                player.status = Status::Active;
            }
        }
    }

    /// Drives hands to completion for as long as the table exists. While
    /// fewer than two seats have chips, the table idles on incoming
    /// connection commands rather than exiting, so a table created empty
    /// can still be joined. `actions` is the shared channel both human
    /// clients and scheduled bot decisions submit into; `connections`
    /// carries connect/disconnect/seat requests from the hosting layer's
    /// WebSocket bridge, since the broadcaster and game state they mutate
    /// are privately owned by this running task.
    pub async fn run(&mut self, mut actions: ActionChannel, mut connections: ConnectionChannel) {
        loop {
            while self.ready_seats() < 2 {
                self.state.phase = Phase::Waiting;
                match connections.recv().await {
                    Some(command) => self.apply_connection_command(command),
                    None => return,
                }
            }
            let was_showdown = self.play_hand(&mut actions, &mut connections).await;
            let pause = post_hand_pause(was_showdown, self.showdown_pause);

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                Some(command) = connections.recv() => self.apply_connection_command(command),
            }
        }
    }

    /// Plays one hand to completion and returns whether it reached a real
    /// showdown (as opposed to ending by everyone folding), which the caller
    /// uses to decide how long to pause before the next hand.
    async fn play_hand(&mut self, actions: &mut ActionChannel, connections: &mut ConnectionChannel) -> bool {
        self.start_hand();

        for phase in [Phase::Preflop, Phase::Flop, Phase::Turn, Phase::River] {
            if self.contenders_remaining() <= 1 {
                self.state.phase = Phase::AllFolded;
                break;
            }
            self.deal_street(phase);
            self.run_betting_round(phase, actions, connections).await;
            if self.contenders_remaining() <= 1 {
                self.state.phase = Phase::AllFolded;
                break;
            }
        }

        let was_showdown = self.state.phase != Phase::AllFolded;
        match self.state.phase {
            Phase::AllFolded => self.settle_all_folded(),
            _ => self.showdown(),
        }
        self.state.phase = Phase::HandOver;
        self.emit(Event::HandOver);
        self.bust_players();
        was_showdown
    }

    fn contenders_remaining(&self) -> usize {
        self.state
            .players
            .iter()
            .filter(|p| p.status.is_in_hand())
            .count()
    }

    fn start_hand(&mut self) {
        self.abort_all_pending_bot_actions();
        let strategies = &self.strategies;
        let broadcaster = &self.broadcaster;
        self.state
            .start_hand(|id| strategies[id].is_some() || broadcaster.is_connected(id));
        self.emit(Event::HandStarting {
            hand_number: self.state.hand_number,
            dealer_index: self.state.dealer_index,
        });
        self.post_blinds();
        for id in self.state.players_in_hand() {
            let cards = [self.state.deck.draw(), self.state.deck.draw()];
            self.state.player_mut(id).hole_cards = Some(cards);
            self.emit(Event::HoleCards { player_id: id, cards });
        }
        self.state.phase = Phase::Preflop;
    }

    /// Posts small/big blind. Heads-up, the dealer posts the small blind
    /// and acts first preflop, last postflop — the standard convention.
    fn post_blinds(&mut self) {
        let order = self.state.turn_order(0); // seats starting at the dealer
        let (sb_seat, bb_seat) = if order.len() == 2 {
            (order[0], order[1])
        } else {
            (order[1], order[2])
        };
        let sb = self.state.blinds.small_blind;
        let bb = self.state.blinds.big_blind;
        self.state.player_mut(sb_seat).commit(sb);
        self.state.player_mut(bb_seat).commit(bb);
    }

    fn deal_street(&mut self, phase: Phase) {
        let n = match phase {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            _ => 0,
        };
        let mut dealt = Vec::with_capacity(n);
        for _ in 0..n {
            let card = self.state.deck.draw();
            self.state.community_cards.push(card);
            dealt.push(card);
        }
        if n > 0 {
            self.emit(Event::CommunityCards {
                phase: phase.label(),
                cards: self.state.community_cards.clone(),
            });
        }
        let turn_order = if phase == Phase::Preflop {
            self.state.turn_order(3)
        } else {
            self.state.turn_order(1)
        };
        let current_bet = if phase == Phase::Preflop {
            self.state.blinds.big_blind
        } else {
            0
        };
        self.state.start_street(phase, turn_order, current_bet);
    }

    async fn run_betting_round(&mut self, _phase: Phase, actions: &mut ActionChannel, connections: &mut ConnectionChannel) {
        loop {
            let is_complete = {
                let betting = self.state.betting.as_ref().expect("street in progress");
                betting.is_complete(&self.state.players) || betting.current_player.is_none()
            };
            if is_complete || self.contenders_remaining() <= 1 {
                self.abort_all_pending_bot_actions();
                break;
            }

            let current = self
                .state
                .betting
                .as_ref()
                .and_then(|b| b.current_player)
                .expect("loop invariant: not complete implies a current player");

            self.announce_turn(current);

            if self.strategies[current].is_some() {
                self.abort_pending_bot_action(current);
                let handle = actions.handle();
                let view = self.game_view(current);
                let strategy = self.strategies[current].clone().unwrap();
                self.pending_bot_action[current] = Some(schedule_bot_action(handle, current, strategy, view));
            }

            let submission = tokio::select! {
                submission = actions.recv() => submission,
                Some(command) = connections.recv() => {
                    self.apply_connection_command(command);
                    continue;
                }
                _ = tokio::time::sleep(self.decision_timeout), if self.strategies[current].is_none() => {
                    // A disconnected human auto-acts after the same decision
                    // window a connected human gets: check if legal, else
                    // fold. A still-connected human who is merely slow keeps
                    // their turn — we just loop and wait again.
                    if !self.broadcaster.is_connected(current) {
                        let call_amount = {
                            let betting = self.state.betting.as_ref().expect("street in progress");
                            betting.call_amount(self.state.player(current))
                        };
                        let action = if call_amount == 0 { Action::Check } else { Action::Fold };
                        Some(Submission { player_id: current, action })
                    } else {
                        continue;
                    }
                }
            };
            let Some(submission) = submission else {
                self.abort_all_pending_bot_actions();
                break;
            };

            if submission.player_id != current {
                self.emit(Event::Error {
                    player_id: Some(submission.player_id),
                    message: format!("it is not your turn; waiting on player {current}"),
                });
                continue;
            }

            self.abort_pending_bot_action(current);

            let result = {
                let betting = self.state.betting.as_mut().expect("street in progress");
                let player = &mut self.state.players[current];
                betting.apply_action(player, submission.action)
            };

            match result {
                Ok(()) => {
                    let pot = self.state.pot_total();
                    self.emit(Event::ActionTaken {
                        player_id: current,
                        action: submission.action,
                        pot,
                    });
                    let betting = self.state.betting.as_mut().expect("street in progress");
                    betting.advance(&self.state.players);
                }
                Err(e) => {
                    self.emit(Event::Error {
                        player_id: Some(current),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    fn announce_turn(&self, player_id: PlayerId) {
        let betting = self.state.betting.as_ref().expect("street in progress");
        let player = self.state.player(player_id);
        let call_amount = betting.call_amount(player);
        let min_raise = betting.min_raise_total();
        let max_raise = betting.max_raise_total(player);
        self.emit(Event::Turn {
            player_id,
            call_amount,
            can_check: call_amount == 0,
            min_raise,
            max_raise,
        });
    }

    fn game_view(&self, player_id: PlayerId) -> GameView {
        let betting = self.state.betting.as_ref().expect("street in progress");
        let player = self.state.player(player_id);
        GameView {
            player_id,
            hole_cards: player.hole_cards.expect("bot has hole cards while acting"),
            community_cards: self.state.community_cards.clone(),
            call_amount: betting.call_amount(player),
            can_check: betting.call_amount(player) == 0,
            min_raise: betting.min_raise_total(),
            max_raise: betting.max_raise_total(player),
            pot: self.state.pot_total(),
        }
    }

    fn settle_all_folded(&mut self) {
        let winner = self
            .state
            .players
            .iter()
            .find(|p| p.status.is_in_hand())
            .map(|p| p.player_id);
        let pot = self.state.pot_total();
        if let Some(winner) = winner {
            self.state.player_mut(winner).win(pot);
            self.emit(Event::Winner {
                winners: vec![(winner, pot, "uncontested")],
                all_hands: None,
            });
        }
    }

    fn showdown(&mut self) {
        self.state.phase = Phase::Showdown;
        let contenders: Vec<PlayerId> = self.state.players_in_hand();
        let scores: Vec<(PlayerId, u16)> = contenders
            .iter()
            .map(|&id| {
                let player = self.state.player(id);
                let hole = player.hole_cards.expect("showdown contenders were dealt cards");
                let mut seven = [Card::from(0u8); 7];
                seven[0] = hole[0];
                seven[1] = hole[1];
                for (i, c) in self.state.community_cards.iter().enumerate() {
                    seven[2 + i] = *c;
                }
                let (score, _) = eval::eval7(seven);
                (id, score)
            })
            .collect();

        let pots = PotManager::pots(&self.state.players);
        let seat_order = self.state.seat_order_from_dealer();
        let payouts = PotManager::settle(&pots, &scores, &seat_order);
        for &(winner, amount) in &payouts {
            self.state.player_mut(winner).win(amount);
        }

        let winners: Vec<(PlayerId, Chips, &'static str)> = payouts
            .iter()
            .map(|&(pid, amount)| {
                let score = scores.iter().find(|(p, _)| *p == pid).map(|(_, s)| *s).unwrap_or(7462);
                (pid, amount, eval::hand_name(score))
            })
            .collect();
        let all_hands: Vec<(PlayerId, [Card; 2], &'static str, u16)> = contenders
            .iter()
            .map(|&id| {
                let hole = self.state.player(id).hole_cards.expect("dealt");
                let score = scores.iter().find(|(p, _)| *p == id).map(|(_, s)| *s).unwrap_or(7462);
                (id, hole, eval::hand_name(score), score)
            })
            .collect();

        self.emit(Event::Winner {
            winners,
            all_hands: Some(all_hands),
        });
    }

    /// Post-hand cleanup: a busted player sits out, and so does a human who
    /// disconnected during the hand just played. Disconnect never interrupts
    /// the hand in progress; it only takes effect at this boundary.
    fn bust_players(&mut self) {
        let mut newly_dropped = Vec::new();
        for p in &mut self.state.players {
            let busted = p.chips == 0;
            let dropped = self.strategies[p.player_id].is_none() && !self.broadcaster.is_connected(p.player_id);
            if (busted || dropped) && p.status != Status::SittingOut {
                p.status = Status::SittingOut;
                if dropped && !busted {
                    newly_dropped.push(p.player_id);
                }
            }
        }
        for player_id in newly_dropped {
            self.emit(Event::Disconnect { player_id });
        }
    }
}
