use super::action::Action;
use super::player::{Chips, Player, PlayerId, Status};
use crate::error::PokerError;

/// Which ruleset governs bet sizing for this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    NoLimit,
    FixedLimit,
}

/// A single betting street (preflop/flop/turn/river). Owns turn order and
/// action legality; the orchestrator drives it one action at a time and
/// asks [`BettingRound::is_complete`] after each to know when to deal the
/// next street.
#[derive(Debug, Clone)]
pub struct BettingRound {
    pub variant: Variant,
    pub big_blind: Chips,
    /// Fixed-limit's bet/raise increment for this street (`big_blind`
    /// preflop/flop, `2 * big_blind` turn/river). Unused under no-limit.
    pub fixed_bet_size: Chips,
    pub current_bet: Chips,
    pub last_raise_size: Chips,
    pub raise_count: u8,
    pub acted_since_last_raise: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    /// Seats in action order for this street, e.g. `(dealer+1)..` postflop
    /// or `(dealer+3)..` preflop, already filtered to players who can act.
    pub turn_order: Vec<PlayerId>,
}

/// Maximum number of raises per street under fixed-limit rules (bet + 3
/// raises, i.e. a cap of 4 total bets).
pub const FIXED_LIMIT_RAISE_CAP: u8 = 3;

impl BettingRound {
    pub fn new(
        variant: Variant,
        big_blind: Chips,
        fixed_bet_size: Chips,
        current_bet: Chips,
        turn_order: Vec<PlayerId>,
    ) -> Self {
        let current_player = turn_order.first().copied();
        Self {
            variant,
            big_blind,
            fixed_bet_size,
            current_bet,
            last_raise_size: big_blind,
            raise_count: 0,
            acted_since_last_raise: Vec::new(),
            current_player,
            turn_order,
        }
    }

    /// Advances `current_player` to the next seat in turn order that is
    /// still `Active`, cycling past folded/all-in seats. Sets `None` if no
    /// such seat remains (the street is over).
    pub fn advance(&mut self, players: &[Player]) {
        let Some(current) = self.current_player else {
            return;
        };
        let Some(pos) = self.turn_order.iter().position(|&id| id == current) else {
            self.current_player = None;
            return;
        };
        let n = self.turn_order.len();
        for step in 1..=n {
            let candidate = self.turn_order[(pos + step) % n];
            if players[candidate].status == Status::Active {
                self.current_player = Some(candidate);
                return;
            }
        }
        self.current_player = None;
    }

    pub fn call_amount(&self, player: &Player) -> Chips {
        (self.current_bet - player.bet_this_street).max(0)
    }

    /// The smallest legal total bet (player's new `bet_this_street`) for a
    /// raise, or `None` if raising is not available (fixed-limit cap hit).
    pub fn min_raise_total(&self) -> Option<Chips> {
        match self.variant {
            Variant::FixedLimit => {
                if self.raise_count >= FIXED_LIMIT_RAISE_CAP {
                    None
                } else {
                    Some(self.current_bet + self.fixed_bet_size)
                }
            }
            Variant::NoLimit => Some(self.current_bet + self.last_raise_size.max(self.big_blind)),
        }
    }

    /// The largest legal total bet for a raise: the player's full stack plus
    /// what they've already put in this street, under no-limit; the same as
    /// the minimum under fixed-limit.
    pub fn max_raise_total(&self, player: &Player) -> Option<Chips> {
        match self.variant {
            Variant::NoLimit => Some(player.chips + player.bet_this_street),
            Variant::FixedLimit => self.min_raise_total(),
        }
    }

    /// Applies a call/check (no new aggression). `total` is the player's new
    /// `bet_this_street` after the call.
    pub fn apply_call(&mut self, player: &mut Player) {
        let amount = self.call_amount(player);
        player.commit(amount);
        self.mark_acted(player.player_id);
    }

    pub fn apply_fold(&mut self, player: &mut Player) {
        player.status = Status::Folded;
        self.mark_acted(player.player_id);
    }

    /// Applies a bet or raise to `total` (the player's new `bet_this_street`).
    /// An all-in for less than the minimum raise commits the player's whole
    /// stack but does not reopen action to players who've already acted
    /// since the last full raise.
    pub fn apply_raise(&mut self, player: &mut Player, total: Chips) {
        let increment = total - player.bet_this_street;
        player.commit(increment);
        let new_total = player.bet_this_street;

        // A short stack can be capped below `total` by `commit`, landing at
        // or below the current bet: that's an all-in call, not a raise, and
        // never reopens action regardless of how much it adds to the pot.
        if new_total <= self.current_bet {
            self.mark_acted(player.player_id);
            return;
        }

        let raise_size = new_total - self.current_bet;
        let is_full_raise = raise_size >= self.last_raise_size;
        self.current_bet = new_total;
        if is_full_raise {
            self.last_raise_size = raise_size;
            self.raise_count += 1;
            self.acted_since_last_raise.clear();
        }
        self.mark_acted(player.player_id);
    }

    /// Validates and applies a submitted action for `player`, enforcing
    /// turn order, legality, and chip bounds. Leaves state unchanged and
    /// returns an error if the action is illegal; the caller re-awaits the
    /// same player.
    pub fn apply_action(&mut self, player: &mut Player, action: Action) -> Result<(), PokerError> {
        let Some(expected) = self.current_player else {
            return Err(PokerError::InvalidAction("no player is currently expected to act".into()));
        };
        if expected != player.player_id {
            return Err(PokerError::OutOfTurn {
                expected,
                got: player.player_id,
            });
        }
        if !player.status.can_act() {
            return Err(PokerError::InvalidAction("player cannot act in their current status".into()));
        }

        match action {
            Action::Fold => self.apply_fold(player),
            Action::Check => {
                if self.call_amount(player) != 0 {
                    return Err(PokerError::InvalidAction("check is not legal facing a bet".into()));
                }
                self.apply_call(player);
            }
            Action::Call => self.apply_call(player),
            Action::AllIn => self.apply_raise(player, player.chips + player.bet_this_street),
            Action::Raise(total) => {
                let min = self
                    .min_raise_total()
                    .ok_or_else(|| PokerError::InvalidAction("raise cap reached for this street".into()))?;
                let max = self.max_raise_total(player).unwrap_or(min);
                let is_all_in = total == player.chips + player.bet_this_street;
                if total < min && !is_all_in {
                    return Err(PokerError::InvalidAction(format!(
                        "raise to {total} is below the minimum of {min}"
                    )));
                }
                if total > max {
                    return Err(PokerError::InvalidAction(format!(
                        "raise to {total} exceeds the maximum of {max}"
                    )));
                }
                self.apply_raise(player, total);
            }
        }
        Ok(())
    }

    fn mark_acted(&mut self, player_id: PlayerId) {
        if !self.acted_since_last_raise.contains(&player_id) {
            self.acted_since_last_raise.push(player_id);
        }
    }

    /// The street is complete once every player still able to act has
    /// acted since the last raise and matched the current bet (or is
    /// all-in/folded).
    pub fn is_complete(&self, players: &[Player]) -> bool {
        let contenders: Vec<&Player> = players
            .iter()
            .filter(|p| p.status.is_in_hand())
            .collect();
        if contenders.iter().filter(|p| p.status == Status::Active).count() == 0 {
            return true;
        }
        contenders.iter().all(|p| {
            if p.status != Status::Active {
                return true;
            }
            p.bet_this_street == self.current_bet && self.acted_since_last_raise.contains(&p.player_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(id: PlayerId, chips: Chips) -> Player {
        let mut p = Player::new(id, format!("p{id}"), false, chips);
        p.status = Status::Active;
        p
    }

    #[test]
    fn call_amount_is_difference_from_current_bet() {
        let round = BettingRound::new(Variant::NoLimit, 2, 2, 6, vec![0]);
        let mut p = active(0, 100);
        p.bet_this_street = 2;
        assert_eq!(round.call_amount(&p), 4);
    }

    #[test]
    fn all_in_for_less_does_not_reopen_action() {
        let mut round = BettingRound::new(Variant::NoLimit, 2, 2, 10, vec![0]);
        round.acted_since_last_raise = vec![1, 2];
        let mut shorty = active(0, 6); // wants to raise to 16 but only has 6 chips
        round.apply_raise(&mut shorty, 16);
        assert_eq!(shorty.chips, 0);
        assert_eq!(shorty.bet_this_street, 6);
        assert_eq!(round.current_bet, 10); // unchanged: short all-in is a call, not a raise
        assert_eq!(round.raise_count, 0);
        assert!(round.acted_since_last_raise.contains(&1));
        assert!(round.acted_since_last_raise.contains(&2));
        assert!(round.acted_since_last_raise.contains(&0));
    }

    #[test]
    fn full_raise_clears_acted_set_and_bumps_count() {
        let mut round = BettingRound::new(Variant::NoLimit, 2, 2, 2, vec![0]);
        round.acted_since_last_raise = vec![1];
        let mut p = active(0, 100);
        round.apply_raise(&mut p, 6);
        assert_eq!(round.current_bet, 6);
        assert_eq!(round.raise_count, 1);
        assert_eq!(round.acted_since_last_raise, vec![0]);
    }

    #[test]
    fn fixed_limit_raise_cap_blocks_further_raises() {
        let mut round = BettingRound::new(Variant::FixedLimit, 2, 2, 2, vec![0]);
        round.raise_count = FIXED_LIMIT_RAISE_CAP;
        assert_eq!(round.min_raise_total(), None);
    }

    #[test]
    fn is_complete_when_all_active_matched_and_acted() {
        let mut round = BettingRound::new(Variant::NoLimit, 2, 2, 10, vec![0]);
        let mut a = active(0, 100);
        let mut b = active(1, 100);
        a.bet_this_street = 10;
        b.bet_this_street = 10;
        round.mark_acted(0);
        round.mark_acted(1);
        assert!(round.is_complete(&[a, b]));
    }

    #[test]
    fn apply_action_rejects_out_of_turn() {
        let mut round = BettingRound::new(Variant::NoLimit, 2, 2, 2, vec![1]);
        let mut p = active(0, 100);
        let err = round.apply_action(&mut p, Action::Fold).unwrap_err();
        assert!(matches!(err, crate::error::PokerError::OutOfTurn { expected: 1, got: 0 }));
    }

    #[test]
    fn apply_action_rejects_check_facing_a_bet() {
        let mut round = BettingRound::new(Variant::NoLimit, 2, 2, 10, vec![0]);
        let mut p = active(0, 100);
        let err = round.apply_action(&mut p, Action::Check).unwrap_err();
        assert!(matches!(err, crate::error::PokerError::InvalidAction(_)));
    }

    #[test]
    fn apply_action_rejects_raise_below_minimum_unless_all_in() {
        let mut round = BettingRound::new(Variant::NoLimit, 5, 5, 30, vec![2]);
        round.last_raise_size = 20; // A raised 10->30
        let mut c = active(2, 45); // total reachable 45
        // attempting to re-raise to 60 while only able to cover to 45 should fail (not all-in)
        let err = round.apply_action(&mut c, Action::Raise(60)).unwrap_err();
        assert!(matches!(err, crate::error::PokerError::InvalidAction(_)));
    }

    #[test]
    fn flhe_fifth_raise_is_rejected() {
        let mut round = BettingRound::new(Variant::FixedLimit, 20, 20, 80, vec![0]);
        round.raise_count = FIXED_LIMIT_RAISE_CAP;
        let mut p = active(0, 1000);
        let err = round.apply_action(&mut p, Action::Raise(100)).unwrap_err();
        assert!(matches!(err, crate::error::PokerError::InvalidAction(_)));
    }
}
