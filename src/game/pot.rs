use super::player::{Chips, PlayerId, Player, Status};

/// One level of the pot: an amount and the players eligible to win it.
/// Side pots arise when a player is all-in for less than others behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
}

/// Builds side pots from each player's total contribution this hand and
/// settles them against showdown scores (lower score wins, per
/// [`crate::eval`]).
///
/// Grounded in the ascending-distinct-contribution-cap algorithm: sort the
/// distinct contribution amounts, carve a pot at each level from the
/// difference to the previous level multiplied by the number of players who
/// contributed at least that much, and restrict eligibility at each level to
/// players who haven't folded and contributed at least that level.
#[derive(Debug, Default)]
pub struct PotManager;

impl PotManager {
    /// Computes the pots for the hand from current player contributions.
    /// `folded` marks players who are out of contention despite having
    /// contributed chips (they still fund the pot, but cannot win it).
    pub fn pots(players: &[Player]) -> Vec<Pot> {
        let mut levels: Vec<Chips> = players
            .iter()
            .map(|p| p.contributed_this_hand)
            .filter(|&c| c > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::new();
        let mut previous = 0;
        for &level in &levels {
            let slice = level - previous;
            let contributors: Vec<&Player> = players
                .iter()
                .filter(|p| p.contributed_this_hand >= level)
                .collect();
            let amount = slice * contributors.len() as Chips;
            let eligible: Vec<PlayerId> = contributors
                .iter()
                .filter(|p| p.status != Status::Folded)
                .map(|p| p.player_id)
                .collect();
            if amount > 0 {
                pots.push(Pot { amount, eligible });
            }
            previous = level;
        }
        pots
    }

    /// Splits each pot among its best-scoring eligible players. Lower score
    /// wins. Odd chips go to the first tied winner in `seat_order` (the
    /// table's left-of-dealer seating order).
    pub fn settle(
        pots: &[Pot],
        scores: &[(PlayerId, u16)],
        seat_order: &[PlayerId],
    ) -> Vec<(PlayerId, Chips)> {
        let mut payouts: Vec<(PlayerId, Chips)> = Vec::new();
        for pot in pots {
            if pot.eligible.is_empty() {
                continue;
            }
            let best_score = pot
                .eligible
                .iter()
                .filter_map(|id| scores.iter().find(|(pid, _)| pid == id).map(|(_, s)| *s))
                .min();
            let Some(best_score) = best_score else {
                continue;
            };
            let winners: Vec<PlayerId> = pot
                .eligible
                .iter()
                .copied()
                .filter(|id| scores.iter().any(|(pid, s)| pid == id && *s == best_score))
                .collect();
            let share = pot.amount / winners.len() as Chips;
            let remainder = pot.amount % winners.len() as Chips;
            for &winner in &winners {
                add_payout(&mut payouts, winner, share);
            }
            if remainder > 0 {
                if let Some(&first) = seat_order.iter().find(|id| winners.contains(id)) {
                    add_payout(&mut payouts, first, remainder);
                }
            }
        }
        payouts
    }
}

fn add_payout(payouts: &mut Vec<(PlayerId, Chips)>, player_id: PlayerId, amount: Chips) {
    match payouts.iter_mut().find(|(id, _)| *id == player_id) {
        Some((_, total)) => *total += amount,
        None => payouts.push((player_id, amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: PlayerId, contributed: Chips, status: Status) -> Player {
        let mut p = Player::new(id, format!("p{id}"), false, 0);
        p.contributed_this_hand = contributed;
        p.status = status;
        p
    }

    #[test]
    fn single_pot_when_no_one_is_short() {
        let players = vec![
            player(0, 100, Status::Active),
            player(1, 100, Status::Active),
            player(2, 100, Status::Folded),
        ];
        let pots = PotManager::pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible, vec![0, 1]);
    }

    #[test]
    fn side_pot_for_short_all_in() {
        let players = vec![
            player(0, 50, Status::AllIn),
            player(1, 100, Status::Active),
            player(2, 100, Status::Active),
        ];
        let pots = PotManager::pots(&players);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 150); // 50 * 3
        assert_eq!(pots[0].eligible, vec![0, 1, 2]);
        assert_eq!(pots[1].amount, 100); // 50 * 2
        assert_eq!(pots[1].eligible, vec![1, 2]);
    }

    #[test]
    fn settle_splits_ties_with_remainder_to_seat_order() {
        let pots = vec![Pot {
            amount: 101,
            eligible: vec![0, 1],
        }];
        let scores = vec![(0, 100), (1, 100)];
        let payouts = PotManager::settle(&pots, &scores, &[1, 0]);
        let find = |id: PlayerId| payouts.iter().find(|(p, _)| *p == id).unwrap().1;
        assert_eq!(find(0), 50);
        assert_eq!(find(1), 51);
    }

    #[test]
    fn settle_awards_best_score_only() {
        let pots = vec![Pot {
            amount: 90,
            eligible: vec![0, 1, 2],
        }];
        let scores = vec![(0, 500), (1, 100), (2, 300)];
        let payouts = PotManager::settle(&pots, &scores, &[0, 1, 2]);
        assert_eq!(payouts, vec![(1, 90)]);
    }
}
