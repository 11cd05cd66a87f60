use super::tables as table_data;
use super::tables::Tables;
use crate::cards::Card;
use std::sync::OnceLock;

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Builds the evaluator's lookup tables. Must be called once during process
/// startup, before any hand is dealt; [`eval5`]/[`eval7`] assume the tables
/// already exist and will panic otherwise, since a missing table at hand
/// time is a programmer error, not a runtime condition.
pub fn init() {
    TABLES.get_or_init(table_data::build);
}

fn tables() -> &'static Tables {
    TABLES
        .get()
        .expect("evaluator tables not initialized; call eval::init() at startup")
}

/// Scores a 5-card hand. Lower is better: 1 = royal flush, 7462 = 7-high.
pub fn eval5(cards: [Card; 5]) -> u16 {
    let bits: [u32; 5] = cards.map(|c| c.to_bits());

    let common_suit = bits.iter().fold(0xF, |acc, b| acc & ((b >> 12) & 0xF));
    if common_suit != 0 {
        let rank_key = bits.iter().fold(0u32, |acc, b| acc ^ ((b >> 16) & 0x1FFF));
        return *tables()
            .flush
            .get(&rank_key)
            .expect("flush table missing entry for valid rank combination");
    }

    let prime_product: u64 = bits.iter().map(|b| (b & 0x3F) as u64).product();
    let mut rank_nibbles: Vec<u32> = bits.iter().map(|b| (b >> 8) & 0xF).collect();
    rank_nibbles.sort_unstable();
    rank_nibbles.dedup();
    if rank_nibbles.len() == 5 {
        *tables()
            .unique5
            .get(&prime_product)
            .expect("unique5 table missing entry for valid rank combination")
    } else {
        *tables()
            .pairs
            .get(&prime_product)
            .expect("pairs table missing entry for valid rank combination")
    }
}

/// All 21 ways to choose 5 of 7 card indices, ascending within each.
const SEVEN_CHOOSE_FIVE: [[usize; 5]; 21] = [
    [0, 1, 2, 3, 4],
    [0, 1, 2, 3, 5],
    [0, 1, 2, 3, 6],
    [0, 1, 2, 4, 5],
    [0, 1, 2, 4, 6],
    [0, 1, 2, 5, 6],
    [0, 1, 3, 4, 5],
    [0, 1, 3, 4, 6],
    [0, 1, 3, 5, 6],
    [0, 1, 4, 5, 6],
    [0, 2, 3, 4, 5],
    [0, 2, 3, 4, 6],
    [0, 2, 3, 5, 6],
    [0, 2, 4, 5, 6],
    [0, 3, 4, 5, 6],
    [1, 2, 3, 4, 5],
    [1, 2, 3, 4, 6],
    [1, 2, 3, 5, 6],
    [1, 2, 4, 5, 6],
    [1, 3, 4, 5, 6],
    [2, 3, 4, 5, 6],
];

/// Scores the best 5-card hand out of 7, returning the score and the indices
/// (into the input array) of the winning subset.
pub fn eval7(cards: [Card; 7]) -> (u16, [usize; 5]) {
    SEVEN_CHOOSE_FIVE
        .iter()
        .map(|&idx| (eval5(idx.map(|i| cards[i])), idx))
        .min_by_key(|&(score, _)| score)
        .expect("21 combinations is a nonempty constant")
}

/// Human-readable hand category name for a score, used in `winner` payloads.
pub fn hand_name(score: u16) -> &'static str {
    match score {
        1 => "Royal Flush",
        2..=10 => "Straight Flush",
        11..=166 => "Four of a Kind",
        167..=322 => "Full House",
        323..=1599 => "Flush",
        1600..=1609 => "Straight",
        1610..=2467 => "Three of a Kind",
        2468..=3325 => "Two Pair",
        3326..=6185 => "One Pair",
        6186..=7462 => "High Card",
        _ => unreachable!("score out of [1,7462] range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        Card::parse_many(s).unwrap()
    }

    fn ensure_init() {
        init();
    }

    #[test]
    fn royal_flush_scores_one() {
        ensure_init();
        let c = cards("Ah Kh Qh Jh Th");
        let hand: [Card; 5] = c.try_into().unwrap();
        assert_eq!(eval5(hand), 1);
        assert_eq!(hand_name(1), "Royal Flush");
    }

    #[test]
    fn seven_high_scores_max() {
        ensure_init();
        let c = cards("7c 5h 4d 3s 2c");
        let hand: [Card; 5] = c.try_into().unwrap();
        assert_eq!(eval5(hand), 7462);
    }

    #[test]
    fn permutation_invariant() {
        ensure_init();
        let a = cards("2c 5h 9d Kc Ah");
        let a: [Card; 5] = a.try_into().unwrap();
        let mut b = a;
        b.reverse();
        assert_eq!(eval5(a), eval5(b));
    }

    #[test]
    fn scores_fill_full_range() {
        ensure_init();
        let t = super::tables();
        let mut all: Vec<u16> = t
            .flush
            .values()
            .chain(t.unique5.values())
            .chain(t.pairs.values())
            .copied()
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 7462);
    }

    #[test]
    fn eval7_matches_min_of_21_subsets() {
        ensure_init();
        let c = cards("Ah Kh Qh Jh Th 2c 3d");
        let hand: [Card; 7] = c.try_into().unwrap();
        let (score, best) = eval7(hand);
        assert_eq!(score, 1);
        let mut five: Vec<Card> = best.iter().map(|&i| hand[i]).collect();
        five.sort();
        let mut expect: Vec<Card> = cards("Ah Kh Qh Jh Th");
        expect.sort();
        assert_eq!(five, expect);
    }

    #[test]
    fn wheel_straight_ranks_above_seven_high() {
        ensure_init();
        let wheel = cards("Ah 2c 3d 4s 5h");
        let wheel: [Card; 5] = wheel.try_into().unwrap();
        let six_high = cards("6h 2c 3d 4s 5s");
        let six_high: [Card; 5] = six_high.try_into().unwrap();
        assert!(eval5(wheel) > eval5(six_high)); // wheel is the worst straight
        assert_eq!(hand_name(eval5(wheel)), "Straight");
    }
}
