use crate::cards::RANK_PRIMES;
use std::collections::HashMap;

/// Lookup tables consulted by [`super::evaluator`], built once at startup
/// from first principles (no embedded precomputed data files).
///
/// - `flush`: keyed by the XOR of five rank-bits (a 13-bit set of ranks),
///   consulted only when all five cards share a suit. Covers straight
///   flushes and plain flushes (1287 entries).
/// - `unique5`: keyed by the product of five distinct rank primes. Covers
///   straights and no-pair high-card hands (1287 entries).
/// - `pairs`: keyed by the product of five rank primes with repeats. Covers
///   four of a kind, full house, trips, two pair, and one pair (4888 entries).
pub struct Tables {
    pub flush: HashMap<u32, u16>,
    pub unique5: HashMap<u64, u16>,
    pub pairs: HashMap<u64, u16>,
}

/// All `k`-combinations of `0..n`, ascending within each combination.
fn combinations(n: u8, k: u8) -> Vec<Vec<u8>> {
    fn helper(start: u8, n: u8, k: u8, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if current.len() == k as usize {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            helper(i + 1, n, k, current, out);
            current.pop();
        }
    }
    let mut out = Vec::new();
    helper(0, n, k, &mut Vec::new(), &mut out);
    out
}

fn prime_product(ranks: &[u8]) -> u64 {
    ranks
        .iter()
        .map(|&r| RANK_PRIMES[r as usize] as u64)
        .product()
}

fn rank_bits(ranks: &[u8]) -> u32 {
    ranks.iter().fold(0u32, |acc, &r| acc | (1 << r))
}

/// True if the five ascending rank indices form a straight, including the
/// wheel (A-2-3-4-5, stored as ranks `[0,1,2,3,12]`).
fn is_straight(ranks: &[u8]) -> bool {
    ranks == [0, 1, 2, 3, 12] || ranks[4] - ranks[0] == 4
}

/// The rank used to order straights high-to-low; the wheel plays as a
/// five-high straight, not an ace-high one.
fn straight_high(ranks: &[u8]) -> u8 {
    if ranks == [0, 1, 2, 3, 12] { 3 } else { ranks[4] }
}

pub fn build() -> Tables {
    let mut flush = HashMap::with_capacity(1287);
    let mut unique5 = HashMap::with_capacity(1287);
    let mut pairs = HashMap::with_capacity(4888);

    // --- straights (flush-table 1..10, unique5-table 1600..1609) and
    // --- no-pair high-card hands (flush-table 323..1599, unique5 6186..7462) ---
    let all5 = combinations(13, 5);
    let (mut straights, mut others): (Vec<Vec<u8>>, Vec<Vec<u8>>) =
        all5.into_iter().partition(|c| is_straight(c));
    straights.sort_by(|a, b| straight_high(b).cmp(&straight_high(a)));
    others.sort_by(|a, b| b.cmp(a)); // descending lexicographic = best high-card first

    for (tier, ranks) in straights.iter().enumerate() {
        let tier = tier as u16;
        flush.insert(rank_bits(ranks), 1 + tier);
        unique5.insert(prime_product(ranks), 1600 + tier);
    }
    for (tier, ranks) in others.iter().enumerate() {
        let tier = tier as u16;
        flush.insert(rank_bits(ranks), 323 + tier);
        unique5.insert(prime_product(ranks), 6186 + tier);
    }

    // --- four of a kind: 11..166 ---
    let mut quads: Vec<(u8, u8)> = (0u8..13)
        .flat_map(|q| (0u8..13).filter(move |&k| k != q).map(move |k| (q, k)))
        .collect();
    quads.sort_by(|a, b| b.cmp(a));
    for (tier, &(quad, kicker)) in quads.iter().enumerate() {
        let key = RANK_PRIMES[quad as usize] as u64 * RANK_PRIMES[quad as usize] as u64
            * RANK_PRIMES[quad as usize] as u64
            * RANK_PRIMES[quad as usize] as u64
            * RANK_PRIMES[kicker as usize] as u64;
        pairs.insert(key, 11 + tier as u16);
    }

    // --- full house: 167..322 ---
    let mut houses: Vec<(u8, u8)> = (0u8..13)
        .flat_map(|t| (0u8..13).filter(move |&p| p != t).map(move |p| (t, p)))
        .collect();
    houses.sort_by(|a, b| b.cmp(a));
    for (tier, &(trip, pair)) in houses.iter().enumerate() {
        let key = RANK_PRIMES[trip as usize] as u64 * RANK_PRIMES[trip as usize] as u64
            * RANK_PRIMES[trip as usize] as u64
            * RANK_PRIMES[pair as usize] as u64
            * RANK_PRIMES[pair as usize] as u64;
        pairs.insert(key, 167 + tier as u16);
    }

    // --- three of a kind: 1610..2467 ---
    let mut trips: Vec<(u8, u8, u8)> = Vec::with_capacity(858);
    for trip in 0u8..13 {
        let remaining: Vec<u8> = (0u8..13).filter(|&r| r != trip).collect();
        for kickers in combinations(remaining.len() as u8, 2) {
            let k1 = remaining[kickers[0] as usize];
            let k2 = remaining[kickers[1] as usize];
            trips.push((trip, k2, k1)); // k2 > k1 ascending input, store descending
        }
    }
    trips.sort_by(|a, b| b.cmp(a));
    for (tier, &(trip, k2, k1)) in trips.iter().enumerate() {
        let key = RANK_PRIMES[trip as usize] as u64 * RANK_PRIMES[trip as usize] as u64
            * RANK_PRIMES[trip as usize] as u64
            * RANK_PRIMES[k1 as usize] as u64
            * RANK_PRIMES[k2 as usize] as u64;
        pairs.insert(key, 1610 + tier as u16);
    }

    // --- two pair: 2468..3325 ---
    let mut two_pairs: Vec<(u8, u8, u8)> = Vec::with_capacity(858);
    for pair_ranks in combinations(13, 2) {
        let (lo, hi) = (pair_ranks[0], pair_ranks[1]);
        for kicker in (0u8..13).filter(|&k| k != lo && k != hi) {
            two_pairs.push((hi, lo, kicker));
        }
    }
    two_pairs.sort_by(|a, b| b.cmp(a));
    for (tier, &(hi, lo, kicker)) in two_pairs.iter().enumerate() {
        let key = RANK_PRIMES[hi as usize] as u64 * RANK_PRIMES[hi as usize] as u64
            * RANK_PRIMES[lo as usize] as u64
            * RANK_PRIMES[lo as usize] as u64
            * RANK_PRIMES[kicker as usize] as u64;
        pairs.insert(key, 2468 + tier as u16);
    }

    // --- one pair: 3326..6185 ---
    let mut one_pairs: Vec<(u8, u8, u8, u8)> = Vec::with_capacity(2860);
    for pair in 0u8..13 {
        let remaining: Vec<u8> = (0u8..13).filter(|&r| r != pair).collect();
        for kickers in combinations(remaining.len() as u8, 3) {
            let k1 = remaining[kickers[0] as usize];
            let k2 = remaining[kickers[1] as usize];
            let k3 = remaining[kickers[2] as usize];
            one_pairs.push((pair, k3, k2, k1)); // descending kickers
        }
    }
    one_pairs.sort_by(|a, b| b.cmp(a));
    for (tier, &(pair, k3, k2, k1)) in one_pairs.iter().enumerate() {
        let key = RANK_PRIMES[pair as usize] as u64 * RANK_PRIMES[pair as usize] as u64
            * RANK_PRIMES[k1 as usize] as u64
            * RANK_PRIMES[k2 as usize] as u64
            * RANK_PRIMES[k3 as usize] as u64;
        pairs.insert(key, 3326 + tier as u16);
    }

    Tables {
        flush,
        unique5,
        pairs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_standard_distribution() {
        let tables = build();
        assert_eq!(tables.flush.len(), 1287);
        assert_eq!(tables.unique5.len(), 1287);
        assert_eq!(tables.pairs.len(), 156 + 156 + 858 + 858 + 2860);
    }

    #[test]
    fn every_score_in_range_is_assigned() {
        let tables = build();
        let mut all: Vec<u16> = tables
            .flush
            .values()
            .chain(tables.unique5.values())
            .chain(tables.pairs.values())
            .copied()
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 7462);
        assert_eq!(*all.first().unwrap(), 1);
        assert_eq!(*all.last().unwrap(), 7462);
    }
}
