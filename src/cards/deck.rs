use super::card::Card;
use rand::seq::SliceRandom;

/// An ordered sequence of the 52 distinct cards, shuffled once at hand start.
///
/// Supports draw-from-top only; never reshuffled mid-hand. A fresh `Deck` is
/// built and discarded per hand, mirroring the one-hand lifetime of a real deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Builds a freshly shuffled 52-card deck.
    pub fn new() -> Self {
        let mut deck = Self {
            cards: (0..52).map(Card::from).collect(),
        };
        deck.shuffle();
        deck
    }
    /// Draws the top card. Panics if the deck is exhausted, since a hand
    /// never draws more than 2*seats + 5 cards and the caller is expected to
    /// size seats accordingly.
    pub fn draw(&mut self) -> Card {
        self.cards.pop().expect("deck exhausted mid-hand")
    }
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
    fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_52_distinct_cards() {
        let deck = Deck::new();
        let mut seen: Vec<u8> = deck.cards.iter().map(|&c| u8::from(c)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn draw_reduces_remaining() {
        let mut deck = Deck::new();
        assert_eq!(deck.remaining(), 52);
        deck.draw();
        assert_eq!(deck.remaining(), 51);
    }
}
