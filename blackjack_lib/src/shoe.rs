//! The multi-deck shoe cards are drawn from, along with the Hi-Lo running count of everything drawn
//! since the last shuffle.

use crate::card::Card;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of cards in a single standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// The shoe is rebuilt before a draw when fewer than this many cards remain.
pub const DEFAULT_RESHUFFLE_THRESHOLD: usize = 15;

/// Struct for the shoe used during a game session. Owns the undrawn cards, the running count and the
/// random source used whenever the shoe is rebuilt.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: usize,
    reshuffle_threshold: usize,
    running_count: i32,
    times_shuffled: u32,
    rng: StdRng,
}

impl Shoe {
    /// Associated method for building a freshly shuffled shoe of `num_decks` decks, seeded from entropy.
    pub fn new(num_decks: usize) -> Shoe {
        Shoe::with_rng(num_decks, StdRng::from_entropy())
    }

    /// Builds a shoe whose shuffles are fully determined by `seed`.
    pub fn with_seed(num_decks: usize, seed: u64) -> Shoe {
        Shoe::with_rng(num_decks, StdRng::seed_from_u64(seed))
    }

    /// Builds a shoe that shuffles with the given random source.
    pub fn with_rng(num_decks: usize, rng: StdRng) -> Shoe {
        let mut shoe = Shoe {
            cards: Vec::new(),
            num_decks: num_decks.max(1),
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
            running_count: 0,
            times_shuffled: 0,
            rng,
        };
        shoe.rebuild();
        shoe
    }

    /// Builds a shoe holding exactly `cards` as its undrawn portion. Cards are drawn from the end of
    /// the vector. Once the stacked cards run low the shoe rebuilds itself from `num_decks` decks
    /// using a random source seeded with `seed`.
    pub fn from_cards(num_decks: usize, cards: Vec<Card>, seed: u64) -> Shoe {
        Shoe {
            cards,
            num_decks: num_decks.max(1),
            reshuffle_threshold: DEFAULT_RESHUFFLE_THRESHOLD,
            running_count: 0,
            times_shuffled: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Method for changing the number of remaining cards below which the shoe is rebuilt.
    pub fn reshuffle_threshold(mut self, threshold: usize) -> Shoe {
        self.reshuffle_threshold = threshold;
        self
    }

    /// Removes and returns the last card of the shoe, rebuilding the shoe first when it has run low.
    /// The drawn card is added to the running count.
    pub fn draw(&mut self) -> Card {
        if self.cards.len() < self.reshuffle_threshold {
            self.reshuffle();
        }
        let card = loop {
            match self.cards.pop() {
                Some(card) => break card,
                None => self.reshuffle(),
            }
        };
        self.running_count += card.hi_lo();
        card
    }

    /// Regenerates `num_decks` full decks, shuffles them and resets the running count.
    pub fn reshuffle(&mut self) {
        log::info!(
            "reshuffling shoe: {} cards remained, running count was {}",
            self.cards.len(),
            self.running_count
        );
        self.rebuild();
        self.times_shuffled += 1;
    }

    fn rebuild(&mut self) {
        self.cards.clear();
        self.cards.reserve(self.num_decks * CARDS_PER_DECK);
        for _ in 0..self.num_decks * 4 {
            self.cards.extend_from_slice(&Card::ALL);
        }
        self.cards.shuffle(&mut self.rng);
        self.running_count = 0;
    }

    /// Running count divided by the estimated number of decks left in the shoe, zero for an empty shoe.
    pub fn true_count(&self) -> f32 {
        if self.cards.is_empty() {
            return 0.0;
        }
        let remaining_decks = self.cards.len() as f32 / CARDS_PER_DECK as f32;
        self.running_count as f32 / remaining_decks
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// Number of times the shoe has been rebuilt since it was created.
    pub fn times_shuffled(&self) -> u32 {
        self.times_shuffled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn new_shoe_holds_full_decks() {
        let shoe = Shoe::with_seed(6, 7);
        assert_eq!(shoe.remaining(), 6 * CARDS_PER_DECK);
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.times_shuffled(), 0);

        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in &shoe.cards {
            *counts.entry(*card).or_default() += 1;
        }
        assert_eq!(counts.len(), 13);
        assert!(counts.values().all(|&n| n == 24));
    }

    #[test]
    fn zero_decks_is_clamped_to_one() {
        let shoe = Shoe::with_seed(0, 1);
        assert_eq!(shoe.num_decks(), 1);
        assert_eq!(shoe.remaining(), CARDS_PER_DECK);
    }

    #[test]
    fn draw_removes_exactly_one_card() {
        let mut shoe = Shoe::with_seed(2, 11);
        let mut expected = shoe.remaining();
        for _ in 0..50 {
            shoe.draw();
            expected -= 1;
            assert_eq!(shoe.remaining(), expected);
        }
    }

    #[test]
    fn running_count_sums_hi_lo_values() {
        let mut cards = vec![Card::Nine; 20];
        // Drawn from the end: 2, 2, 2, 10, 10
        cards.extend([Card::Ten, Card::Ten, Card::Two, Card::Two, Card::Two]);
        let mut shoe = Shoe::from_cards(1, cards, 3);
        let drawn: Vec<Card> = (0..5).map(|_| shoe.draw()).collect();
        assert_eq!(
            drawn,
            vec![Card::Two, Card::Two, Card::Two, Card::Ten, Card::Ten]
        );
        assert_eq!(shoe.running_count(), 1);
    }

    #[test]
    fn rebuilds_when_below_threshold() {
        let mut cards = vec![Card::Five; 14];
        cards.push(Card::Two);
        let mut shoe = Shoe::from_cards(2, cards, 5);

        // Fifteen cards left, no rebuild yet.
        assert_eq!(shoe.draw(), Card::Two);
        assert_eq!(shoe.running_count(), 1);
        assert_eq!(shoe.remaining(), 14);

        // Fourteen cards left, this draw rebuilds first.
        let card = shoe.draw();
        assert_eq!(shoe.times_shuffled(), 1);
        assert_eq!(shoe.remaining(), 2 * CARDS_PER_DECK - 1);
        assert_eq!(shoe.running_count(), card.hi_lo());
    }

    #[test]
    fn explicit_reshuffle_resets_count() {
        let mut shoe = Shoe::with_seed(1, 9);
        for _ in 0..20 {
            shoe.draw();
        }
        shoe.reshuffle();
        assert_eq!(shoe.remaining(), CARDS_PER_DECK);
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.times_shuffled(), 1);
    }

    #[test]
    fn empty_shoe_rebuilds_even_without_threshold() {
        let mut shoe = Shoe::from_cards(1, vec![Card::King], 2).reshuffle_threshold(0);
        assert_eq!(shoe.draw(), Card::King);
        assert_eq!(shoe.remaining(), 0);
        assert_eq!(shoe.true_count(), 0.0);
        shoe.draw();
        assert_eq!(shoe.remaining(), CARDS_PER_DECK - 1);
        assert_eq!(shoe.times_shuffled(), 1);
    }

    #[test]
    fn only_reshuffles_are_counted() {
        let mut shoe = Shoe::with_seed(1, 4);
        assert_eq!(shoe.times_shuffled(), 0);
        shoe.reshuffle();
        shoe.reshuffle();
        assert_eq!(shoe.times_shuffled(), 2);
        assert_eq!(shoe.remaining(), CARDS_PER_DECK);
    }

    #[test]
    fn true_count_divides_by_remaining_decks() {
        // 104 cards left is two decks.
        let mut cards = vec![Card::Eight; 104];
        cards.extend([Card::Three; 4]);
        let mut shoe = Shoe::from_cards(6, cards, 0);
        for _ in 0..4 {
            shoe.draw();
        }
        assert_eq!(shoe.running_count(), 4);
        assert!((shoe.true_count() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn seeded_shoes_shuffle_identically() {
        let mut a = Shoe::with_seed(6, 42);
        let mut b = Shoe::with_seed(6, 42);
        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
