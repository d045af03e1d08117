use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A single card from the shoe. Suits play no part in blackjack so only the rank is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Card {
    /// Every rank once, in the order a fresh deck is built.
    pub const ALL: [Card; 13] = [
        Card::Two,
        Card::Three,
        Card::Four,
        Card::Five,
        Card::Six,
        Card::Seven,
        Card::Eight,
        Card::Nine,
        Card::Ten,
        Card::Jack,
        Card::Queen,
        Card::King,
        Card::Ace,
    ];

    /// The symbol printed on the card, i.e. "2".."10", "J", "Q", "K" or "A".
    pub fn symbol(&self) -> &'static str {
        match self {
            Card::Two => "2",
            Card::Three => "3",
            Card::Four => "4",
            Card::Five => "5",
            Card::Six => "6",
            Card::Seven => "7",
            Card::Eight => "8",
            Card::Nine => "9",
            Card::Ten => "10",
            Card::Jack => "J",
            Card::Queen => "Q",
            Card::King => "K",
            Card::Ace => "A",
        }
    }

    /// Blackjack value of the card. Aces are worth 11 here, the hand evaluator reduces them to 1.
    pub fn value(&self) -> u32 {
        match self {
            Card::Two => 2,
            Card::Three => 3,
            Card::Four => 4,
            Card::Five => 5,
            Card::Six => 6,
            Card::Seven => 7,
            Card::Eight => 8,
            Card::Nine => 9,
            Card::Ten | Card::Jack | Card::Queen | Card::King => 10,
            Card::Ace => 11,
        }
    }

    /// Contribution of the card to the Hi-Lo running count.
    pub fn hi_lo(&self) -> i32 {
        match self {
            Card::Two | Card::Three | Card::Four | Card::Five | Card::Six => 1,
            Card::Seven | Card::Eight | Card::Nine => 0,
            Card::Ten | Card::Jack | Card::Queen | Card::King | Card::Ace => -1,
        }
    }

    pub fn is_ace(&self) -> bool {
        matches!(self, Card::Ace)
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error returned when a string is not one of the thirteen rank symbols.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized card symbol: {0}")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        Card::ALL
            .iter()
            .find(|card| card.symbol() == symbol)
            .copied()
            .ok_or(ParseCardError(s.to_string()))
    }
}
